use tracing::trace;

use crate::interface::{Evaluation, GameModel, MoveOf, Position, Side};
use crate::tree::MoveTree;

use super::{extend_line, leaf, SearchResult};

/// Minimax with alpha-beta pruning, starting from an open window.
pub fn alphabeta<G: GameModel>(
    game: &G,
    position: &Position<G>,
    depth: u32,
) -> SearchResult<MoveOf<G>> {
    alphabeta_with_bounds(game, position, depth, f64::NEG_INFINITY, f64::INFINITY)
}

/// Minimax with alpha-beta pruning inside the window `(alpha, beta)`.
///
/// Returns the same value as [`minimax`](super::minimax). The tree only holds
/// the moves scanned before each cutoff; the move that caused a cutoff is
/// recorded, its later siblings are never generated into the tree.
pub fn alphabeta_with_bounds<G: GameModel>(
    game: &G,
    position: &Position<G>,
    depth: u32,
    mut alpha: Evaluation,
    mut beta: Evaluation,
) -> SearchResult<MoveOf<G>> {
    if depth == 0 {
        return leaf(game, position);
    }

    let side = position.side;
    let mut moves = Vec::new();
    game.generate_moves(position, &mut moves);

    let mut best_value = side.worst();
    let mut best_move = None;
    let mut best_line = Vec::new();
    let mut tree = MoveTree::new();

    for m in moves {
        let next = game.apply_move(position, &m);
        let child = alphabeta_with_bounds(game, &next, depth - 1, alpha, beta);
        if side.prefers(child.value, best_value) {
            best_value = child.value;
            best_move = Some(m);
            best_line = child.line;
        }
        match side {
            Side::Max => alpha = alpha.max(best_value),
            Side::Min => beta = beta.min(best_value),
        }
        tree.record(game.move_key(&m), child.tree);
        if beta <= alpha {
            trace!(depth, alpha, beta, "cutoff");
            break;
        }
    }

    SearchResult {
        value: best_value,
        line: extend_line(best_move, best_line),
        tree,
    }
}
