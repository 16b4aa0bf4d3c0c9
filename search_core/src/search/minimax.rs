use crate::interface::{GameModel, MoveOf, Position};
use crate::tree::MoveTree;

use super::{extend_line, leaf, SearchResult};

/// Exhaustive minimax to a fixed depth.
///
/// Every legal move at every ply is explored and recorded in the returned
/// tree. Among children with equal value the first one generated wins.
/// A side with no legal moves reports [`Side::worst`](crate::Side::worst)
/// and an empty line.
pub fn minimax<G: GameModel>(
    game: &G,
    position: &Position<G>,
    depth: u32,
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
        let child = minimax(game, &next, depth - 1);
        if side.prefers(child.value, best_value) {
            best_value = child.value;
            best_move = Some(m);
            best_line = child.line;
        }
        tree.record(game.move_key(&m), child.tree);
    }

    SearchResult {
        value: best_value,
        line: extend_line(best_move, best_line),
        tree,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interface::Side;
    use crate::search::fixtures::Script;
    use crate::PawnRace;

    #[test]
    fn test_depth_zero_is_static_evaluation() {
        let game = Script::leaves(&[1.0, 2.0]);
        let result = minimax(&game, &game.root(Side::Max), 0);
        assert_eq!(result.value, 0.0);
        assert!(result.line.is_empty());
        assert!(result.tree.is_empty());
        assert_eq!(game.generations.get(), 0);
        assert_eq!(game.evaluations.get(), 1);
    }

    #[test]
    fn test_single_move() {
        let game = Script::leaves(&[7.5]);
        for side in [Side::Max, Side::Min] {
            let result = minimax(&game, &game.root(side), 1);
            assert_eq!(result.value, 7.5);
            assert_eq!(result.line, vec![game.mv(0, 1)]);
        }
    }

    #[test]
    fn test_picks_by_side() {
        let game = Script::leaves(&[5.0, 3.0]);
        let max = minimax(&game, &game.root(Side::Max), 1);
        assert_eq!(max.value, 5.0);
        assert_eq!(max.best_move(), Some(&game.mv(0, 1)));

        let min = minimax(&game, &game.root(Side::Min), 1);
        assert_eq!(min.value, 3.0);
        assert_eq!(min.best_move(), Some(&game.mv(0, 2)));
    }

    #[test]
    fn test_tie_keeps_first_generated() {
        let game = Script::leaves(&[4.0, 4.0, 1.0]);
        for _ in 0..3 {
            let result = minimax(&game, &game.root(Side::Max), 1);
            assert_eq!(result.best_move(), Some(&game.mv(0, 1)));
        }
        let game = Script::leaves(&[9.0, 1.0, 1.0]);
        let result = minimax(&game, &game.root(Side::Min), 1);
        assert_eq!(result.best_move(), Some(&game.mv(0, 2)));
    }

    #[test]
    fn test_two_ply_line_and_full_tree() {
        // Max picks the branch whose minimum is largest.
        let game = Script::two_ply(&[&[3.0, 12.0, 8.0], &[2.0, 4.0, 6.0], &[14.0, 5.0, 2.0]]);
        let result = minimax(&game, &game.root(Side::Max), 2);
        assert_eq!(result.value, 3.0);
        // Branch nodes are 1, 5, 9; first branch's leaves are 2, 3, 4.
        assert_eq!(result.line, vec![game.mv(0, 1), game.mv(1, 2)]);
        assert_eq!(result.tree.len(), 3);
        assert_eq!(result.tree.node_count(), 12);
        assert_eq!(
            result.tree.get(game.key(0, 5)).map(MoveTree::len),
            Some(3)
        );
    }

    #[test]
    fn test_no_moves_reports_sentinel() {
        let game = Script::new(42.0);
        let max = minimax(&game, &game.root(Side::Max), 3);
        assert_eq!(max.value, f64::NEG_INFINITY);
        assert!(max.line.is_empty());
        assert!(max.tree.is_empty());

        let min = minimax(&game, &game.root(Side::Min), 1);
        assert_eq!(min.value, f64::INFINITY);
        assert!(min.line.is_empty());
    }

    #[test]
    fn test_root_tree_matches_generated_moves() {
        let game = PawnRace;
        let start = PawnRace::start();
        let mut moves = Vec::new();
        game.generate_moves(&start, &mut moves);
        let result = minimax(&game, &start, 1);
        let keys: Vec<_> = moves.iter().map(|m| game.move_key(m)).collect();
        assert_eq!(result.tree.keys().collect::<Vec<_>>(), keys);
    }
}
