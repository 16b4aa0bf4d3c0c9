use tracing::{debug, trace};

use crate::interface::{GameModel, MoveOf, Position};
use crate::tree::MoveTree;

use super::algorithm::DeadEndPolicy;
use super::rollout_policy::Chooser;
use super::{extend_line, leaf, SearchError, SearchResult};

/// Rollout-sampling search.
///
/// Every legal move is scored by the mean of `breadth` rollouts of
/// `depth - 1` chooser-picked plies from its successor. The side to move
/// keeps the strictly best mean, first generated on ties. The reported line
/// is the last rollout played for the chosen move, a sample path rather than
/// one that achieves the mean.
pub fn stochastic<G, C>(
    game: &G,
    position: &Position<G>,
    depth: u32,
    breadth: u32,
    chooser: &mut C,
    dead_end: DeadEndPolicy,
) -> Result<SearchResult<MoveOf<G>>, SearchError>
where
    G: GameModel,
    C: Chooser<MoveOf<G>> + ?Sized,
{
    if breadth == 0 {
        return Err(SearchError::InvalidBreadth);
    }
    if depth == 0 {
        return Ok(leaf(game, position));
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
        let mut mean = 0.0;
        let mut subtree = MoveTree::new();
        let mut last_line = Vec::new();
        for _ in 0..breadth {
            let sample = rollout(game, &next, depth - 1, chooser, dead_end)?;
            mean += sample.value / breadth as f64;
            subtree.merge(sample.tree);
            last_line = sample.line;
        }
        debug!(candidate = ?m, mean, "rollouts done");
        if side.prefers(mean, best_value) {
            best_value = mean;
            best_move = Some(m);
            best_line = last_line;
        }
        tree.record(game.move_key(&m), subtree);
    }

    Ok(SearchResult {
        value: best_value,
        line: extend_line(best_move, best_line),
        tree,
    })
}

/// One playout of `depth` chooser-picked plies, evaluated at the end.
pub(crate) fn rollout<G, C>(
    game: &G,
    position: &Position<G>,
    depth: u32,
    chooser: &mut C,
    dead_end: DeadEndPolicy,
) -> Result<SearchResult<MoveOf<G>>, SearchError>
where
    G: GameModel,
    C: Chooser<MoveOf<G>> + ?Sized,
{
    if depth == 0 {
        return Ok(leaf(game, position));
    }

    let mut moves = Vec::new();
    game.generate_moves(position, &mut moves);
    if moves.is_empty() {
        trace!(remaining_depth = depth, ?dead_end, "rollout dead end");
        return match dead_end {
            DeadEndPolicy::Reject => Err(SearchError::RolloutDeadEnd {
                remaining_depth: depth,
            }),
            DeadEndPolicy::EvaluateEarly => Ok(leaf(game, position)),
        };
    }

    let m = moves[chooser.choose(&moves)];
    let next = game.apply_move(position, &m);
    let mut sample = rollout(game, &next, depth - 1, chooser, dead_end)?;
    sample.line.insert(0, m);
    sample.tree = MoveTree::single(game.move_key(&m), sample.tree);
    Ok(sample)
}

/// Play a single chooser-picked move and report the evaluation of the board
/// it leads to. Without legal moves the current board is evaluated instead.
pub fn random<G, C>(
    game: &G,
    position: &Position<G>,
    chooser: &mut C,
) -> SearchResult<MoveOf<G>>
where
    G: GameModel,
    C: Chooser<MoveOf<G>> + ?Sized,
{
    let mut moves = Vec::new();
    game.generate_moves(position, &mut moves);
    if moves.is_empty() {
        return leaf(game, position);
    }

    let m = moves[chooser.choose(&moves)];
    let next = game.apply_move(position, &m);
    SearchResult {
        value: game.evaluate(&next.board),
        line: vec![m],
        tree: MoveTree::single(game.move_key(&m), MoveTree::new()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interface::Side;
    use crate::search::fixtures::Script;
    use crate::search::rollout_policy::{FirstChooser, NthChooser, ScriptedChooser};

    /// Root -> a, b. Below a: leaves 1 and 9. Below b: leaves 4 and 6.
    fn forked() -> Script {
        Script::two_ply(&[&[1.0, 9.0], &[4.0, 6.0]])
    }

    #[test]
    fn test_mean_and_last_rollout_line() {
        let game = forked();
        // Rollouts alternate between first and second leaf.
        let mut chooser = ScriptedChooser::new(vec![0, 1]);
        let result = stochastic(
            &game,
            &game.root(Side::Max),
            2,
            2,
            &mut chooser,
            DeadEndPolicy::Reject,
        )
        .unwrap();
        // Both branches average 5; the first one generated is kept.
        assert_eq!(result.value, 5.0);
        assert_eq!(result.line, vec![game.mv(0, 1), game.mv(1, 3)]);

        let a = result.tree.get(game.key(0, 1)).unwrap();
        assert_eq!(a.keys().collect::<Vec<_>>(), vec![game.key(1, 2), game.key(1, 3)]);
        let b = result.tree.get(game.key(0, 4)).unwrap();
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_side_selection() {
        let game = forked();
        let max = stochastic(
            &game,
            &game.root(Side::Max),
            2,
            4,
            &mut FirstChooser,
            DeadEndPolicy::Reject,
        )
        .unwrap();
        assert_eq!(max.value, 4.0);
        assert_eq!(max.line, vec![game.mv(0, 4), game.mv(4, 5)]);

        let min = stochastic(
            &game,
            &game.root(Side::Min),
            2,
            4,
            &mut FirstChooser,
            DeadEndPolicy::Reject,
        )
        .unwrap();
        assert_eq!(min.value, 1.0);
        assert_eq!(min.best_move(), Some(&game.mv(0, 1)));
        // Repeating the same move only records it once.
        assert_eq!(min.tree.get(game.key(0, 1)).map(MoveTree::len), Some(1));
    }

    #[test]
    fn test_mean_within_rollout_range() {
        let game = Script::two_ply(&[&[2.0, -6.0, 10.0, 3.0]]);
        let mut values = Vec::new();
        for pick in 0..4 {
            let sample = rollout(
                &game,
                &game.apply_move(&game.root(Side::Max), &game.mv(0, 1)),
                1,
                &mut NthChooser(pick),
                DeadEndPolicy::Reject,
            )
            .unwrap();
            values.push(sample.value);
        }
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mut chooser = ScriptedChooser::new(vec![3, 1, 1, 0]);
        let result = stochastic(
            &game,
            &game.root(Side::Max),
            2,
            4,
            &mut chooser,
            DeadEndPolicy::Reject,
        )
        .unwrap();
        assert!(result.value >= lo && result.value <= hi);
        assert_eq!(result.value, (3.0 - 6.0 - 6.0 + 2.0) / 4.0);
    }

    #[test]
    fn test_single_move_depth_one() {
        let game = Script::leaves(&[3.5]);
        let result = stochastic(
            &game,
            &game.root(Side::Min),
            1,
            4,
            &mut FirstChooser,
            DeadEndPolicy::Reject,
        )
        .unwrap();
        assert_eq!(result.value, 3.5);
        assert_eq!(result.line, vec![game.mv(0, 1)]);
        assert_eq!(result.tree.node_count(), 1);
    }

    #[test]
    fn test_dead_end_policies() {
        // a is a leaf, so a rollout of one more ply from it has nowhere to go.
        let game = Script::leaves(&[8.0]);
        let err = stochastic(
            &game,
            &game.root(Side::Max),
            2,
            1,
            &mut FirstChooser,
            DeadEndPolicy::Reject,
        )
        .unwrap_err();
        assert_eq!(err, SearchError::RolloutDeadEnd { remaining_depth: 1 });

        let result = stochastic(
            &game,
            &game.root(Side::Max),
            2,
            1,
            &mut FirstChooser,
            DeadEndPolicy::EvaluateEarly,
        )
        .unwrap();
        assert_eq!(result.value, 8.0);
        assert_eq!(result.line, vec![game.mv(0, 1)]);
    }

    #[test]
    fn test_degenerate_inputs() {
        let game = forked();
        let err = stochastic(
            &game,
            &game.root(Side::Max),
            2,
            0,
            &mut FirstChooser,
            DeadEndPolicy::Reject,
        )
        .unwrap_err();
        assert_eq!(err, SearchError::InvalidBreadth);

        let at_root = stochastic(
            &game,
            &game.root(Side::Max),
            0,
            4,
            &mut FirstChooser,
            DeadEndPolicy::Reject,
        )
        .unwrap();
        assert_eq!((at_root.value, at_root.line.len()), (0.0, 0));

        let stuck = Script::new(1.0);
        let result = stochastic(
            &stuck,
            &stuck.root(Side::Max),
            3,
            2,
            &mut FirstChooser,
            DeadEndPolicy::Reject,
        )
        .unwrap();
        assert_eq!(result.value, f64::NEG_INFINITY);
        assert!(result.line.is_empty());
    }

    #[test]
    fn test_random_strategy() {
        let game = Script::leaves(&[1.0, 2.0, 3.0]);
        let result = random(&game, &game.root(Side::Max), &mut NthChooser(2));
        assert_eq!(result.value, 3.0);
        assert_eq!(result.line, vec![game.mv(0, 3)]);
        assert_eq!(
            result.tree.keys().collect::<Vec<_>>(),
            vec![game.key(0, 3)]
        );

        let stuck = Script::new(-4.0);
        let result = random(&stuck, &stuck.root(Side::Min), &mut FirstChooser);
        assert_eq!(result.value, -4.0);
        assert!(result.line.is_empty());
        assert!(result.tree.is_empty());
    }
}
