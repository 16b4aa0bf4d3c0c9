use rand::Rng;

/// Picks one move out of the legal moves during a rollout.
///
/// Production play uses [`RandomChooser`]; tests inject one of the
/// deterministic choosers so rollouts are reproducible.
pub trait Chooser<M> {
    /// Return an index into `moves`, which is never empty.
    fn choose(&mut self, moves: &[M]) -> usize;
}

impl<M, F: FnMut(&[M]) -> usize> Chooser<M> for F {
    fn choose(&mut self, moves: &[M]) -> usize {
        self(moves)
    }
}

/// Uniformly random choice.
pub struct RandomChooser<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomChooser<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<M, R: Rng> Chooser<M> for RandomChooser<R> {
    fn choose(&mut self, moves: &[M]) -> usize {
        self.rng.gen_range(0..moves.len())
    }
}

/// Always the first generated move.
pub struct FirstChooser;

impl<M> Chooser<M> for FirstChooser {
    fn choose(&mut self, _moves: &[M]) -> usize {
        0
    }
}

/// Always the n-th generated move, wrapping around short move lists.
pub struct NthChooser(pub usize);

impl<M> Chooser<M> for NthChooser {
    fn choose(&mut self, moves: &[M]) -> usize {
        self.0 % moves.len()
    }
}

/// Replays a fixed list of indices, cycling when it runs out.
/// Each index wraps around the move list it is applied to.
pub struct ScriptedChooser {
    picks: Vec<usize>,
    next: usize,
}

impl ScriptedChooser {
    pub fn new(picks: Vec<usize>) -> Self {
        assert!(!picks.is_empty(), "scripted chooser needs at least one pick");
        Self { picks, next: 0 }
    }
}

impl<M> Chooser<M> for ScriptedChooser {
    fn choose(&mut self, moves: &[M]) -> usize {
        let pick = self.picks[self.next % self.picks.len()];
        self.next += 1;
        pick % moves.len()
    }
}
