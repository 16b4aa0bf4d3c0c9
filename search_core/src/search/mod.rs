pub mod algorithm;
mod alphabeta;
mod minimax;
pub mod rollout_policy;
mod stochastic;

pub use alphabeta::{alphabeta, alphabeta_with_bounds};
pub use minimax::minimax;
pub use stochastic::{random, stochastic};

use serde::Serialize;
use thiserror::Error;

use crate::interface::{Evaluation, GameModel, MoveOf, Position};
use crate::tree::MoveTree;

/// Errors that can occur during a search.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("rollout ran out of legal moves with {remaining_depth} plies left")]
    RolloutDeadEnd { remaining_depth: u32 },

    #[error("rollout breadth must be at least 1")]
    InvalidBreadth,

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Outcome of a search from one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<M> {
    /// Value of the chosen line. For stochastic search, the mean over rollouts.
    pub value: Evaluation,
    /// Moves from the searched position towards the horizon, best move first.
    pub line: Vec<M>,
    /// Every move explored, whether or not it was chosen.
    pub tree: MoveTree,
}

impl<M> SearchResult<M> {
    pub fn best_move(&self) -> Option<&M> {
        self.line.first()
    }
}

/// Horizon node: static evaluation, nothing explored.
fn leaf<G: GameModel>(game: &G, position: &Position<G>) -> SearchResult<MoveOf<G>> {
    SearchResult {
        value: game.evaluate(&position.board),
        line: Vec::new(),
        tree: MoveTree::new(),
    }
}

/// Prepend the chosen move to its child's line. With no chosen move the
/// line stays empty, which is how a side without legal moves reports.
fn extend_line<M>(best: Option<M>, mut line: Vec<M>) -> Vec<M> {
    if let Some(m) = best {
        line.insert(0, m);
    }
    line
}
