//! Adversarial game-tree search over any two-player, perfect-information
//! game that implements [`GameModel`].
//!
//! Three interchangeable strategies share one recursive shape: exhaustive
//! [`minimax`], [`alphabeta`] pruning, and rollout-sampling [`stochastic`]
//! search. Each returns the value of the chosen line, the line itself, and a
//! [`MoveTree`] of everything it explored.

pub mod interface;
pub mod race;
mod search;
mod tree;

pub use interface::{Evaluation, GameModel, Move, MoveKey, MoveOf, Position, Side};
pub use race::PawnRace;
pub use search::algorithm::{DeadEndPolicy, SearchEngine, SearchOptions, Strategy};
pub use search::rollout_policy::{
    Chooser, FirstChooser, NthChooser, RandomChooser, ScriptedChooser,
};
pub use search::{
    alphabeta, alphabeta_with_bounds, minimax, random, stochastic, SearchError, SearchResult,
};
pub use tree::MoveTree;
