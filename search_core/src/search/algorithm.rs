use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::interface::{GameModel, MoveOf, Position};

use super::rollout_policy::{Chooser, RandomChooser};
use super::{alphabeta, minimax, random, stochastic, SearchError, SearchResult};

/// What a rollout does when the side to move has no legal moves before the
/// rollout reaches its depth.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadEndPolicy {
    /// Abort the search with [`SearchError::RolloutDeadEnd`].
    #[default]
    Reject,
    /// Evaluate the position the rollout got stuck in.
    EvaluateEarly,
}

impl FromStr for DeadEndPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(DeadEndPolicy::Reject),
            "evaluate" | "evaluate-early" => Ok(DeadEndPolicy::EvaluateEarly),
            other => Err(format!("unknown dead-end policy: {}", other)),
        }
    }
}

/// The available ways of picking a move.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Minimax,
    AlphaBeta,
    Stochastic,
    Random,
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(Strategy::Minimax),
            "alphabeta" | "alpha-beta" => Ok(Strategy::AlphaBeta),
            "stochastic" | "rollout" => Ok(Strategy::Stochastic),
            "random" => Ok(Strategy::Random),
            _ => Err(SearchError::UnknownStrategy(s.to_string())),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Minimax => "minimax",
            Strategy::AlphaBeta => "alphabeta",
            Strategy::Stochastic => "stochastic",
            Strategy::Random => "random",
        };
        f.write_str(name)
    }
}

/// Options for SearchEngine.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    verbose: bool,
    depth: u32,
    breadth: u32,
    seed: Option<u64>,
    dead_end: DeadEndPolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            depth: 3,
            breadth: 8,
            seed: None,
            dead_end: DeadEndPolicy::Reject,
        }
    }
}

impl SearchOptions {
    /// Log a summary after each search.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Number of plies to search.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Rollouts per candidate move in stochastic search.
    pub fn with_breadth(mut self, breadth: u32) -> Self {
        self.breadth = breadth;
        self
    }

    /// Seed the rollout chooser. Unseeded engines use the thread RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_dead_end(mut self, dead_end: DeadEndPolicy) -> Self {
        self.dead_end = dead_end;
        self
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn breadth(&self) -> u32 {
        self.breadth
    }
}

/// Runs searches on one game model with a fixed set of options.
pub struct SearchEngine<G: GameModel> {
    game: G,
    options: SearchOptions,
    chooser: Box<dyn Chooser<MoveOf<G>>>,
}

impl<G: GameModel> SearchEngine<G> {
    pub fn new(game: G, options: SearchOptions) -> Self {
        let chooser: Box<dyn Chooser<MoveOf<G>>> = match options.seed {
            Some(seed) => Box::new(RandomChooser::new(ChaCha8Rng::seed_from_u64(seed))),
            None => Box::new(RandomChooser::new(rand::thread_rng())),
        };
        Self {
            game,
            options,
            chooser,
        }
    }

    /// Replace the rollout chooser, e.g. with a deterministic one.
    pub fn with_chooser(mut self, chooser: impl Chooser<MoveOf<G>> + 'static) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn search(
        &mut self,
        strategy: Strategy,
        position: &Position<G>,
    ) -> Result<SearchResult<MoveOf<G>>, SearchError> {
        let start = Instant::now();
        let depth = self.options.depth;
        let result = match strategy {
            Strategy::Minimax => minimax(&self.game, position, depth),
            Strategy::AlphaBeta => alphabeta(&self.game, position, depth),
            Strategy::Stochastic => stochastic(
                &self.game,
                position,
                depth,
                self.options.breadth,
                self.chooser.as_mut(),
                self.options.dead_end,
            )?,
            Strategy::Random => random(&self.game, position, self.chooser.as_mut()),
        };

        if self.options.verbose {
            let elapsed = start.elapsed();
            let nodes = result.tree.node_count();
            let rate = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
            info!(
                %strategy,
                depth,
                value = result.value,
                nodes,
                elapsed_ms = elapsed.as_millis() as u64,
                "searched {:.0} nodes/sec, line: {}",
                rate,
                self.render_line(&result.line)
            );
        }
        Ok(result)
    }

    /// Search and return only the first move of the chosen line.
    pub fn choose_move(
        &mut self,
        strategy: Strategy,
        position: &Position<G>,
    ) -> Result<Option<MoveOf<G>>, SearchError> {
        Ok(self.search(strategy, position)?.line.first().copied())
    }

    pub fn render_line(&self, line: &[MoveOf<G>]) -> String {
        line.iter()
            .map(|m| self.game.notation(m).unwrap_or_else(|| format!("{:?}", m)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
