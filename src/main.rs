use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Parser;
use search_core::{
    race::Board, DeadEndPolicy, GameModel, MoveOf, PawnRace, Position, SearchEngine,
    SearchError, SearchOptions, Side, Strategy,
};
use tracing::{info, warn};

/// Play the 5x5 pawn race against a game-tree search.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// minimax, alphabeta, stochastic or random
    #[arg(short, long, default_value = "alphabeta")]
    strategy: Strategy,

    /// Plies to search
    #[arg(short, long, default_value_t = 3)]
    depth: u32,

    /// Rollouts per candidate move for stochastic search
    #[arg(short, long, default_value_t = 8)]
    breadth: u32,

    /// Seed for rollout move choice
    #[arg(long)]
    seed: Option<u64>,

    /// What a rollout does when it runs out of moves: reject or evaluate
    #[arg(long, default_value = "evaluate")]
    dead_end: DeadEndPolicy,

    /// Stop after this many plies
    #[arg(long, default_value_t = 40)]
    plies: u32,

    /// Play White yourself; the engine plays Black
    #[arg(long)]
    human: bool,

    /// Search the start position once and print the explored tree as JSON
    #[arg(long)]
    dump_tree: bool,

    /// Log a summary after every search
    #[arg(short, long)]
    verbose: bool,
}

fn human_play(game: &PawnRace, position: &Position<PawnRace>) -> Result<MoveOf<PawnRace>> {
    let mut input = String::new();
    loop {
        print!("enter a move (e.g. \"b1 b2\"): ");
        std::io::stdout().flush()?;
        input.clear();
        if std::io::stdin()
            .read_line(&mut input)
            .context("failed to read move")?
            == 0
        {
            bail!("input closed");
        }
        match game.parse_move(position, &input) {
            Some(m) => return Ok(m),
            None => println!("error input, re enter:"),
        }
    }
}

/// Ask the engine for a move. A rejected rollout dead end falls back to
/// alpha-beta at the same depth; an empty line falls back to the first
/// legal move.
fn engine_play(
    engine: &mut SearchEngine<PawnRace>,
    strategy: Strategy,
    position: &Position<PawnRace>,
    legal: &[MoveOf<PawnRace>],
    ply: u32,
) -> Result<MoveOf<PawnRace>> {
    let chosen = match engine.choose_move(strategy, position) {
        Err(SearchError::RolloutDeadEnd { remaining_depth }) => {
            warn!(
                ply,
                remaining_depth, "rollout hit a finished game, falling back to alphabeta"
            );
            engine.choose_move(Strategy::AlphaBeta, position)?
        }
        other => other?,
    };
    Ok(match chosen {
        Some(m) => m,
        None => {
            // Depth 0 searches no line, and a forced loss leaves every
            // child at the sentinel.
            warn!(
                ply,
                depth = engine.options().depth(),
                "search returned no line, playing the first legal move"
            );
            legal[0]
        }
    })
}

fn winner_text(board: &Board, to_move: Side) -> &'static str {
    match board.promoted() {
        Some(Side::Max) => "White promoted and wins",
        Some(Side::Min) => "Black promoted and wins",
        None if to_move == Side::Max => "White has no moves, Black wins",
        None => "Black has no moves, White wins",
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_search=info,search_core=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut options = SearchOptions::default()
        .with_depth(cli.depth)
        .with_breadth(cli.breadth)
        .with_dead_end(cli.dead_end);
    if let Some(seed) = cli.seed {
        options = options.with_seed(seed);
    }
    if cli.verbose {
        options = options.verbose();
    }
    let mut engine = SearchEngine::new(PawnRace, options);
    let mut position = PawnRace::start();

    if cli.dump_tree {
        let result = engine.search(cli.strategy, &position)?;
        println!("{}", serde_json::to_string_pretty(&result.tree)?);
        info!(
            depth = engine.options().depth(),
            breadth = engine.options().breadth(),
            value = result.value,
            line = %engine.render_line(&result.line),
            "search finished"
        );
        return Ok(());
    }

    println!("{}", position.board);
    for ply in 0..cli.plies {
        let mut legal = Vec::new();
        engine.game().generate_moves(&position, &mut legal);
        if legal.is_empty() {
            println!("{}", winner_text(&position.board, position.side));
            return Ok(());
        }

        let m = if cli.human && position.side == Side::Max {
            human_play(engine.game(), &position)?
        } else {
            engine_play(&mut engine, cli.strategy, &position, &legal, ply)?
        };
        println!("ply {}: {}", ply + 1, engine.render_line(&[m]));
        position = engine.game().apply_move(&position, &m);
        println!("{}", position.board);
    }

    println!(
        "stopped after {} plies, evaluation {}",
        cli.plies,
        engine.game().evaluate(&position.board)
    );
    Ok(())
}
