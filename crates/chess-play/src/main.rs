//! Terminal chess against the minimax engine.
//!
//! The human enters moves on stdin while engine turns run on the blocking
//! thread pool. Ctrl-C cancels a running search and ends the game.

mod config;
mod input;

use anyhow::Context;
use chess_ai::{Engine, SessionError, SharedGame};
use chess_model::{MoveResult, PieceKind, Square};
use chess_rules::{GameState, Phase};
use clap::Parser;
use config::{HumanSide, PlayConfig, StrategyName};
use input::{check_promotion_suffix, parse_promotion, promotion_prompt, Command, HELP};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::signal;
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

/// Play chess in the terminal against a minimax or greedy engine.
#[derive(Parser)]
#[command(name = "chess-play")]
#[command(about = "Play chess in the terminal against a minimax engine")]
struct Args {
    /// Path to a TOML config file (default: chess-play.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engine strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyName>,

    /// Minimax search depth in plies
    #[arg(long)]
    depth: Option<u8>,

    /// Side played from the terminal
    #[arg(long, value_enum)]
    human: Option<HumanSide>,

    /// Starting position as FEN
    #[arg(long)]
    fen: Option<String>,

    /// Abandon the game after this many half-moves
    #[arg(long)]
    max_plies: Option<u32>,
}

impl Args {
    /// Command-line values take precedence over the config file.
    fn apply(self, config: &mut PlayConfig) {
        if let Some(strategy) = self.strategy {
            config.engine.strategy = strategy;
        }
        if let Some(depth) = self.depth {
            config.engine.depth = depth;
        }
        if let Some(human) = self.human {
            config.human = human;
        }
        if let Some(fen) = self.fen {
            config.start_fen = Some(fen);
        }
        if let Some(max_plies) = self.max_plies {
            config.max_plies = max_plies;
        }
    }
}

type InputLines = Lines<BufReader<Stdin>>;

/// Shutdown request shared with the signal handler.
#[derive(Default)]
struct Shutdown {
    requested: Arc<AtomicBool>,
    notify: Notify,
}

impl Shutdown {
    fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }

    fn request(&self) {
        self.requested.store(true, Ordering::Relaxed);
        self.notify.notify_one();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = PlayConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    let game = SharedGame::new(config.initial_state()?);
    tracing::info!(
        "Engine: {}, human plays {:?}, limit {} plies",
        config.engine.strategy(),
        config.human,
        config.max_plies
    );

    let shutdown = Arc::new(Shutdown::default());
    let handler = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            handler.request();
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", game.snapshot()?);
    if config.human != HumanSide::None {
        println!("Type 'help' for commands.");
    }

    loop {
        if shutdown.is_requested() {
            break;
        }
        let state = game.snapshot()?;
        let status = state.game_status();
        if status.is_over() {
            println!("Game over: {}", status);
            match status.winner() {
                Some(color) if config.engine_for(color).is_some() => {
                    tracing::info!("{} engine wins", color);
                }
                Some(color) => tracing::info!("{} player wins", color),
                None => tracing::info!("Draw"),
            }
            break;
        }
        if state.history().len() as u32 >= config.max_plies {
            println!("Stopped after {} plies.", config.max_plies);
            break;
        }

        let keep_going = match config.engine_for(state.side_to_move()) {
            Some(engine) => engine_turn(&game, engine, &shutdown).await?,
            None => human_turn(&game, &state, &mut lines, &shutdown).await?,
        };
        if !keep_going {
            break;
        }
    }

    let state = game.snapshot()?;
    tracing::info!("Final position: {}", state.to_fen());
    Ok(())
}

/// Runs one engine move on the blocking pool. Returns false when the game
/// should end.
async fn engine_turn(
    game: &SharedGame,
    engine: Engine,
    shutdown: &Shutdown,
) -> anyhow::Result<bool> {
    let turn = game.begin_engine_turn()?;
    let cancel = Arc::clone(&shutdown.requested);
    let outcome = tokio::task::spawn_blocking(move || turn.run(&engine, &cancel))
        .await
        .context("engine task panicked")??;

    let Some(outcome) = outcome else {
        return Ok(false);
    };
    let state = game.snapshot()?;
    if let Some(record) = state.history().last() {
        println!("{} plays {}", engine.color(), record);
    }
    tracing::debug!(score = outcome.score, nodes = outcome.nodes, "engine move");
    println!("{}", state);
    Ok(true)
}

/// Reads and handles one line from the human. Returns false when the game
/// should end.
async fn human_turn(
    game: &SharedGame,
    state: &GameState,
    lines: &mut InputLines,
    shutdown: &Shutdown,
) -> anyhow::Result<bool> {
    let awaiting_promotion = matches!(state.phase(), Phase::AwaitingPromotion { .. });
    if awaiting_promotion {
        println!("{}", promotion_prompt());
    } else {
        println!("{} to move:", state.side_to_move());
    }

    let line = tokio::select! {
        line = lines.next_line() => line?,
        _ = shutdown.notify.notified() => return Ok(false),
    };
    let Some(line) = line else {
        return Ok(false);
    };

    if let Phase::AwaitingPromotion { square } = state.phase() {
        match parse_promotion(&line) {
            Ok(kind) => promote(game, square, kind)?,
            Err(e) => println!("{}", e),
        }
        return Ok(true);
    }

    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return Ok(true);
        }
    };

    match command {
        Command::Quit => return Ok(false),
        Command::Help => println!("{}", HELP),
        Command::Board => println!("{}", state),
        Command::Fen => println!("{}", state.to_fen()),
        Command::History => {
            for record in state.history() {
                println!("{:>3}. {}", record.ply, record);
            }
        }
        Command::Moves(square) => {
            let targets: Vec<String> = state
                .legal_moves_for(square)
                .iter()
                .map(|sq| sq.to_algebraic())
                .collect();
            if targets.is_empty() {
                println!("no legal moves from {}", square);
            } else {
                println!("{}: {}", square, targets.join(" "));
            }
        }
        Command::Move {
            from,
            to,
            promotion,
        } => {
            if let Err(e) = check_promotion_suffix(state, from, to, promotion) {
                println!("{}", e);
                return Ok(true);
            }
            match game.try_attempt_move(from, to) {
                Ok(MoveResult::Success) => println!("{}", game.snapshot()?),
                Ok(MoveResult::PromotionRequired) => {
                    if let Some(kind) = promotion {
                        promote(game, to, kind)?;
                    }
                }
                Ok(MoveResult::Invalid) => println!("illegal move {}-{}", from, to),
                Err(SessionError::Busy) => println!("the engine is thinking"),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(true)
}

fn promote(game: &SharedGame, square: Square, kind: PieceKind) -> anyhow::Result<()> {
    match game.try_promote(square, kind) {
        Ok(()) => println!("{}", game.snapshot()?),
        Err(SessionError::Promotion(e)) => println!("{}", e),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
