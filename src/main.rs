//! Checkmate-Rust command line.
//!
//! ## Usage
//!
//! - `checkmate-rust` - Play White against the engine on the console
//! - `checkmate-rust play --color black --difficulty hard` - Choose side and profile
//! - `checkmate-rust selfplay` - Let the engine play itself and print the game
//! - `checkmate-rust perft --depth 4` - Count legal move tree leaves
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::unbounded;
use tracing_subscriber::EnvFilter;

use checkmate_rust::board::Board;
use checkmate_rust::config::{Difficulty, Settings};
use checkmate_rust::console::Console;
use checkmate_rust::game::{Game, GameEvent};
use checkmate_rust::perft::perft_divide;
use checkmate_rust::piece::Side;

/// Checkmate-Rust: a small alpha-beta chess engine
#[derive(Parser)]
#[command(name = "checkmate-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine on the text console
    Play {
        /// Side played by the human
        #[arg(long, default_value = "white")]
        color: Side,
        /// Engine profile: random, easy or hard
        #[arg(long, default_value = "easy")]
        difficulty: Difficulty,
        /// Seed for reproducible engine choices
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Let the engine play both sides and print the game
    Selfplay {
        #[arg(long, default_value = "easy")]
        difficulty: Difficulty,
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many plies if the game has not ended
        #[arg(long, default_value_t = 300)]
        max_plies: usize,
    },
    /// Count leaf nodes of the legal move tree from the initial position
    Perft {
        #[arg(long, default_value_t = 3)]
        depth: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Play {
            color,
            difficulty,
            seed,
        }) => {
            let mut settings = Settings::against_engine(color, difficulty);
            settings.seed = seed;
            Console::new(settings).run().context("console I/O failed")?;
        }
        Some(Commands::Selfplay {
            difficulty,
            seed,
            max_plies,
        }) => run_selfplay(difficulty, seed, max_plies)?,
        Some(Commands::Perft { depth }) => run_perft(depth),
        None => {
            Console::new(Settings::default())
                .run()
                .context("console I/O failed")?;
        }
    }
    Ok(())
}

fn run_selfplay(difficulty: Difficulty, seed: Option<u64>, max_plies: usize) -> Result<()> {
    let mut settings = Settings::engine_vs_engine(difficulty);
    settings.seed = seed;
    let (tx, rx) = unbounded();
    let mut game = Game::new(settings, tx);
    game.start();

    let mut plies = 0;
    loop {
        match rx.recv_timeout(Duration::from_secs(300)) {
            Ok(GameEvent::MoveAppended(notation)) => {
                plies += 1;
                println!("{plies:>4}. {notation}");
                if plies >= max_plies {
                    game.pause();
                    println!("stopped after {plies} plies");
                    break;
                }
            }
            Ok(GameEvent::Ended(terminal)) => {
                println!("{terminal}");
                break;
            }
            Ok(_) => {}
            Err(_) => bail!("engine did not move within five minutes"),
        }
    }
    println!("\n{}", game.export_pgn());
    Ok(())
}

fn run_perft(depth: u32) {
    let mut board = Board::new(Default::default());
    let start = Instant::now();
    let divide = perft_divide(&mut board, depth);
    let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
    for (mv, nodes) in &divide {
        println!("{mv}: {nodes}");
    }
    println!("\nperft({depth}) = {total} in {:.2?}", start.elapsed());
}
