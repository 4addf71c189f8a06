//! Checkmate-Rust: a small chess engine with a threaded game orchestrator.
//!
//! The engine plays standard chess (promotion to queen only) with a
//! depth-limited alpha-beta search over material and positional tables, three
//! difficulty profiles and draw avoidance. Games are driven by a [`game::Game`]
//! that accepts human moves, runs engine sides on worker threads and supports
//! stepping back and forth through the history.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, rule limits, search tuning and positional tables
//! - [`square`] - Square ids and algebraic names
//! - [`piece`] - Sides, piece kinds and movement geometry
//! - [`moves`] - Move records and notation
//! - [`board`] - Board state, legality, make/unmake and terminal detection
//! - [`search`] - Alpha-beta move selection
//! - [`config`] - Difficulty profiles, piece values and game settings
//! - [`notation`] - Movetext import and PGN export
//! - [`game`] - Turn orchestration, observers and history navigation
//! - [`worker`] - Engine worker threads
//! - [`console`] - Text console
//! - [`perft`] - Move generation counts
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use checkmate_rust::board::Board;
//! use checkmate_rust::config::{Difficulty, PieceValues};
//! use checkmate_rust::search::SearchEngine;
//!
//! // Start from the initial position
//! let mut board = Board::new(PieceValues::EASY);
//! assert_eq!(board.current_moves().len(), 20);
//!
//! // Ask the engine for a move and play it
//! let mut engine = SearchEngine::with_seed(Difficulty::EASY, 42);
//! let mv = engine.best_move(&mut board).unwrap();
//! board.apply_move(mv);
//! board.evaluate_terminal();
//! println!("{}", board.history()[0].san());
//! ```

pub mod board;
pub mod config;
pub mod console;
pub mod constants;
pub mod error;
pub mod game;
pub mod moves;
pub mod notation;
pub mod perft;
pub mod piece;
pub mod search;
pub mod square;
pub mod worker;
