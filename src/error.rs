//! Error types for parsing, configuration and manual move handling.

use thiserror::Error;

use crate::piece::Side;

/// Errors raised while parsing user input or configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A square name that is not `a1`..`h8`
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    /// Difficulty name not recognised
    #[error("unknown difficulty: {0} (expected random, easy or hard)")]
    UnknownDifficulty(String),

    /// Side name not recognised
    #[error("unknown color: {0} (expected white or black)")]
    UnknownSide(String),

    /// Console command not recognised
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Console command given without its argument
    #[error("missing argument for {0}")]
    MissingArgument(&'static str),

    /// A hand-built position that breaks a board invariant
    #[error("invalid setup: {0}")]
    InvalidSetup(String),
}

/// Why a manual move was refused. The board is never touched on rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("no piece on the start square")]
    NoPiece,

    #[error("it is {0}'s turn")]
    WrongSide(Side),

    #[error("{0} is played by the engine")]
    EngineTurn(Side),

    #[error("no legal move between those squares")]
    IllegalMove,

    #[error("the game has ended")]
    GameOver,
}

/// Result type alias for parsing operations
pub type ChessResult<T> = Result<T, ChessError>;
