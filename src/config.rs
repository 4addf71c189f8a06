//! Difficulty profiles, piece value profiles and session settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ChessError;
use crate::piece::{PieceKind, Side};

// =============================================================================
// Piece Values
// =============================================================================

/// Base material rating per piece kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceValues {
    pub king: i32,
    pub queen: i32,
    pub rook: i32,
    pub bishop: i32,
    pub knight: i32,
    pub pawn: i32,
}

impl PieceValues {
    /// Every piece is worth the same; the engine cannot tell a queen from a pawn.
    pub const RANDOM: PieceValues = PieceValues {
        king: 200,
        queen: 200,
        rook: 200,
        bishop: 200,
        knight: 200,
        pawn: 200,
    };

    pub const EASY: PieceValues = PieceValues {
        king: 2000,
        queen: 500,
        rook: 200,
        bishop: 200,
        knight: 200,
        pawn: 200,
    };

    pub const HARD: PieceValues = PieceValues {
        king: 10000,
        queen: 1500,
        rook: 600,
        bishop: 500,
        knight: 500,
        pawn: 200,
    };

    pub fn rating(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Queen => self.queen,
            PieceKind::Rook => self.rook,
            PieceKind::Bishop => self.bishop,
            PieceKind::Knight => self.knight,
            PieceKind::Pawn => self.pawn,
        }
    }
}

impl Default for PieceValues {
    fn default() -> Self {
        PieceValues::HARD
    }
}

impl FromStr for PieceValues {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(PieceValues::RANDOM),
            "easy" => Ok(PieceValues::EASY),
            "hard" => Ok(PieceValues::HARD),
            _ => Err(ChessError::UnknownDifficulty(s.to_string())),
        }
    }
}

// =============================================================================
// Difficulty
// =============================================================================

/// Search profile of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Difficulty {
    pub name: &'static str,
    /// Extra plies searched below the root move
    pub depth: u32,
    /// Odds denominator of playing a random move instead of searching (0 = never)
    pub spasm: u32,
    /// Search one ply deeper once the board is in the endgame
    pub endgame_widening: bool,
    /// Steer root candidates away from repetition, fifty-move and stalemate draws
    pub avoid_draws: bool,
    /// Material ratings played with this profile
    pub values: PieceValues,
}

impl Difficulty {
    pub const RANDOM: Difficulty = Difficulty {
        name: "Random",
        depth: 0,
        spasm: 1,
        endgame_widening: false,
        avoid_draws: true,
        values: PieceValues::RANDOM,
    };

    pub const EASY: Difficulty = Difficulty {
        name: "Easy",
        depth: 1,
        spasm: 8,
        endgame_widening: true,
        avoid_draws: true,
        values: PieceValues::EASY,
    };

    pub const HARD: Difficulty = Difficulty {
        name: "Hard",
        depth: 2,
        spasm: 30,
        endgame_widening: true,
        avoid_draws: true,
        values: PieceValues::HARD,
    };

    /// Value profile that belongs to this difficulty.
    pub fn piece_values(&self) -> PieceValues {
        self.values
    }

    /// Same profile without random moves; used for reproducible analysis.
    pub fn without_spasm(mut self) -> Self {
        self.spasm = 0;
        self
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::EASY
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for Difficulty {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Difficulty::RANDOM),
            "easy" => Ok(Difficulty::EASY),
            "hard" => Ok(Difficulty::HARD),
            _ => Err(ChessError::UnknownDifficulty(s.to_string())),
        }
    }
}

// =============================================================================
// Players and Settings
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Engine,
}

/// Game header tags for export. Player names fall back to defaults per player kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PgnTags {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: u32,
    pub white: Option<String>,
    pub black: Option<String>,
}

impl Default for PgnTags {
    fn default() -> Self {
        Self {
            event: "Casual Game".to_string(),
            site: "?".to_string(),
            date: "????.??.??".to_string(),
            round: 1,
            white: None,
            black: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub piece_values: PieceValues,
    pub white: PlayerKind,
    pub black: PlayerKind,
    /// Seed for the engine's random source; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Pause before each engine move so a viewer can follow along
    pub move_delay: Duration,
    pub tags: PgnTags,
}

impl Settings {
    pub fn new(difficulty: Difficulty, white: PlayerKind, black: PlayerKind) -> Self {
        Self {
            difficulty,
            piece_values: difficulty.piece_values(),
            white,
            black,
            seed: None,
            move_delay: Duration::ZERO,
            tags: PgnTags::default(),
        }
    }

    /// A human playing `human` against the engine.
    pub fn against_engine(human: Side, difficulty: Difficulty) -> Self {
        match human {
            Side::White => Self::new(difficulty, PlayerKind::Human, PlayerKind::Engine),
            Side::Black => Self::new(difficulty, PlayerKind::Engine, PlayerKind::Human),
        }
    }

    pub fn two_humans() -> Self {
        Self::new(Difficulty::default(), PlayerKind::Human, PlayerKind::Human)
    }

    pub fn engine_vs_engine(difficulty: Difficulty) -> Self {
        Self::new(difficulty, PlayerKind::Engine, PlayerKind::Engine)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn player(&self, side: Side) -> PlayerKind {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    /// Name written into the export header.
    pub fn player_name(&self, side: Side) -> String {
        let explicit = match side {
            Side::White => &self.tags.white,
            Side::Black => &self.tags.black,
        };
        if let Some(name) = explicit {
            return name.clone();
        }
        match (self.player(side), side) {
            (PlayerKind::Human, Side::White) => "Doe, Jane",
            (PlayerKind::Human, Side::Black) => "Doe, John",
            (PlayerKind::Engine, Side::White) => "Thought, Deep",
            (PlayerKind::Engine, Side::Black) => "Blue, Deep",
        }
        .to_string()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::against_engine(Side::White, Difficulty::default())
    }
}
