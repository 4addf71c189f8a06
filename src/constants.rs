//! Constants for board geometry, piece values, positional tables and search tuning.
//!
//! The board is a fixed 8x8 grid addressed by `row * 8 + col`, where row 0 is
//! rank 8 (Black's back rank) and row 7 is rank 1 (White's back rank).

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 8;

/// Total number of squares.
pub const BOARDSIZE: usize = N * N;

/// Row of White's back rank.
pub const WHITE_HOME_ROW: usize = 7;

/// Row of Black's back rank.
pub const BLACK_HOME_ROW: usize = 0;

/// Column of the queen-side rook.
pub const QUEEN_ROOK_COL: usize = 0;

/// Column of the king at the start of the game.
pub const KING_COL: usize = 4;

/// Column of the king-side rook.
pub const KING_ROOK_COL: usize = 7;

// =============================================================================
// Move Offsets (column delta, row delta)
// =============================================================================

/// Orthogonal rays: up, down, left, right.
pub const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Diagonal rays.
pub const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Knight leaps.
pub const KNIGHT_LEAPS: [(isize, isize); 8] = [
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

/// King steps (all 8 neighbours).
pub const KING_STEPS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

// =============================================================================
// Rules
// =============================================================================

/// Plies without pawn move or capture after which the game is drawn.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Number of occurrences of one position that draws the game.
pub const REPETITION_LIMIT: usize = 3;

/// A roster at or below this size puts the board into the endgame.
pub const ENDGAME_PIECES: usize = 4;

// =============================================================================
// Search Parameters
// =============================================================================

/// Window bound for alpha-beta.
pub const INF: i32 = 1_000_000_000;

/// Countdown above which the search starts steering away from a fifty-move draw.
pub const DRAW_COUNTDOWN_THRESHOLD: u32 = 80;

/// Divisor for a root candidate that repeats an earlier position.
pub const REPETITION_DAMPING: i32 = 6;

/// Divisor for non-progress moves past the countdown threshold.
pub const FIFTY_MOVE_DAMPING: i32 = 2;

/// Divisor for a winning root candidate that stalemates the opponent.
pub const STALEMATE_CRUSH: i32 = 320;

// =============================================================================
// Positional Tables
// =============================================================================
//
// Written from White's point of view with row 0 = rank 8. Black reads the
// table mirrored vertically.

pub const PAWN_TABLE: [[i32; N]; N] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

pub const KNIGHT_TABLE: [[i32; N]; N] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 0, 0, 0, 0, -20, -40],
    [-30, 0, 10, 15, 15, 10, 0, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 0, 15, 20, 20, 15, 0, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 0, 5, 5, 0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

pub const BISHOP_TABLE: [[i32; N]; N] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 5, 5, 10, 10, 5, 5, -10],
    [-10, 0, 10, 10, 10, 10, 0, -10],
    [-10, 10, 10, 10, 10, 10, 10, -10],
    [-10, 5, 0, 0, 0, 0, 5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

pub const ROOK_TABLE: [[i32; N]; N] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, 10, 10, 10, 10, 5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [0, 0, 0, 5, 5, 0, 0, 0],
];

pub const QUEEN_TABLE: [[i32; N]; N] = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, -5],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

pub const KING_TABLE: [[i32; N]; N] = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [20, 20, 0, 0, 0, 0, 20, 20],
    [20, 30, 10, 0, 0, 10, 30, 20],
];

/// King table used once the board enters the endgame.
pub const KING_END_TABLE: [[i32; N]; N] = [
    [-50, -40, -30, -20, -20, -30, -40, -50],
    [-30, -20, -10, 0, 0, -10, -20, -30],
    [-30, -10, 20, 30, 30, 20, -10, -30],
    [-30, -10, 30, 40, 40, 30, -10, -30],
    [-30, -10, 30, 40, 40, 30, -10, -30],
    [-30, -10, 20, 30, 30, 20, -10, -30],
    [-30, -30, 0, 0, 0, 0, -30, -30],
    [-50, -30, -30, -30, -30, -30, -30, -50],
];
