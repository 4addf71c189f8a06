//! Squares and coordinate helpers.
//!
//! A square is addressed by a [`SquareId`], the index `row * 8 + col` into the
//! board's square arena. Row 0 is rank 8, so White pawns advance towards
//! lower rows.

use crate::constants::N;
use crate::error::{ChessError, ChessResult};
use crate::piece::PieceId;

/// A square on the board, represented as an index into the square arena.
pub type SquareId = usize;

/// One cell of the board. Created once per board and never destroyed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Square {
    pub col: usize,
    pub row: usize,
    /// Cosmetic colour of the cell
    pub dark: bool,
    /// Handle of the occupying piece
    pub piece: Option<PieceId>,
}

impl Square {
    pub fn new(id: SquareId) -> Self {
        let (col, row) = (col_of(id), row_of(id));
        Self {
            col,
            row,
            dark: (col + row) % 2 == 1,
            piece: None,
        }
    }
}

#[inline]
pub fn square_at(col: usize, row: usize) -> SquareId {
    row * N + col
}

#[inline]
pub fn col_of(sq: SquareId) -> usize {
    sq % N
}

#[inline]
pub fn row_of(sq: SquareId) -> usize {
    sq / N
}

/// Step from `sq` by a (column, row) delta, or `None` if that leaves the board.
#[inline]
pub fn offset(sq: SquareId, dc: isize, dr: isize) -> Option<SquareId> {
    let col = col_of(sq) as isize + dc;
    let row = row_of(sq) as isize + dr;
    if (0..N as isize).contains(&col) && (0..N as isize).contains(&row) {
        Some(square_at(col as usize, row as usize))
    } else {
        None
    }
}

/// File letter of a column (`a`..`h`).
#[inline]
pub fn file_char(col: usize) -> char {
    (b'a' + col as u8) as char
}

/// Rank digit of a row (`8`..`1`).
#[inline]
pub fn rank_char(row: usize) -> char {
    (b'0' + (N - row) as u8) as char
}

/// Convert a square to its algebraic name (e.g. "e4").
pub fn square_name(sq: SquareId) -> String {
    format!("{}{}", file_char(col_of(sq)), rank_char(row_of(sq)))
}

/// Column of a file letter.
pub fn file_index(c: char) -> Option<usize> {
    match c {
        'a'..='h' => Some(c as usize - 'a' as usize),
        _ => None,
    }
}

/// Row of a rank digit.
pub fn rank_index(c: char) -> Option<usize> {
    match c {
        '1'..='8' => Some(N - (c as usize - '0' as usize)),
        _ => None,
    }
}

/// Parse an algebraic square name (e.g. "e4") into a [`SquareId`].
pub fn parse_square(s: &str) -> ChessResult<SquareId> {
    let mut chars = s.trim().chars();
    let parsed = match (chars.next(), chars.next(), chars.next()) {
        (Some(f), Some(r), None) => file_index(f.to_ascii_lowercase()).zip(rank_index(r)),
        _ => None,
    };
    parsed
        .map(|(col, row)| square_at(col, row))
        .ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
}
