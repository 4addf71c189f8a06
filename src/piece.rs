//! Pieces, sides and per-kind movement geometry.
//!
//! A piece is a tagged variant ([`PieceKind`]) plus its [`Side`]. Pieces live
//! in the board's arena and are addressed by [`PieceId`]; the square they
//! stand on is a handle back into the square arena.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::constants::*;
use crate::error::ChessError;
use crate::moves::Move;
use crate::square::{col_of, offset, row_of, SquareId};

/// A piece, represented as an index into the board's piece arena.
pub type PieceId = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Index into per-side arrays (White = 0, Black = 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }

    /// Row delta of a pawn step.
    #[inline]
    pub fn forward(self) -> isize {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    pub fn home_row(self) -> usize {
        match self {
            Side::White => WHITE_HOME_ROW,
            Side::Black => BLACK_HOME_ROW,
        }
    }

    /// Row the pawns start on.
    pub fn pawn_row(self) -> usize {
        match self {
            Side::White => WHITE_HOME_ROW - 1,
            Side::Black => BLACK_HOME_ROW + 1,
        }
    }

    /// Row on which a pawn promotes.
    pub fn promotion_row(self) -> usize {
        self.opponent().home_row()
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Side::White),
            "black" | "b" => Ok(Side::Black),
            _ => Err(ChessError::UnknownSide(s.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Letter used in algebraic notation. Pawns have none.
    pub fn letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }

    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c {
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Board diagram symbol: upper case for White, lower case for Black.
    pub fn symbol(self, side: Side) -> char {
        let c = self.letter().unwrap_or('P');
        match side {
            Side::White => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    /// Positional table for this kind, from White's point of view.
    pub fn table(self, endgame: bool) -> &'static [[i32; N]; N] {
        match self {
            PieceKind::Pawn => &PAWN_TABLE,
            PieceKind::Knight => &KNIGHT_TABLE,
            PieceKind::Bishop => &BISHOP_TABLE,
            PieceKind::Rook => &ROOK_TABLE,
            PieceKind::Queen => &QUEEN_TABLE,
            PieceKind::King if endgame => &KING_END_TABLE,
            PieceKind::King => &KING_TABLE,
        }
    }
}

/// Table bonus for `kind` of `side` standing on `sq`.
pub fn positional_value(kind: PieceKind, side: Side, sq: SquareId, endgame: bool) -> i32 {
    let row = match side {
        Side::White => row_of(sq),
        Side::Black => N - 1 - row_of(sq),
    };
    kind.table(endgame)[row][col_of(sq)]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    /// Base material rating from the active value profile
    pub rating: i32,
    /// Current square; `None` while captured or retired by promotion
    pub square: Option<SquareId>,
    /// Committed and simulated moves made by this piece (castling eligibility)
    pub move_count: u32,
    /// Set while logically removed by a capture, cleared again on undo
    pub captured: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side, rating: i32, square: Option<SquareId>) -> Self {
        Self {
            kind,
            side,
            rating,
            square,
            move_count: 0,
            captured: false,
        }
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.move_count > 0
    }

    /// Base rating plus the table bonus at the current square.
    pub fn value(&self, endgame: bool) -> i32 {
        match self.square {
            Some(sq) => self.rating + positional_value(self.kind, self.side, sq, endgame),
            None => self.rating,
        }
    }

    /// Append the moves this piece's geometry allows, ignoring self-check.
    ///
    /// Castling is not produced here; the board adds it after legality filtering.
    pub fn pseudo_legal_moves(&self, id: PieceId, board: &Board, out: &mut Vec<Move>) {
        let Some(from) = self.square else {
            return;
        };
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(id, from, board, out),
            PieceKind::Knight => self.leap_moves(id, from, &KNIGHT_LEAPS, board, out),
            PieceKind::Bishop => self.slide_moves(id, from, &DIAGONAL, board, out),
            PieceKind::Rook => self.slide_moves(id, from, &ORTHOGONAL, board, out),
            PieceKind::Queen => {
                self.slide_moves(id, from, &ORTHOGONAL, board, out);
                self.slide_moves(id, from, &DIAGONAL, board, out);
            }
            PieceKind::King => self.leap_moves(id, from, &KING_STEPS, board, out),
        }
    }

    /// Walk each ray until blocked; an enemy blocker is a capture.
    fn slide_moves(
        &self,
        id: PieceId,
        from: SquareId,
        rays: &[(isize, isize)],
        board: &Board,
        out: &mut Vec<Move>,
    ) {
        for &(dc, dr) in rays {
            let mut sq = from;
            while let Some(next) = offset(sq, dc, dr) {
                match board.piece_on(next) {
                    None => out.push(Move::standard(id, self, from, next, None)),
                    Some(other) => {
                        if board.piece(other).side != self.side {
                            out.push(Move::standard(id, self, from, next, Some((other, next))));
                        }
                        break;
                    }
                }
                sq = next;
            }
        }
    }

    fn leap_moves(
        &self,
        id: PieceId,
        from: SquareId,
        leaps: &[(isize, isize)],
        board: &Board,
        out: &mut Vec<Move>,
    ) {
        for &(dc, dr) in leaps {
            let Some(to) = offset(from, dc, dr) else {
                continue;
            };
            match board.piece_on(to) {
                None => out.push(Move::standard(id, self, from, to, None)),
                Some(other) if board.piece(other).side != self.side => {
                    out.push(Move::standard(id, self, from, to, Some((other, to))))
                }
                Some(_) => {}
            }
        }
    }

    fn pawn_moves(&self, id: PieceId, from: SquareId, board: &Board, out: &mut Vec<Move>) {
        let side = self.side;
        let fwd = side.forward();
        let promotion_bonus = board.values().queen * 2;
        let step = |to: SquareId, victim: Option<(PieceId, SquareId)>, out: &mut Vec<Move>| {
            if row_of(to) == side.promotion_row() {
                out.push(Move::promotion(id, self, from, to, victim, promotion_bonus));
            } else {
                out.push(Move::standard(id, self, from, to, victim));
            }
        };

        if let Some(one) = offset(from, 0, fwd) {
            if board.piece_on(one).is_none() {
                step(one, None, out);
                if row_of(from) == side.pawn_row() {
                    if let Some(two) = offset(one, 0, fwd) {
                        if board.piece_on(two).is_none() {
                            step(two, None, out);
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let Some(to) = offset(from, dc, fwd) else {
                continue;
            };
            match board.piece_on(to) {
                Some(other) if board.piece(other).side != side => step(to, Some((other, to)), out),
                Some(_) => {}
                None => {
                    // en passant against the pawn that just double-stepped beside us
                    let Some(passer) = board.en_passant() else {
                        continue;
                    };
                    let passer_piece = board.piece(passer);
                    if passer_piece.side != side && passer_piece.square == offset(from, dc, 0) {
                        if let Some(victim_sq) = passer_piece.square {
                            step(to, Some((passer, victim_sq)), out);
                        }
                    }
                }
            }
        }
    }
}
