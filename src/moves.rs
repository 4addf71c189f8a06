//! Move records: one value per candidate or committed transition.
//!
//! A [`Move`] names the moving piece, its start and destination squares and,
//! for captures, the victim and the square it is taken on (which differs from
//! the destination only for en passant). Committed moves additionally carry the
//! [`PriorState`] needed to undo them and the annotations stamped by the board
//! after the move was played.

use std::fmt;

use crate::board::GameResult;
use crate::piece::{Piece, PieceId, PieceKind, Side};
use crate::square::{col_of, file_char, rank_char, row_of, square_name, SquareId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Standard,
    /// King move of two files; the rook jumps to the square the king crossed
    Castling {
        rook: PieceId,
        rook_from: SquareId,
        rook_to: SquareId,
    },
    /// Pawn reaching the last row and becoming a queen. The queen is created on
    /// first execution; a committed promotion remembers it so redo reuses it.
    Promotion { queen: Option<PieceId> },
}

/// Check annotation appended to the notation of a committed move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckMark {
    #[default]
    None,
    Check,
    Mate,
}

impl CheckMark {
    pub fn suffix(self) -> &'static str {
        match self {
            CheckMark::None => "",
            CheckMark::Check => "+",
            CheckMark::Mate => "#",
        }
    }
}

/// Board attributes a make overwrites and an unmake must restore.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriorState {
    pub(crate) en_passant: Option<PieceId>,
    pub(crate) countdown: u32,
    /// Roster index the victim was removed from
    pub(crate) victim_slot: Option<usize>,
    /// Roster index of the promoting pawn, now held by the queen
    pub(crate) pawn_slot: Option<usize>,
    /// Queen pushed onto the piece arena by this make
    pub(crate) created: Option<PieceId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub piece: PieceId,
    pub piece_kind: PieceKind,
    pub side: Side,
    pub from: SquareId,
    pub to: SquareId,
    pub victim: Option<PieceId>,
    pub victim_square: Option<SquareId>,
    pub kind: MoveKind,
    rating: i32,
    ambiguous_col: bool,
    ambiguous_row: bool,
    check: CheckMark,
    result: GameResult,
    pub(crate) prior: Option<PriorState>,
}

impl Move {
    fn new(
        piece: PieceId,
        mover: &Piece,
        from: SquareId,
        to: SquareId,
        victim: Option<(PieceId, SquareId)>,
        kind: MoveKind,
        rating: i32,
    ) -> Self {
        Self {
            piece,
            piece_kind: mover.kind,
            side: mover.side,
            from,
            to,
            victim: victim.map(|(id, _)| id),
            victim_square: victim.map(|(_, sq)| sq),
            kind,
            rating,
            ambiguous_col: false,
            ambiguous_row: false,
            check: CheckMark::None,
            result: GameResult::Ongoing,
            prior: None,
        }
    }

    pub fn standard(
        piece: PieceId,
        mover: &Piece,
        from: SquareId,
        to: SquareId,
        victim: Option<(PieceId, SquareId)>,
    ) -> Self {
        Self::new(piece, mover, from, to, victim, MoveKind::Standard, 0)
    }

    pub fn promotion(
        piece: PieceId,
        mover: &Piece,
        from: SquareId,
        to: SquareId,
        victim: Option<(PieceId, SquareId)>,
        rating: i32,
    ) -> Self {
        Self::new(
            piece,
            mover,
            from,
            to,
            victim,
            MoveKind::Promotion { queen: None },
            rating,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn castling(
        king: PieceId,
        mover: &Piece,
        from: SquareId,
        to: SquareId,
        rook: PieceId,
        rook_from: SquareId,
        rook_to: SquareId,
        rating: i32,
    ) -> Self {
        Self::new(
            king,
            mover,
            from,
            to,
            None,
            MoveKind::Castling {
                rook,
                rook_from,
                rook_to,
            },
            rating,
        )
    }

    /// Intrinsic bonus: twice a queen for promotion, a pawn for castling.
    #[inline]
    pub fn rating(&self) -> i32 {
        self.rating
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.victim.is_some()
    }

    #[inline]
    pub fn is_pawn_move(&self) -> bool {
        self.piece_kind == PieceKind::Pawn
    }

    pub fn is_castling(&self) -> bool {
        matches!(self.kind, MoveKind::Castling { .. })
    }

    pub fn is_promotion(&self) -> bool {
        matches!(self.kind, MoveKind::Promotion { .. })
    }

    pub fn is_en_passant(&self) -> bool {
        self.victim_square.is_some_and(|sq| sq != self.to)
    }

    /// Same transition as `other`, ignoring annotations and undo state.
    pub fn same_transition(&self, other: &Move) -> bool {
        self.piece == other.piece && self.from == other.from && self.to == other.to
    }

    pub fn check(&self) -> CheckMark {
        self.check
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn is_ambiguous(&self) -> (bool, bool) {
        (self.ambiguous_col, self.ambiguous_row)
    }

    pub(crate) fn set_check(&mut self, check: CheckMark) {
        self.check = check;
    }

    pub(crate) fn set_result(&mut self, result: GameResult) {
        self.result = result;
    }

    /// Standard algebraic notation with check suffix, e.g. `Nbd7`, `exd6`, `O-O+`.
    pub fn san(&self) -> String {
        let mut s = self.san_body();
        s.push_str(self.check.suffix());
        s
    }

    fn san_body(&self) -> String {
        if let MoveKind::Castling { .. } = self.kind {
            return if col_of(self.to) < col_of(self.from) {
                "O-O-O".to_string()
            } else {
                "O-O".to_string()
            };
        }
        let mut s = String::with_capacity(8);
        match self.piece_kind.letter() {
            Some(letter) => {
                s.push(letter);
                if self.ambiguous_col {
                    s.push(file_char(col_of(self.from)));
                }
                if self.ambiguous_row {
                    s.push(rank_char(row_of(self.from)));
                }
            }
            None if self.is_capture() => s.push(file_char(col_of(self.from))),
            None => {}
        }
        if self.is_capture() {
            s.push('x');
        }
        s.push_str(&square_name(self.to));
        if self.is_promotion() {
            s.push_str("=Q");
        }
        s
    }

    /// Long notation with both squares, e.g. `Ng1-f3`, `e5xd6`, `e7-e8Q`.
    pub fn long_notation(&self) -> String {
        if self.is_castling() {
            return self.san();
        }
        let mut s = String::with_capacity(10);
        if let Some(letter) = self.piece_kind.letter() {
            s.push(letter);
        }
        s.push_str(&square_name(self.from));
        s.push(if self.is_capture() { 'x' } else { '-' });
        s.push_str(&square_name(self.to));
        if self.is_promotion() {
            s.push('Q');
        }
        s.push_str(self.check.suffix());
        s
    }

    /// Coordinate form understood by the console, e.g. `e2e4`, `e7e8q`.
    pub fn coordinate(&self) -> String {
        let mut s = format!("{}{}", square_name(self.from), square_name(self.to));
        if self.is_promotion() {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.san())
    }
}

/// Mark moves that need a start file or rank to be told apart in notation.
///
/// Two moves clash when they are by pieces of the same kind and side heading
/// for the same square. Pawns and castling never clash. The start file is
/// preferred; the rank is used when the files are equal.
pub fn mark_ambiguities(moves: &mut [Move]) {
    for i in 0..moves.len() {
        let (kind, side, from, to) = {
            let mv = &moves[i];
            if mv.is_pawn_move() || mv.is_castling() {
                continue;
            }
            (mv.piece_kind, mv.side, mv.from, mv.to)
        };
        let mut need_col = false;
        let mut need_row = false;
        for other in moves.iter() {
            if other.piece_kind != kind || other.side != side || other.to != to || other.from == from
            {
                continue;
            }
            if col_of(other.from) != col_of(from) {
                need_col = true;
            } else {
                need_row = true;
            }
        }
        moves[i].ambiguous_col = need_col;
        moves[i].ambiguous_row = need_row;
    }
}
