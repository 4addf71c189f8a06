//! Chess board state, move legality and make/unmake.
//!
//! The board owns two arenas: 64 [`Square`]s and every [`Piece`] ever created.
//! Squares and pieces refer to each other by index, and each side has a roster
//! of the piece ids still in play. A single make/unmake pair
//! ([`Board::simulate`] / [`Board::undo_simulation`]) serves the legality
//! filter, the search and committed play; [`Board::apply_move`] and
//! [`Board::undo_last_move`] add the history bookkeeping on top.

use std::fmt;

use tracing::{debug, info};

use crate::config::PieceValues;
use crate::constants::*;
use crate::error::{ChessError, ChessResult};
use crate::moves::{mark_ambiguities, CheckMark, Move, MoveKind, PriorState};
use crate::piece::{Piece, PieceId, PieceKind, Side};
use crate::square::{offset, parse_square, rank_char, row_of, square_at, Square, SquareId};

/// Back rank from the queen-side corner.
const BACK_RANK: [PieceKind; N] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Result tag recorded on the last move and in the export header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    #[default]
    Ongoing,
}

impl GameResult {
    pub fn tag(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Ongoing => "*",
        }
    }

    pub fn win_for(side: Side) -> Self {
        match side {
            Side::White => GameResult::WhiteWins,
            Side::Black => GameResult::BlackWins,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Why a game is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminal {
    Checkmate { winner: Side },
    Stalemate,
    /// A hundred plies without a pawn move or a capture
    FiftyMoveRule,
    /// The same position occurred for the third time
    Repetition,
    Resignation { winner: Side },
}

impl Terminal {
    pub fn winner(self) -> Option<Side> {
        match self {
            Terminal::Checkmate { winner } | Terminal::Resignation { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn has_winner(self) -> bool {
        self.winner().is_some()
    }

    pub fn result(self) -> GameResult {
        self.winner().map_or(GameResult::Draw, GameResult::win_for)
    }

    pub fn reason(self) -> &'static str {
        match self {
            Terminal::Checkmate { .. } => "checkmate",
            Terminal::Stalemate => "stalemate",
            Terminal::FiftyMoveRule => "fifty-move rule",
            Terminal::Repetition => "threefold repetition",
            Terminal::Resignation { .. } => "resignation",
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner() {
            Some(winner) => write!(f, "{}, {} wins", self.reason(), winner),
            None => write!(f, "{}, draw", self.reason()),
        }
    }
}

/// Exact identity of a position for repetition detection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    cells: [u8; BOARDSIZE],
    side: Side,
    castling: [[bool; 2]; 2],
    en_passant: Option<SquareId>,
}

/// Comparable view of everything a make/unmake pair must restore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    occupancy: Vec<Option<PieceId>>,
    rosters: [Vec<PieceId>; 2],
    pieces: Vec<(PieceId, Option<SquareId>, u32, bool)>,
    side_to_move: Side,
    en_passant: Option<PieceId>,
    countdown: u32,
}

#[derive(Clone, Debug)]
pub struct Board {
    squares: Vec<Square>,
    pieces: Vec<Piece>,
    rosters: [Vec<PieceId>; 2],
    values: PieceValues,
    side_to_move: Side,
    /// Pawn that just made a double step
    en_passant: Option<PieceId>,
    /// Plies since the last pawn move or capture
    countdown: u32,
    history: Vec<Move>,
    future: Vec<Move>,
    /// Key of the starting position and of the position after every committed move
    positions: Vec<PositionKey>,
    current_moves: Vec<Move>,
    check: bool,
    endgame: bool,
    edit_mode: bool,
}

impl Board {
    /// Standard starting position.
    pub fn new(values: PieceValues) -> Self {
        let mut board = Self::empty(values);
        for side in [Side::White, Side::Black] {
            let home = side.home_row();
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                board.place(kind, side, square_at(col, home));
            }
            for col in 0..N {
                board.place(PieceKind::Pawn, side, square_at(col, side.pawn_row()));
            }
        }
        board.finish_setup();
        board
    }

    /// Board with no pieces. Use [`Board::place`] and [`Board::finish_setup`]
    /// to build a position, or [`Board::from_layout`].
    pub fn empty(values: PieceValues) -> Self {
        Self {
            squares: (0..BOARDSIZE).map(Square::new).collect(),
            pieces: Vec::with_capacity(40),
            rosters: [Vec::with_capacity(16), Vec::with_capacity(16)],
            values,
            side_to_move: Side::White,
            en_passant: None,
            countdown: 0,
            history: Vec::new(),
            future: Vec::new(),
            positions: Vec::new(),
            current_moves: Vec::new(),
            check: false,
            endgame: false,
            edit_mode: false,
        }
    }

    /// Build a position from `(kind, side, square name)` triples.
    pub fn from_layout(
        values: PieceValues,
        side_to_move: Side,
        layout: &[(PieceKind, Side, &str)],
    ) -> ChessResult<Self> {
        let mut board = Self::empty(values);
        for &(kind, side, name) in layout {
            let sq = parse_square(name)?;
            if board.squares[sq].piece.is_some() {
                return Err(ChessError::InvalidSetup(format!("{name} is occupied twice")));
            }
            if kind == PieceKind::Pawn && (row_of(sq) == 0 || row_of(sq) == N - 1) {
                return Err(ChessError::InvalidSetup(format!("pawn on the back rank at {name}")));
            }
            board.place(kind, side, sq);
        }
        for side in [Side::White, Side::Black] {
            let kings = board.rosters[side.index()]
                .iter()
                .filter(|&&id| board.pieces[id].kind == PieceKind::King)
                .count();
            if kings != 1 {
                return Err(ChessError::InvalidSetup(format!("{side} has {kings} kings")));
            }
        }
        board.side_to_move = side_to_move;
        if board.in_check(side_to_move.opponent()) {
            return Err(ChessError::InvalidSetup(format!(
                "{} is in check but not to move",
                side_to_move.opponent()
            )));
        }
        board.finish_setup();
        Ok(board)
    }

    /// Put a new piece on an empty square during setup.
    ///
    /// A king or rook placed away from its home square counts as moved, so it
    /// never gains castling rights.
    pub fn place(&mut self, kind: PieceKind, side: Side, sq: SquareId) -> PieceId {
        assert!(self.squares[sq].piece.is_none(), "square {sq} already occupied");
        let id = self.spawn(kind, side);
        let home = side.home_row();
        let at_home = match kind {
            PieceKind::King => sq == square_at(KING_COL, home),
            PieceKind::Rook => {
                sq == square_at(QUEEN_ROOK_COL, home) || sq == square_at(KING_ROOK_COL, home)
            }
            _ => true,
        };
        if !at_home {
            self.pieces[id].move_count = 1;
        }
        self.put(id, sq);
        self.rosters[side.index()].push(id);
        id
    }

    /// Start the position log and compute the moves available from here.
    pub fn finish_setup(&mut self) {
        self.positions = vec![self.position_key()];
        self.evaluate_terminal();
    }

    fn spawn(&mut self, kind: PieceKind, side: Side) -> PieceId {
        self.pieces
            .push(Piece::new(kind, side, self.values.rating(kind), None));
        self.pieces.len() - 1
    }

    #[inline]
    fn put(&mut self, id: PieceId, sq: SquareId) {
        self.squares[sq].piece = Some(id);
        self.pieces[id].square = Some(sq);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id]
    }

    #[inline]
    pub fn piece_on(&self, sq: SquareId) -> Option<PieceId> {
        self.squares[sq].piece
    }

    pub fn piece_at(&self, sq: SquareId) -> Option<&Piece> {
        self.squares[sq].piece.map(|id| &self.pieces[id])
    }

    pub fn square(&self, sq: SquareId) -> &Square {
        &self.squares[sq]
    }

    pub fn roster(&self, side: Side) -> &[PieceId] {
        &self.rosters[side.index()]
    }

    pub fn values(&self) -> &PieceValues {
        &self.values
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn en_passant(&self) -> Option<PieceId> {
        self.en_passant
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Override the fifty-move counter of a constructed position.
    pub fn set_countdown(&mut self, plies: u32) {
        self.countdown = plies;
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn future(&self) -> &[Move] {
        &self.future
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Legal moves of the side to move as of the last [`Board::evaluate_terminal`].
    pub fn current_moves(&self) -> &[Move] {
        &self.current_moves
    }

    /// The current move from `from` to `to`, if there is one.
    pub fn find_move(&self, from: SquareId, to: SquareId) -> Option<&Move> {
        self.current_moves
            .iter()
            .find(|mv| mv.from == from && mv.to == to)
    }

    /// Whether the side to move was in check at the last evaluation.
    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_endgame(&self) -> bool {
        self.endgame
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, edit: bool) {
        self.edit_mode = edit;
    }

    fn find_king(&self, side: Side) -> Option<PieceId> {
        self.rosters[side.index()]
            .iter()
            .copied()
            .find(|&id| self.pieces[id].kind == PieceKind::King)
    }

    fn king_square(&self, side: Side) -> SquareId {
        self.find_king(side)
            .and_then(|id| self.pieces[id].square)
            .unwrap_or_else(|| panic!("{side} has no king on the board"))
    }

    /// Base rating of `side`'s king.
    pub fn king_rating(&self, side: Side) -> i32 {
        self.find_king(side)
            .map_or(self.values.king, |id| self.pieces[id].rating)
    }

    /// Sum of piece values (rating plus table bonus) of `side`'s roster.
    pub fn material(&self, side: Side) -> i32 {
        self.rosters[side.index()]
            .iter()
            .map(|&id| self.pieces[id].value(self.endgame))
            .sum()
    }

    // -------------------------------------------------------------------------
    // Attacks and move generation
    // -------------------------------------------------------------------------

    fn holds(&self, sq: SquareId, side: Side, kinds: &[PieceKind]) -> bool {
        self.piece_at(sq)
            .is_some_and(|p| p.side == side && kinds.contains(&p.kind))
    }

    /// Whether any piece of `by` attacks `sq`, looking outward from the target.
    pub fn is_attacked(&self, sq: SquareId, by: Side) -> bool {
        let back = -by.forward();
        for dc in [-1, 1] {
            if let Some(from) = offset(sq, dc, back) {
                if self.holds(from, by, &[PieceKind::Pawn]) {
                    return true;
                }
            }
        }
        let leapers = [
            (&KNIGHT_LEAPS, PieceKind::Knight),
            (&KING_STEPS, PieceKind::King),
        ];
        for (leaps, kind) in leapers {
            for &(dc, dr) in leaps {
                if let Some(from) = offset(sq, dc, dr) {
                    if self.holds(from, by, &[kind]) {
                        return true;
                    }
                }
            }
        }
        let sliders = [
            (&ORTHOGONAL, PieceKind::Rook),
            (&DIAGONAL, PieceKind::Bishop),
        ];
        for (rays, kind) in sliders {
            for &(dc, dr) in rays {
                let mut cur = sq;
                while let Some(next) = offset(cur, dc, dr) {
                    if self.squares[next].piece.is_some() {
                        if self.holds(next, by, &[kind, PieceKind::Queen]) {
                            return true;
                        }
                        break;
                    }
                    cur = next;
                }
            }
        }
        false
    }

    pub fn in_check(&self, side: Side) -> bool {
        self.is_attacked(self.king_square(side), side.opponent())
    }

    /// Moves allowed by piece geometry, without castling and without the self-check filter.
    pub fn pseudo_legal_moves(&self, side: Side) -> Vec<Move> {
        let mut out = Vec::with_capacity(48);
        for &id in &self.rosters[side.index()] {
            self.pieces[id].pseudo_legal_moves(id, self, &mut out);
        }
        out
    }

    /// Moves of `side` that do not leave its own king attacked, castling included.
    pub fn legal_moves(&mut self, side: Side) -> Vec<Move> {
        let candidates = self.pseudo_legal_moves(side);
        let mut legal = Vec::with_capacity(candidates.len());
        for mv in candidates {
            if self.leaves_king_safe(&mv) {
                legal.push(mv);
            }
        }
        if !self.in_check(side) {
            legal.extend(self.castling_moves(side));
        }
        legal
    }

    /// Like `!legal_moves(side).is_empty()` but stops at the first legal move.
    pub fn has_legal_move(&mut self, side: Side) -> bool {
        self.pseudo_legal_moves(side)
            .iter()
            .any(|mv| self.leaves_king_safe(mv))
    }

    fn leaves_king_safe(&mut self, mv: &Move) -> bool {
        let prior = self.simulate(mv);
        let safe = !self.in_check(mv.side);
        self.undo_simulation(mv, prior);
        safe
    }

    /// Castling rights as [king side, queen side].
    fn castling_rights(&self, side: Side) -> [bool; 2] {
        let home = side.home_row();
        let king_ready = self.find_king(side).is_some_and(|id| {
            let king = &self.pieces[id];
            !king.has_moved() && king.square == Some(square_at(KING_COL, home))
        });
        [KING_ROOK_COL, QUEEN_ROOK_COL].map(|col| {
            king_ready
                && self
                    .piece_at(square_at(col, home))
                    .is_some_and(|p| p.kind == PieceKind::Rook && p.side == side && !p.has_moved())
        })
    }

    /// Castling moves for a side that is not in check.
    fn castling_moves(&self, side: Side) -> Vec<Move> {
        let mut out = Vec::new();
        let rights = self.castling_rights(side);
        let home = side.home_row();
        let king_from = square_at(KING_COL, home);
        let wings = [(KING_ROOK_COL, 6, 5), (QUEEN_ROOK_COL, 2, 3)];
        for (right, (rook_col, king_col, rook_to_col)) in rights.into_iter().zip(wings) {
            if !right {
                continue;
            }
            let (lo, hi) = (rook_col.min(KING_COL) + 1, rook_col.max(KING_COL));
            if (lo..hi).any(|col| self.squares[square_at(col, home)].piece.is_some()) {
                continue;
            }
            // the king may not cross or land on an attacked square
            let crossed = square_at(rook_to_col, home);
            let king_to = square_at(king_col, home);
            if [crossed, king_to]
                .iter()
                .any(|&sq| self.is_attacked(sq, side.opponent()))
            {
                continue;
            }
            let (Some(king), Some(rook)) = (self.piece_on(king_from), self.piece_on(square_at(rook_col, home)))
            else {
                continue;
            };
            out.push(Move::castling(
                king,
                &self.pieces[king],
                king_from,
                king_to,
                rook,
                square_at(rook_col, home),
                crossed,
                self.values.pawn,
            ));
        }
        out
    }

    // -------------------------------------------------------------------------
    // Make / unmake
    // -------------------------------------------------------------------------

    /// Execute `mv` and return what [`Board::undo_simulation`] needs to revert it.
    ///
    /// Updates occupancy, rosters, capture flags, move counts, the en passant
    /// pawn, the fifty-move countdown and the side to move.
    pub fn simulate(&mut self, mv: &Move) -> PriorState {
        let side = mv.side;
        let mut prior = PriorState {
            en_passant: self.en_passant,
            countdown: self.countdown,
            victim_slot: None,
            pawn_slot: None,
            created: None,
        };

        if let (Some(victim), Some(victim_sq)) = (mv.victim, mv.victim_square) {
            self.squares[victim_sq].piece = None;
            let roster = &mut self.rosters[side.opponent().index()];
            let slot = roster
                .iter()
                .position(|&id| id == victim)
                .unwrap_or_else(|| panic!("captured piece {victim} is not in play"));
            roster.remove(slot);
            prior.victim_slot = Some(slot);
            let piece = &mut self.pieces[victim];
            piece.captured = true;
            piece.square = None;
        }

        self.squares[mv.from].piece = None;
        match mv.kind {
            MoveKind::Standard => self.put(mv.piece, mv.to),
            MoveKind::Castling {
                rook,
                rook_from,
                rook_to,
            } => {
                self.put(mv.piece, mv.to);
                self.squares[rook_from].piece = None;
                self.put(rook, rook_to);
                self.pieces[rook].move_count += 1;
            }
            MoveKind::Promotion { queen } => {
                self.pieces[mv.piece].square = None;
                let queen = match queen {
                    Some(id) => id,
                    None => {
                        let id = self.spawn(PieceKind::Queen, side);
                        prior.created = Some(id);
                        id
                    }
                };
                let roster = &mut self.rosters[side.index()];
                let slot = roster
                    .iter()
                    .position(|&id| id == mv.piece)
                    .unwrap_or_else(|| panic!("promoting pawn {} is not in play", mv.piece));
                roster[slot] = queen;
                prior.pawn_slot = Some(slot);
                self.pieces[queen].captured = false;
                self.put(queen, mv.to);
            }
        }
        self.pieces[mv.piece].move_count += 1;

        let double_step = mv.is_pawn_move() && row_of(mv.from).abs_diff(row_of(mv.to)) == 2;
        self.en_passant = double_step.then_some(mv.piece);
        self.countdown = if mv.is_pawn_move() || mv.is_capture() {
            0
        } else {
            self.countdown + 1
        };
        self.side_to_move = side.opponent();
        prior
    }

    /// Revert a [`Board::simulate`] call. Must be called in LIFO order.
    pub fn undo_simulation(&mut self, mv: &Move, prior: PriorState) {
        let side = mv.side;
        self.side_to_move = side;
        self.en_passant = prior.en_passant;
        self.countdown = prior.countdown;
        self.pieces[mv.piece].move_count -= 1;

        self.squares[mv.to].piece = None;
        match mv.kind {
            MoveKind::Standard => {}
            MoveKind::Castling {
                rook,
                rook_from,
                rook_to,
            } => {
                self.squares[rook_to].piece = None;
                self.put(rook, rook_from);
                self.pieces[rook].move_count -= 1;
            }
            MoveKind::Promotion { queen } => {
                let queen = prior
                    .created
                    .or(queen)
                    .unwrap_or_else(|| panic!("promotion at {} lost its queen", mv.to));
                let slot = prior
                    .pawn_slot
                    .unwrap_or_else(|| panic!("promotion at {} lost its roster slot", mv.to));
                self.rosters[side.index()][slot] = mv.piece;
                self.pieces[queen].square = None;
                if prior.created == Some(queen) {
                    debug_assert_eq!(queen, self.pieces.len() - 1, "promotions undone out of order");
                    self.pieces.pop();
                }
            }
        }
        self.put(mv.piece, mv.from);

        if let (Some(victim), Some(victim_sq)) = (mv.victim, mv.victim_square) {
            let slot = prior
                .victim_slot
                .unwrap_or_else(|| panic!("capture at {victim_sq} lost its roster slot"));
            self.rosters[side.opponent().index()].insert(slot, victim);
            self.pieces[victim].captured = false;
            self.put(victim, victim_sq);
        }
    }

    /// Commit `mv` to the game history.
    pub fn apply_move(&mut self, mut mv: Move) {
        let mut prior = self.simulate(&mv);
        if let (MoveKind::Promotion { queen: None }, Some(queen)) = (mv.kind, prior.created.take()) {
            mv.kind = MoveKind::Promotion { queen: Some(queen) };
        }
        mv.prior = Some(prior);
        debug!(side = %mv.side, notation = %mv.long_notation(), "move applied");
        self.history.push(mv);
        self.positions.push(self.position_key());
    }

    /// Take back the last committed move, parking it on the future stack.
    pub fn undo_last_move(&mut self) -> Option<&Move> {
        let mut mv = self.history.pop()?;
        let prior = mv
            .prior
            .take()
            .unwrap_or_else(|| panic!("committed move {} has no undo record", mv.long_notation()));
        self.undo_simulation(&mv, prior);
        self.positions.pop();
        debug!(notation = %mv.long_notation(), "move taken back");
        self.future.push(mv);
        self.future.last()
    }

    /// Replay the most recently undone move. The rest of the future stays.
    pub fn redo_move(&mut self) -> Option<&Move> {
        let mv = self.future.pop()?;
        self.apply_move(mv);
        self.history.last()
    }

    pub fn clear_future(&mut self) {
        self.future.clear();
    }

    // -------------------------------------------------------------------------
    // Position evaluation
    // -------------------------------------------------------------------------

    pub fn position_key(&self) -> PositionKey {
        let mut cells = [0u8; BOARDSIZE];
        for (cell, square) in cells.iter_mut().zip(&self.squares) {
            if let Some(id) = square.piece {
                let piece = &self.pieces[id];
                *cell = 1 + piece.kind as u8 + 8 * piece.side.index() as u8;
            }
        }
        // the target only counts while an enemy pawn stands ready to take it
        let en_passant = self.en_passant.and_then(|id| {
            let pawn = &self.pieces[id];
            let sq = pawn.square?;
            let capturable = [-1, 1].into_iter().any(|dc| {
                offset(sq, dc, 0)
                    .and_then(|beside| self.piece_at(beside))
                    .is_some_and(|p| p.kind == PieceKind::Pawn && p.side != pawn.side)
            });
            if capturable {
                offset(sq, 0, -pawn.side.forward())
            } else {
                None
            }
        });
        PositionKey {
            cells,
            side: self.side_to_move,
            castling: [
                self.castling_rights(Side::White),
                self.castling_rights(Side::Black),
            ],
            en_passant,
        }
    }

    /// How often `key` occurred in the committed game so far.
    pub fn occurrences(&self, key: &PositionKey) -> usize {
        self.positions.iter().filter(|k| *k == key).count()
    }

    fn update_endgame(&mut self) {
        let endgame = self.rosters.iter().any(|r| r.len() <= ENDGAME_PIECES);
        if endgame != self.endgame {
            info!(endgame, "endgame state changed");
            self.endgame = endgame;
        }
    }

    /// Recompute the moves of the side to move and decide whether the game is over.
    ///
    /// Also refreshes the check flag, the endgame flag and the check and result
    /// annotations on the last committed move. In edit mode with moves left to
    /// redo, no terminal state is reported.
    pub fn evaluate_terminal(&mut self) -> Option<Terminal> {
        self.update_endgame();
        let side = self.side_to_move;
        let mut moves = self.legal_moves(side);
        mark_ambiguities(&mut moves);
        self.current_moves = moves;
        self.check = self.in_check(side);

        let terminal = if self.edit_mode && !self.future.is_empty() {
            None
        } else if self.current_moves.is_empty() {
            Some(if self.check {
                Terminal::Checkmate { winner: side.opponent() }
            } else {
                Terminal::Stalemate
            })
        } else if self.countdown >= FIFTY_MOVE_PLIES {
            Some(Terminal::FiftyMoveRule)
        } else if self
            .positions
            .last()
            .is_some_and(|key| self.occurrences(key) >= REPETITION_LIMIT)
        {
            Some(Terminal::Repetition)
        } else {
            None
        };

        let check = self.check;
        if let Some(last) = self.history.last_mut() {
            last.set_check(match terminal {
                Some(Terminal::Checkmate { .. }) => CheckMark::Mate,
                _ if check => CheckMark::Check,
                _ => CheckMark::None,
            });
            last.set_result(terminal.map_or(GameResult::Ongoing, Terminal::result));
        }
        if let Some(terminal) = terminal {
            info!(%terminal, "game over");
        }
        terminal
    }

    /// Record `result` on the last committed move.
    pub(crate) fn stamp_result(&mut self, result: GameResult) {
        if let Some(last) = self.history.last_mut() {
            last.set_result(result);
        }
    }

    /// Comparable state for make/unmake round-trip checks.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut pieces: Vec<_> = self
            .rosters
            .iter()
            .flatten()
            .map(|&id| {
                let p = &self.pieces[id];
                (id, p.square, p.move_count, p.captured)
            })
            .collect();
        pieces.sort_unstable();
        BoardSnapshot {
            occupancy: self.squares.iter().map(|s| s.piece).collect(),
            rosters: self.rosters.clone(),
            pieces,
            side_to_move: self.side_to_move,
            en_passant: self.en_passant,
            countdown: self.countdown,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for row in 0..N {
            write!(f, "{} ", rank_char(row))?;
            for col in 0..N {
                let ch = match self.piece_at(square_at(col, row)) {
                    Some(p) => p.kind.symbol(p.side),
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f, "{}", rank_char(row))?;
        }
        write!(f, "  a b c d e f g h")
    }
}
