//! Depth-limited alpha-beta search with draw avoidance.
//!
//! Every legal move of the side to move is rated by simulating it and
//! searching the replies below it with a fresh full window. The best-rated
//! moves form a pool from which one is picked at random, so equal moves do not
//! always resolve the same way. With a configurable probability (the
//! "spasm") the engine skips the search and plays a uniformly random legal
//! move instead.
//!
//! Positions are scored from the point of view of the side that is choosing
//! the move (the root side):
//!
//! ```text
//! leaf = material(root) - material(opponent)
//! mate = (leaf with the mated king removed) * 2 * (remaining depth + 1)
//! ```
//!
//! Each move's own bonus (promotion, castling) is added when the root side
//! plays it and subtracted when the opponent does.

use fastrand::Rng;
use tracing::{debug, trace};

use crate::board::Board;
use crate::config::Difficulty;
use crate::constants::*;
use crate::moves::Move;
use crate::piece::Side;

/// A root candidate with its search rating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatedMove {
    pub mv: Move,
    pub rating: i32,
}

pub struct SearchEngine {
    difficulty: Difficulty,
    rng: Rng,
}

impl SearchEngine {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: Rng::new(),
        }
    }

    /// Engine with a reproducible random source.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: Rng::with_seed(seed),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Plies searched below the root move for the current board.
    pub fn depth_for(&self, board: &Board) -> u32 {
        let widen = self.difficulty.endgame_widening && board.is_endgame();
        self.difficulty.depth + u32::from(widen)
    }

    /// Pick a move for the side to move, or `None` if it has no legal move.
    ///
    /// Candidates are the board's current moves, so the board must have been
    /// evaluated since the last change.
    pub fn best_move(&mut self, board: &mut Board) -> Option<Move> {
        let moves = board.current_moves().to_vec();
        if moves.is_empty() {
            return None;
        }
        if self.spasm() {
            let mv = moves[self.rng.usize(..moves.len())].clone();
            debug!(notation = %mv, "spasm, playing a random move");
            return Some(mv);
        }
        let rated = self.rate(board, moves);
        let best = rated.iter().map(|r| r.rating).max()?;
        let pool: Vec<&RatedMove> = rated.iter().filter(|r| r.rating == best).collect();
        let pick = pool[self.rng.usize(..pool.len())];
        debug!(
            notation = %pick.mv,
            rating = best,
            pool = pool.len(),
            candidates = rated.len(),
            "engine move chosen"
        );
        Some(pick.mv.clone())
    }

    /// Rate every current move of the side to move.
    pub fn rate_moves(&mut self, board: &mut Board) -> Vec<RatedMove> {
        let moves = board.current_moves().to_vec();
        self.rate(board, moves)
    }

    fn spasm(&mut self) -> bool {
        self.difficulty.spasm > 0 && self.rng.u32(..self.difficulty.spasm) == 0
    }

    fn rate(&mut self, board: &mut Board, moves: Vec<Move>) -> Vec<RatedMove> {
        let depth = self.depth_for(board);
        let root = board.side_to_move();
        moves
            .into_iter()
            .map(|mv| {
                let rating = self.rate_root(board, &mv, root, depth);
                trace!(notation = %mv, rating, "root move rated");
                RatedMove { mv, rating }
            })
            .collect()
    }

    fn rate_root(&self, board: &mut Board, mv: &Move, root: Side, depth: u32) -> i32 {
        let countdown = board.countdown();
        let prior = board.simulate(mv);
        let (mut rating, stuck) = descend(board, root, depth, -INF, INF);
        if self.difficulty.avoid_draws {
            rating = shape_for_draws(board, mv, countdown, rating);
            if stuck && rating > 0 && !board.in_check(root.opponent()) {
                trace!(notation = %mv, "winning move stalemates");
                rating /= STALEMATE_CRUSH;
            }
        }
        board.undo_simulation(mv, prior);
        rating + mv.rating()
    }
}

/// Damp root candidates that walk into a repetition or a fifty-move draw.
///
/// Called while `mv` is simulated. `countdown` is the fifty-move counter from
/// before the move.
fn shape_for_draws(board: &Board, mv: &Move, countdown: u32, mut rating: i32) -> i32 {
    if board.occurrences(&board.position_key()) > 0 {
        rating /= REPETITION_DAMPING;
    }
    if countdown > DRAW_COUNTDOWN_THRESHOLD {
        if mv.is_pawn_move() || mv.is_capture() {
            if rating > 0 {
                rating *= 2;
            }
            rating += board.values().pawn;
        } else {
            rating /= FIFTY_MOVE_DAMPING;
        }
    }
    rating
}

/// Value of the current (simulated) position for `root`, and whether the side
/// to move is out of moves.
fn descend(board: &mut Board, root: Side, depth: u32, alpha: i32, beta: i32) -> (i32, bool) {
    let to_move = board.side_to_move();
    if depth == 0 {
        let stuck = !board.has_legal_move(to_move);
        return (leaf_rating(board, root, stuck, depth), stuck);
    }
    let replies = board.legal_moves(to_move);
    if replies.is_empty() {
        return (leaf_rating(board, root, true, depth), true);
    }
    (min_max(board, &replies, root, depth - 1, alpha, beta), false)
}

fn min_max(
    board: &mut Board,
    moves: &[Move],
    root: Side,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    let maximizing = board.side_to_move() == root;
    let mut best = if maximizing { -INF } else { INF };
    for mv in moves {
        let prior = board.simulate(mv);
        let (value, _) = descend(board, root, depth, alpha, beta);
        board.undo_simulation(mv, prior);
        let value = if mv.side == root {
            value + mv.rating()
        } else {
            value - mv.rating()
        };
        if maximizing {
            best = best.max(value);
            alpha = alpha.max(best);
        } else {
            best = best.min(value);
            beta = beta.min(best);
        }
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Static rating of the current position for `root`.
///
/// A mated side loses its king's rating, and the difference is scaled so a
/// mate found with more depth remaining (sooner) weighs more.
fn leaf_rating(board: &Board, root: Side, stuck: bool, depth: u32) -> i32 {
    let mut own = board.material(root);
    let mut other = board.material(root.opponent());
    let to_move = board.side_to_move();
    if stuck && board.in_check(to_move) {
        let king = board.king_rating(to_move);
        if to_move == root {
            own -= king;
        } else {
            other -= king;
        }
        return (own - other) * 2 * (depth as i32 + 1);
    }
    own - other
}
