//! Search behaviour tests: move choice, mate detection and draw avoidance.

use checkmate_rust::board::{Board, Terminal};
use checkmate_rust::config::{Difficulty, PieceValues};
use checkmate_rust::constants::REPETITION_DAMPING;
use checkmate_rust::notation::match_token;
use checkmate_rust::piece::{PieceKind, Side};
use checkmate_rust::search::{RatedMove, SearchEngine};
use checkmate_rust::square::parse_square;

// =============================================================================
// Helpers
// =============================================================================

/// Depth-zero profile without randomness, optionally steering away from draws.
fn flat(avoid_draws: bool) -> Difficulty {
    Difficulty {
        name: "Flat",
        depth: 0,
        spasm: 0,
        endgame_widening: false,
        avoid_draws,
        values: PieceValues::HARD,
    }
}

fn layout(side: Side, pieces: &[(PieceKind, Side, &str)]) -> Board {
    Board::from_layout(PieceValues::HARD, side, pieces).unwrap()
}

fn play(board: &mut Board, token: &str) -> Option<Terminal> {
    let mv = match_token(token, board.current_moves()).cloned().unwrap();
    board.apply_move(mv);
    board.evaluate_terminal()
}

fn rating_of(rated: &[RatedMove], from: &str, to: &str) -> i32 {
    let (from, to) = (parse_square(from).unwrap(), parse_square(to).unwrap());
    rated
        .iter()
        .find(|r| r.mv.from == from && r.mv.to == to)
        .map(|r| r.rating)
        .unwrap_or_else(|| panic!("no rated move between the squares"))
}

/// Ratings of the same board with and without draw shaping, keyed by move.
fn shaped_and_plain(board: &mut Board) -> Vec<(RatedMove, i32)> {
    let shaped = SearchEngine::with_seed(flat(true), 1).rate_moves(board);
    let plain = SearchEngine::with_seed(flat(false), 1).rate_moves(board);
    shaped
        .into_iter()
        .map(|rated| {
            let plain_rating = plain
                .iter()
                .find(|p| p.mv.same_transition(&rated.mv))
                .map(|p| p.rating)
                .unwrap();
            (rated, plain_rating)
        })
        .collect()
}

// =============================================================================
// Move choice
// =============================================================================

#[test]
fn test_seeded_engines_agree() {
    for seed in [3, 17, 99] {
        let mut a = Board::new(PieceValues::EASY);
        let mut b = Board::new(PieceValues::EASY);
        let first = SearchEngine::with_seed(Difficulty::EASY, seed).best_move(&mut a).unwrap();
        let second = SearchEngine::with_seed(Difficulty::EASY, seed).best_move(&mut b).unwrap();
        assert!(first.same_transition(&second), "seed {seed}");
    }
}

#[test]
fn test_random_profile_plays_legal_moves() {
    let mut board = Board::new(PieceValues::RANDOM);
    let mut engine = SearchEngine::with_seed(Difficulty::RANDOM, 5);
    for _ in 0..20 {
        let mv = engine.best_move(&mut board).unwrap();
        assert!(board.current_moves().iter().any(|m| m.same_transition(&mv)));
        board.apply_move(mv);
        if board.evaluate_terminal().is_some() {
            break;
        }
    }
}

#[test]
fn test_search_leaves_board_untouched() {
    let mut board = Board::new(PieceValues::HARD);
    play(&mut board, "e4");
    play(&mut board, "d5");
    let before = board.snapshot();
    let mut engine = SearchEngine::with_seed(Difficulty::EASY.without_spasm(), 11);
    let mv = engine.best_move(&mut board).unwrap();
    assert_eq!(board.snapshot(), before);
    assert!(board.current_moves().iter().any(|m| m.same_transition(&mv)));
}

#[test]
fn test_finds_back_rank_mate() {
    let mut board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "g1"),
            (PieceKind::Rook, Side::White, "a1"),
            (PieceKind::Pawn, Side::White, "f2"),
            (PieceKind::Pawn, Side::White, "g2"),
            (PieceKind::Pawn, Side::White, "h2"),
            (PieceKind::King, Side::Black, "g8"),
            (PieceKind::Pawn, Side::Black, "f7"),
            (PieceKind::Pawn, Side::Black, "g7"),
            (PieceKind::Pawn, Side::Black, "h7"),
        ],
    );
    let mut engine = SearchEngine::with_seed(Difficulty::EASY.without_spasm(), 2);
    let mv = engine.best_move(&mut board).unwrap();
    assert_eq!(mv.long_notation(), "Ra1-a8");
    board.apply_move(mv);
    assert_eq!(
        board.evaluate_terminal(),
        Some(Terminal::Checkmate { winner: Side::White })
    );
}

// =============================================================================
// Draw avoidance
// =============================================================================

#[test]
fn test_prefers_mate_over_stalemate() {
    let mut board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::Black, "a8"),
            (PieceKind::King, Side::White, "b6"),
            (PieceKind::Queen, Side::White, "c1"),
        ],
    );
    let rated = SearchEngine::with_seed(flat(true), 4).rate_moves(&mut board);
    let stalemating = rating_of(&rated, "c1", "c7");
    let quiet = rating_of(&rated, "c1", "c2");
    assert!(stalemating < quiet, "{stalemating} vs {quiet}");

    let mut engine = SearchEngine::with_seed(flat(true), 4);
    let mv = engine.best_move(&mut board).unwrap();
    board.apply_move(mv);
    assert_eq!(
        board.evaluate_terminal(),
        Some(Terminal::Checkmate { winner: Side::White })
    );
}

#[test]
fn test_fifty_move_shaping() {
    let mut board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "e1"),
            (PieceKind::Queen, Side::White, "d4"),
            (PieceKind::Rook, Side::White, "b1"),
            (PieceKind::King, Side::Black, "h8"),
            (PieceKind::Pawn, Side::Black, "a7"),
        ],
    );
    board.set_countdown(85);
    let pawn = board.values().pawn;
    let mut quiet_moves = 0;
    for (rated, plain) in shaped_and_plain(&mut board) {
        if rated.mv.is_capture() {
            assert!(plain > 0);
            assert_eq!(rated.rating, plain * 2 + pawn, "{}", rated.mv);
        } else {
            assert!(plain > 0);
            assert_eq!(rated.rating, plain / 2, "{}", rated.mv);
            quiet_moves += 1;
        }
    }
    assert!(quiet_moves > 10);
}

#[test]
fn test_no_shaping_with_fresh_countdown() {
    let mut board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "e1"),
            (PieceKind::Queen, Side::White, "d4"),
            (PieceKind::Rook, Side::White, "b1"),
            (PieceKind::King, Side::Black, "h8"),
            (PieceKind::Pawn, Side::Black, "a7"),
        ],
    );
    for (rated, plain) in shaped_and_plain(&mut board) {
        assert_eq!(rated.rating, plain, "{}", rated.mv);
    }
}

#[test]
fn test_repetition_damping() {
    let mut board = Board::new(PieceValues::HARD);
    for token in ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6"] {
        play(&mut board, token);
    }
    let pairs = shaped_and_plain(&mut board);
    let g1 = parse_square("g1").unwrap();
    let f3 = parse_square("f3").unwrap();
    for (rated, plain) in pairs {
        if rated.mv.from == f3 && rated.mv.to == g1 {
            assert_eq!(rated.rating, plain / REPETITION_DAMPING);
        } else {
            assert_eq!(rated.rating, plain, "{}", rated.mv);
        }
    }
}
