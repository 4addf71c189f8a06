//! Integration tests for checkmate-rust board rules.
//!
//! Positions are built either by replaying moves from the initial position or
//! by placing pieces directly. Perft counts for the reference positions are
//! the published values for standard chess; the depths used here are shallow
//! enough that no under-promotion can occur.

use checkmate_rust::board::{Board, GameResult, Terminal};
use checkmate_rust::config::PieceValues;
use checkmate_rust::notation::match_token;
use checkmate_rust::perft::perft;
use checkmate_rust::piece::{PieceKind, Side};
use checkmate_rust::square::{SquareId, parse_square};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn sq(name: &str) -> SquareId {
    parse_square(name).unwrap()
}

/// Play a move given in any accepted notation and evaluate the new position.
fn play(board: &mut Board, token: &str) -> Option<Terminal> {
    let mv = match_token(token, board.current_moves())
        .cloned()
        .unwrap_or_else(|| panic!("{token} is not legal here"));
    board.apply_move(mv);
    board.evaluate_terminal()
}

/// Replay moves from the initial position.
fn setup_position(moves: &[&str]) -> Board {
    let mut board = Board::new(PieceValues::HARD);
    for token in moves {
        play(&mut board, token);
    }
    board
}

fn layout(side: Side, pieces: &[(PieceKind, Side, &str)]) -> Board {
    Board::from_layout(PieceValues::HARD, side, pieces).unwrap()
}

fn sans(board: &Board) -> Vec<String> {
    board.current_moves().iter().map(|mv| mv.san()).collect()
}

/// "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -"
fn kiwipete() -> Board {
    use PieceKind::*;
    use Side::*;
    layout(
        White,
        &[
            (Rook, Black, "a8"),
            (King, Black, "e8"),
            (Rook, Black, "h8"),
            (Pawn, Black, "a7"),
            (Pawn, Black, "c7"),
            (Pawn, Black, "d7"),
            (Queen, Black, "e7"),
            (Pawn, Black, "f7"),
            (Bishop, Black, "g7"),
            (Bishop, Black, "a6"),
            (Knight, Black, "b6"),
            (Pawn, Black, "e6"),
            (Knight, Black, "f6"),
            (Pawn, Black, "g6"),
            (Pawn, White, "d5"),
            (Knight, White, "e5"),
            (Pawn, Black, "b4"),
            (Pawn, White, "e4"),
            (Knight, White, "c3"),
            (Queen, White, "f3"),
            (Pawn, Black, "h3"),
            (Pawn, White, "a2"),
            (Pawn, White, "b2"),
            (Pawn, White, "c2"),
            (Bishop, White, "d2"),
            (Bishop, White, "e2"),
            (Pawn, White, "f2"),
            (Pawn, White, "g2"),
            (Pawn, White, "h2"),
            (Rook, White, "a1"),
            (King, White, "e1"),
            (Rook, White, "h1"),
        ],
    )
}

// =============================================================================
// Move generation counts
// =============================================================================

#[test]
fn test_initial_moves() {
    let board = Board::new(PieceValues::HARD);
    assert_eq!(board.current_moves().len(), 20);
    assert_eq!(board.side_to_move(), Side::White);
    let moves = sans(&board);
    for expected in ["e4", "e3", "Nf3", "Na3", "h4"] {
        assert!(moves.contains(&expected.to_string()), "missing {expected}");
    }
}

#[test]
fn test_perft_initial_position() {
    let mut board = Board::new(PieceValues::HARD);
    assert_eq!(perft(&mut board, 2), 400);
    assert_eq!(perft(&mut board, 3), 8902);
}

#[test]
fn test_perft_kiwipete() {
    let mut board = kiwipete();
    assert_eq!(perft(&mut board, 1), 48);
    assert_eq!(perft(&mut board, 2), 2039);
}

#[test]
fn test_perft_rook_endgame() {
    // "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -"
    use PieceKind::*;
    use Side::*;
    let mut board = layout(
        White,
        &[
            (Pawn, Black, "c7"),
            (Pawn, Black, "d6"),
            (King, White, "a5"),
            (Pawn, White, "b5"),
            (Rook, Black, "h5"),
            (Rook, White, "b4"),
            (Pawn, Black, "f4"),
            (King, Black, "h4"),
            (Pawn, White, "e2"),
            (Pawn, White, "g2"),
        ],
    );
    assert_eq!(perft(&mut board, 1), 14);
    assert_eq!(perft(&mut board, 2), 191);
    assert_eq!(perft(&mut board, 3), 2812);
}

// =============================================================================
// Make / unmake
// =============================================================================

#[test]
fn test_round_trip_restores_everything() {
    let mut board = kiwipete();
    let before = board.snapshot();
    let material = (board.material(Side::White), board.material(Side::Black));
    for mv in board.current_moves().to_vec() {
        let prior = board.simulate(&mv);
        board.undo_simulation(&mv, prior);
        assert_eq!(board.snapshot(), before, "round trip of {}", mv.long_notation());
    }
    assert_eq!(
        (board.material(Side::White), board.material(Side::Black)),
        material
    );
}

#[test]
fn test_legal_moves_never_leave_king_attacked() {
    let positions = [
        kiwipete(),
        setup_position(&["e4", "d5", "Bb5+"]),
        setup_position(&["f3", "e5", "g4"]),
    ];
    for mut board in positions {
        let side = board.side_to_move();
        for mv in board.current_moves().to_vec() {
            let prior = board.simulate(&mv);
            assert!(!board.in_check(side), "{} leaves the king attacked", mv.long_notation());
            board.undo_simulation(&mv, prior);
        }
    }
}

#[test]
fn test_pinned_piece_cannot_move() {
    let board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "e1"),
            (PieceKind::Bishop, Side::White, "e2"),
            (PieceKind::Rook, Side::Black, "e8"),
            (PieceKind::King, Side::Black, "a8"),
        ],
    );
    assert!(board.find_move(sq("e2"), sq("d3")).is_none());
    assert!(board.current_moves().iter().all(|mv| mv.from != sq("e2")));
}

#[test]
fn test_check_must_be_answered() {
    let board = setup_position(&["e4", "d5", "Bb5+"]);
    assert!(board.is_check());
    let moves = sans(&board);
    assert!(moves.contains(&"c6".to_string()));
    assert!(moves.contains(&"Bd7".to_string()));
    assert!(!moves.contains(&"dxe4".to_string()));
    assert_eq!(board.last_move().map(|mv| mv.san()), Some("Bb5+".to_string()));
}

// =============================================================================
// Special moves
// =============================================================================

#[test]
fn test_en_passant_capture() {
    let mut board = setup_position(&["e4", "a6", "e5", "d5"]);
    let mv = board
        .find_move(sq("e5"), sq("d6"))
        .cloned()
        .expect("en passant available");
    assert!(mv.is_en_passant());
    assert_eq!(mv.san(), "exd6");

    let before = board.snapshot();
    play(&mut board, "exd6");
    assert!(board.piece_at(sq("d5")).is_none());
    assert_eq!(board.piece_at(sq("d6")).map(|p| p.side), Some(Side::White));
    assert_eq!(board.roster(Side::Black).len(), 15);

    board.undo_last_move();
    board.evaluate_terminal();
    assert_eq!(board.snapshot(), before);
    assert_eq!(board.piece_at(sq("d5")).map(|p| p.kind), Some(PieceKind::Pawn));
}

#[test]
fn test_en_passant_expires() {
    let board = setup_position(&["e4", "a6", "e5", "d5", "h3", "h6"]);
    assert!(board.find_move(sq("e5"), sq("d6")).is_none());
}

#[test]
fn test_castling_and_undo() {
    let mut board = setup_position(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"]);
    assert!(sans(&board).contains(&"O-O".to_string()));

    play(&mut board, "O-O");
    assert_eq!(board.piece_at(sq("g1")).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(board.piece_at(sq("f1")).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(board.piece_at(sq("h1")).is_none());
    assert_eq!(board.last_move().map(|mv| mv.san()), Some("O-O".to_string()));

    board.undo_last_move();
    board.evaluate_terminal();
    assert_eq!(board.piece_at(sq("e1")).map(|p| p.move_count), Some(0));
    assert_eq!(board.piece_at(sq("h1")).map(|p| p.move_count), Some(0));
    assert!(sans(&board).contains(&"O-O".to_string()));
}

#[test]
fn test_castling_through_attack_is_illegal() {
    let board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "e1"),
            (PieceKind::Rook, Side::White, "a1"),
            (PieceKind::Rook, Side::White, "h1"),
            (PieceKind::Bishop, Side::Black, "c4"),
            (PieceKind::King, Side::Black, "e8"),
        ],
    );
    // f1 is covered by the bishop
    assert!(board.find_move(sq("e1"), sq("g1")).is_none());
    assert!(board.find_move(sq("e1"), sq("c1")).is_some());
}

#[test]
fn test_no_castling_out_of_check() {
    let board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "e1"),
            (PieceKind::Rook, Side::White, "h1"),
            (PieceKind::Rook, Side::Black, "e5"),
            (PieceKind::King, Side::Black, "a8"),
        ],
    );
    assert!(board.is_check());
    assert!(board.current_moves().iter().all(|mv| !mv.is_castling()));
}

#[test]
fn test_moved_rook_loses_castling() {
    let board = setup_position(&["h4", "a6", "Rh3", "b6", "Rh1", "c6", "e4", "d6", "Nf3", "g6", "Be2", "h6"]);
    assert!(board.find_move(sq("e1"), sq("g1")).is_none());
}

#[test]
fn test_promotion_to_queen() {
    let mut board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "e1"),
            (PieceKind::Pawn, Side::White, "a7"),
            (PieceKind::King, Side::Black, "h8"),
        ],
    );
    let mv = board.find_move(sq("a7"), sq("a8")).cloned().unwrap();
    assert!(mv.is_promotion());
    assert_eq!(mv.rating(), 2 * PieceValues::HARD.queen);

    play(&mut board, "a8=Q");
    assert_eq!(board.last_move().map(|mv| mv.san()), Some("a8=Q+".to_string()));
    assert!(board.is_check());
    let queen = board.piece_on(sq("a8")).unwrap();
    assert_eq!(board.piece(queen).kind, PieceKind::Queen);
    assert_eq!(board.roster(Side::White).len(), 2);

    board.undo_last_move();
    board.evaluate_terminal();
    assert_eq!(board.piece_at(sq("a7")).map(|p| p.kind), Some(PieceKind::Pawn));
    assert!(board.piece_at(sq("a8")).is_none());

    board.redo_move();
    board.evaluate_terminal();
    assert_eq!(board.piece_on(sq("a8")), Some(queen));
}

// =============================================================================
// Notation
// =============================================================================

#[test]
fn test_file_disambiguation() {
    let board = setup_position(&["Nf3", "a6", "d4", "a5"]);
    let moves = sans(&board);
    assert!(moves.contains(&"Nbd2".to_string()));
    assert!(moves.contains(&"Nfd2".to_string()));
    assert!(moves.contains(&"Nc3".to_string()));
}

#[test]
fn test_rank_disambiguation() {
    let board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "h2"),
            (PieceKind::Rook, Side::White, "a1"),
            (PieceKind::Rook, Side::White, "a5"),
            (PieceKind::King, Side::Black, "h8"),
        ],
    );
    let moves = sans(&board);
    assert!(moves.contains(&"R1a3".to_string()));
    assert!(moves.contains(&"R5a3".to_string()));
    assert!(moves.contains(&"Rb1".to_string()));
}

#[test]
fn test_tokens_in_every_form() {
    for token in ["Nf3", "Ng1f3", "Ng1-f3", "g1f3"] {
        let board = Board::new(PieceValues::HARD);
        let mv = match_token(token, board.current_moves()).unwrap();
        assert_eq!((mv.from, mv.to), (sq("g1"), sq("f3")), "{token}");
    }
    let board = setup_position(&["Nf3", "a6", "d4", "a5"]);
    assert!(match_token("Nd2", board.current_moves()).is_none());
    assert!(match_token("Nbd2", board.current_moves()).is_some());
}

// =============================================================================
// Terminal states
// =============================================================================

#[test]
fn test_fools_mate() {
    let mut board = setup_position(&["f3", "e5", "g4"]);
    let terminal = play(&mut board, "Qh4#");
    assert_eq!(terminal, Some(Terminal::Checkmate { winner: Side::Black }));
    let last = board.last_move().unwrap();
    assert_eq!(last.san(), "Qh4#");
    assert_eq!(last.result(), GameResult::BlackWins);
    assert!(board.current_moves().is_empty());
}

#[test]
fn test_back_rank_mate_position() {
    let mut board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "g1"),
            (PieceKind::Pawn, Side::White, "f2"),
            (PieceKind::Pawn, Side::White, "g2"),
            (PieceKind::Pawn, Side::White, "h2"),
            (PieceKind::Rook, Side::Black, "e1"),
            (PieceKind::King, Side::Black, "g8"),
        ],
    );
    assert!(board.current_moves().is_empty());
    assert!(board.is_check());
    let terminal = board.evaluate_terminal();
    assert_eq!(terminal, Some(Terminal::Checkmate { winner: Side::Black }));
    assert!(terminal.unwrap().has_winner());
}

#[test]
fn test_stalemate() {
    let mut board = layout(
        Side::Black,
        &[
            (PieceKind::King, Side::Black, "a8"),
            (PieceKind::King, Side::White, "b6"),
            (PieceKind::Queen, Side::White, "c7"),
        ],
    );
    assert!(!board.is_check());
    let terminal = board.evaluate_terminal();
    assert_eq!(terminal, Some(Terminal::Stalemate));
    assert!(!Terminal::Stalemate.has_winner());
    assert_eq!(Terminal::Stalemate.result(), GameResult::Draw);
}

#[test]
fn test_fifty_move_rule() {
    let mut board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "e1"),
            (PieceKind::Rook, Side::White, "a1"),
            (PieceKind::King, Side::Black, "e8"),
        ],
    );
    board.set_countdown(98);
    assert_eq!(play(&mut board, "Kd1"), None);
    assert_eq!(board.countdown(), 99);
    assert_eq!(play(&mut board, "Kd8"), Some(Terminal::FiftyMoveRule));
}

#[test]
fn test_threefold_repetition() {
    let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
    let mut board = Board::new(PieceValues::HARD);
    let mut last = None;
    for (ply, token) in shuffle.iter().cycle().take(8).enumerate() {
        last = play(&mut board, token);
        if ply < 7 {
            assert_eq!(last, None, "ended early at ply {ply}");
        }
    }
    assert_eq!(last, Some(Terminal::Repetition));
    assert_eq!(board.last_move().unwrap().result(), GameResult::Draw);
}

#[test]
fn test_endgame_flag_follows_rosters() {
    let mut board = layout(
        Side::White,
        &[
            (PieceKind::King, Side::White, "e1"),
            (PieceKind::Pawn, Side::White, "a2"),
            (PieceKind::Pawn, Side::White, "b2"),
            (PieceKind::Pawn, Side::White, "c2"),
            (PieceKind::Pawn, Side::White, "d2"),
            (PieceKind::King, Side::Black, "e8"),
            (PieceKind::Pawn, Side::Black, "a7"),
            (PieceKind::Pawn, Side::Black, "b7"),
            (PieceKind::Pawn, Side::Black, "c7"),
            (PieceKind::Pawn, Side::Black, "d7"),
            (PieceKind::Pawn, Side::Black, "e7"),
        ],
    );
    // White has five pieces, Black six: not yet an endgame
    assert!(!board.is_endgame());

    play(&mut board, "d4");
    play(&mut board, "e5");
    play(&mut board, "dxe5");
    assert!(!board.is_endgame());
    play(&mut board, "d6");
    play(&mut board, "exd6");
    // Black is down to four pieces
    assert_eq!(board.roster(Side::Black).len(), 4);
    assert!(board.is_endgame());
}
