//! Move generation verification by counting leaf nodes of the legal move tree.

use crate::board::Board;

/// Number of leaf positions `depth` plies below the current position.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.legal_moves(board.side_to_move());
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in &moves {
        let prior = board.simulate(mv);
        nodes += perft(board, depth - 1);
        board.undo_simulation(mv, prior);
    }
    nodes
}

/// Leaf counts per root move, keyed by coordinate notation and sorted.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let moves = board.legal_moves(board.side_to_move());
    let mut counts: Vec<(String, u64)> = moves
        .iter()
        .map(|mv| {
            let prior = board.simulate(mv);
            let nodes = perft(board, depth.saturating_sub(1));
            board.undo_simulation(mv, prior);
            (mv.coordinate(), nodes)
        })
        .collect();
    counts.sort();
    counts
}
