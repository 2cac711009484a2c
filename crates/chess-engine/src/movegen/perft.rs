//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a given depth, which
//! can be compared against known-correct values.

use super::generate_moves;
use crate::Position;

/// Counts leaf nodes at `depth`, walking the tree with make/unmake.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        let undo = position.make_move(m);
        nodes += perft(position, depth - 1);
        position.unmake_move(m, undo);
    }
    nodes
}

/// Node count below each root move, sorted by UCI text. Useful to find the
/// move whose subtree disagrees with a reference engine.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(position);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        let undo = position.make_move(m);
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        position.unmake_move(m, undo);
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    fn check(fen: &str, depth: u32, expected: u64) {
        let mut position = Position::from_fen(fen).unwrap();
        let before = position.clone();
        assert_eq!(perft(&mut position, depth), expected, "{fen} depth {depth}");
        assert_eq!(position, before);
    }

    #[test]
    fn startpos() {
        let mut position = Position::startpos();
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 2), 400);
        assert_eq!(perft(&mut position, 3), 8902);
        assert_eq!(position, Position::startpos());
    }

    #[test]
    #[ignore]
    fn startpos_depth_4() {
        assert_eq!(perft(&mut Position::startpos(), 4), 197_281);
    }

    #[test]
    fn kiwipete() {
        check(KIWIPETE, 1, 48);
        check(KIWIPETE, 2, 2039);
    }

    // Check evasion, en passant, promotion
    #[test]
    fn position3() {
        check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 1, 14);
        check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 2, 191);
        check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3, 2812);
    }

    // Promotions and captures
    #[test]
    fn position4() {
        let fen = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
        check(fen, 1, 6);
        check(fen, 2, 264);
    }

    #[test]
    fn position5() {
        let fen = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
        check(fen, 1, 44);
        check(fen, 2, 1486);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut position = Position::startpos();
        let results = perft_divide(&mut position, 2);
        assert_eq!(results.len(), 20);
        assert_eq!(results.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert_eq!(results[0].0, "a2a3");
    }
}
