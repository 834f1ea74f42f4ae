//! Node counts against published perft results.

use chessboard::movegen::perft;
use chessboard::BoardState;

fn perft_fen(fen: &str, depth: u32) -> u64 {
    perft(&BoardState::from_fen(fen).unwrap(), depth)
}

#[test]
fn startpos() {
    let state = BoardState::new();
    assert_eq!(perft(&state, 1), 20);
    assert_eq!(perft(&state, 2), 400);
    assert_eq!(perft(&state, 3), 8_902);
}

#[test]
fn kiwipete() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    assert_eq!(perft_fen(fen, 1), 48);
    assert_eq!(perft_fen(fen, 2), 2_039);
}

#[test]
fn position_3_en_passant_and_pins() {
    let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    assert_eq!(perft_fen(fen, 1), 14);
    assert_eq!(perft_fen(fen, 2), 191);
    assert_eq!(perft_fen(fen, 3), 2_812);
}

#[test]
fn position_4_promotions_and_castling() {
    let fen = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    assert_eq!(perft_fen(fen, 1), 6);
    assert_eq!(perft_fen(fen, 2), 264);
}

#[test]
fn position_5() {
    let fen = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
    assert_eq!(perft_fen(fen, 1), 44);
    assert_eq!(perft_fen(fen, 2), 1_486);
}
