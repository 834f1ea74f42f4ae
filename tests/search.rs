//! AI move selection through the public API.

use chessboard::engine::{search, AiConfig};
use chessboard::{best_move, evaluate, legal_moves, BoardState, Difficulty, Game};

#[test]
fn best_move_is_always_legal() {
    let mut game = Game::new();
    for uci in ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"] {
        game.play_uci(uci).unwrap();
    }
    let state = game.state().clone();
    for difficulty in [Difficulty::Easy, Difficulty::Medium] {
        let mv = best_move(&state, difficulty).expect("moves available");
        assert!(legal_moves(&state, None).contains(&mv), "{difficulty}: {mv} not legal");
    }
    assert_eq!(game.state(), &state, "search must not touch the game");
}

#[test]
fn deep_searches_return_legal_moves() {
    let rook_ending = BoardState::from_fen("8/5k2/8/3p4/8/2P5/4K3/R7 w - - 0 1").unwrap();
    let mv = best_move(&rook_ending, Difficulty::Hard).expect("moves available");
    assert!(legal_moves(&rook_ending, None).contains(&mv), "hard: {mv} not legal");

    let pawn_ending = BoardState::from_fen("8/8/4k3/8/8/3K4/4P3/8 w - - 0 1").unwrap();
    let mv = best_move(&pawn_ending, Difficulty::Expert).expect("moves available");
    assert!(legal_moves(&pawn_ending, None).contains(&mv), "expert: {mv} not legal");
}

#[test]
fn fifty_move_child_is_scored_by_evaluate() {
    // Every white move is quiet and reaches the fifty-move limit, so Black's
    // Ne4 reply is never searched and a centralised queen keeps its bonus.
    let state = BoardState::from_fen("4k3/8/8/2n5/8/3Q4/8/K7 w - - 99 80").unwrap();
    let result = search(&state, &AiConfig { depth: 2, randomness: 0.0 }, || 0.0).unwrap();
    assert_eq!(result.score, evaluate(&state.after(&result.mv)));
    assert_eq!(result.score, 6.5);
}

#[test]
fn engine_move_can_be_applied() {
    let mut game = Game::new();
    for _ in 0..6 {
        let mv = best_move(game.state(), Difficulty::Easy).expect("moves available");
        game.apply_move(&mv).unwrap();
    }
    assert_eq!(game.ply_count(), 6);
}

#[test]
fn hard_search_is_reproducible() {
    let state = BoardState::from_fen("4k3/8/8/2p5/3Q4/8/8/4K3 w - - 0 1").unwrap();
    let a = best_move(&state, Difficulty::Hard).unwrap();
    let b = best_move(&state, Difficulty::Hard).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_uci(), "d4c5");
}

#[test]
fn black_wins_material_when_it_can() {
    // Black knight can take an undefended white rook.
    let state = BoardState::from_fen("4k3/8/8/8/8/2n5/8/1R2K3 b - - 0 1").unwrap();
    let result = search(&state, &AiConfig { depth: 2, randomness: 0.0 }, || 0.0).unwrap();
    assert_eq!(result.mv.to_uci(), "c3b1");
}

#[test]
fn no_move_when_game_is_over() {
    let stalemate = BoardState::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(best_move(&stalemate, Difficulty::Expert).is_none());
}
