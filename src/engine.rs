// =============================================================================
// Chess AI
//
// Depth-limited minimax with alpha-beta pruning over the legal move generator
// and the static evaluator. White maximizes, Black minimizes. Moves are
// searched in generator order on scratch copies of the position, so the
// caller's game is never touched.
//
// Weaker difficulties differ from stronger ones in two ways: a shallower
// depth, and random noise added to each root move's score before the best
// one is chosen.
// =============================================================================

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::eval::evaluate;
use crate::movegen::legal_moves;
use crate::moves::Move;
use crate::piece::Color;

/// Platform-appropriate random number in [0, 1).
/// Uses js_sys::Math::random() in WASM builds, rand crate natively.
fn random_f64() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Math::random()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }
}

// =============================================================================
// Configuration
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Search depth in plies.
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
            Difficulty::Expert => 5,
        }
    }

    /// Upper bound of the noise added to each root move's score.
    pub fn randomness(self) -> f64 {
        match self {
            Difficulty::Easy => 2.0,
            Difficulty::Medium => 1.0,
            Difficulty::Hard | Difficulty::Expert => 0.0,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        })
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown difficulty {s:?} (expected easy, medium, hard or expert)"))
    }
}

/// Search parameters. Usually built from a [`Difficulty`].
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize, Debug)]
pub struct AiConfig {
    /// Search depth in plies. 0 picks by static evaluation alone.
    pub depth: u32,
    /// Root moves get `uniform(0, randomness)` added to their score.
    pub randomness: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Difficulty::default().into()
    }
}

impl From<Difficulty> for AiConfig {
    fn from(d: Difficulty) -> Self {
        AiConfig {
            depth: d.depth(),
            randomness: d.randomness(),
        }
    }
}

/// The result of a move search: the chosen move, its minimax score (White's
/// perspective, without noise) and the number of static evaluations.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub mv: Move,
    pub score: f64,
    pub evals: u64,
}

// =============================================================================
// Search
// =============================================================================

/// Minimax with alpha-beta pruning. Scores are from White's perspective.
///
/// A node is a leaf at depth 0 or when the game is over there: no legal
/// moves, the fifty-move limit, or insufficient material. Repetition needs
/// the game record, so scratch positions never end on it.
fn minimax(
    state: &BoardState,
    depth: u32,
    mut alpha: f64,
    mut beta: f64,
    evals: &mut u64,
) -> f64 {
    if depth == 0 || is_drawn(state) {
        *evals += 1;
        return evaluate(state);
    }

    let moves = legal_moves(state);
    if moves.is_empty() {
        *evals += 1;
        return evaluate(state);
    }

    if state.side_to_move == Color::White {
        let mut best = f64::NEG_INFINITY;
        for mv in &moves {
            let score = minimax(&state.after(mv), depth - 1, alpha, beta, evals);
            best = best.max(score);
            alpha = alpha.max(score);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = f64::INFINITY;
        for mv in &moves {
            let score = minimax(&state.after(mv), depth - 1, alpha, beta, evals);
            best = best.min(score);
            beta = beta.min(score);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Draws that can be read off a single position.
fn is_drawn(state: &BoardState) -> bool {
    state.halfmove_clock >= 100 || state.has_insufficient_material()
}

/// Pick a move for the side to move in `state`.
///
/// Every root move is scored with a full-window minimax to `depth - 1`
/// further plies. Each score is turned to the mover's perspective, `noise()`
/// scaled by `randomness` is added, and the highest total wins; ties keep
/// the earliest move in generator order. `noise` must return values in
/// [0, 1).
pub fn search(
    state: &BoardState,
    config: &AiConfig,
    mut noise: impl FnMut() -> f64,
) -> Option<SearchResult> {
    let moves = legal_moves(state);
    if moves.is_empty() {
        return None;
    }

    let perspective = state.side_to_move.sign();
    let child_depth = config.depth.saturating_sub(1);
    let mut evals = 0u64;
    let mut best: Option<(f64, SearchResult)> = None;

    for mv in moves {
        let score = minimax(
            &state.after(&mv),
            child_depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            &mut evals,
        );
        let jitter = if config.randomness > 0.0 {
            noise() * config.randomness
        } else {
            0.0
        };
        let total = perspective * score + jitter;
        trace!("root {mv}: score {score:.2}, noisy {total:.2}");

        if best.as_ref().map_or(true, |(b, _)| total > *b) {
            best = Some((total, SearchResult { mv, score, evals: 0 }));
        }
    }

    best.map(|(_, mut result)| {
        result.evals = evals;
        debug!(
            "picked {} at depth {} (score {:.2}, {} evals)",
            result.mv, config.depth, result.score, result.evals
        );
        result
    })
}

/// Pick a move using the global random source.
pub fn pick_move(state: &BoardState, config: &AiConfig) -> Option<SearchResult> {
    search(state, config, random_f64)
}

/// Best move for the side to move at the given difficulty, or `None` when
/// there are no legal moves.
pub fn best_move(state: &BoardState, difficulty: Difficulty) -> Option<Move> {
    pick_move(state, &difficulty.into()).map(|r| r.mv)
}
