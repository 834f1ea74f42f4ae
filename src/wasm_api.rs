use crate::engine::{pick_move, AiConfig, Difficulty};
use crate::game::{Game, Terminal};
use crate::moves::{Move, MoveRequest};
use crate::piece::{Color, PieceType};
use crate::position::Position;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    piece_type: PieceType,
    color: Color,
}

#[derive(Serialize)]
struct MoveJson {
    from: String,
    to: String,
    promotion: Option<PieceType>,
    captured: bool,
}

impl From<&Move> for MoveJson {
    fn from(m: &Move) -> Self {
        MoveJson {
            from: m.from.to_string(),
            to: m.to.to_string(),
            promotion: m.promotion,
            captured: m.is_capture(),
        }
    }
}

#[derive(Serialize)]
struct BoardStateJson {
    /// Rank 8 first, so rows render top to bottom.
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_turn: Color,
    fen: String,
    is_in_check: bool,
    game_over: bool,
    terminal: Option<Terminal>,
    result: Option<String>,
    legal_moves: Vec<MoveJson>,
    captured_white: Vec<PieceType>,
    captured_black: Vec<PieceType>,
    last_move: Option<MoveJson>,
    can_undo: bool,
}

#[derive(Serialize)]
struct ErrorJson {
    error: String,
}

fn build_board_state(game: &Game) -> BoardStateJson {
    let state = game.state();
    let status = game.status();
    let squares = (0..8)
        .rev()
        .map(|r| {
            (0..8)
                .map(|f| {
                    state.squares[r][f].map(|p| SquarePiece {
                        piece_type: p.piece_type,
                        color: p.color,
                    })
                })
                .collect()
        })
        .collect();

    BoardStateJson {
        squares,
        current_turn: state.side_to_move,
        fen: state.to_fen(),
        is_in_check: status.in_check,
        game_over: status.is_over(),
        terminal: status.terminal,
        result: status.result_text(state.side_to_move),
        legal_moves: game.legal_moves().iter().map(MoveJson::from).collect(),
        captured_white: game.captured(Color::White).iter().map(|p| p.piece_type).collect(),
        captured_black: game.captured(Color::Black).iter().map(|p| p.piece_type).collect(),
        last_move: game.last_move().as_ref().map(MoveJson::from),
        can_undo: game.ply_count() > 0,
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn error_js(message: impl ToString) -> JsValue {
    to_js(&ErrorJson {
        error: message.to_string(),
    })
}

fn parse_difficulty(name: &str) -> Difficulty {
    name.parse().unwrap_or_else(|e| {
        log::warn!("{e}; using {}", Difficulty::default());
        Difficulty::default()
    })
}

/// The browser-facing game handle. Calls must not overlap; run
/// `make_ai_move` in a worker if the UI thread has to stay responsive.
#[wasm_bindgen(js_name = Game)]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen(js_class = Game)]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        console_error_panic_hook::set_once();
        // Only the first call installs the logger.
        let _ = console_log::init_with_level(log::Level::Debug);
        WasmGame { game: Game::new() }
    }

    pub fn reset(&mut self) -> JsValue {
        self.game.reset();
        to_js(&build_board_state(&self.game))
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.game))
    }

    pub fn fen(&self) -> String {
        self.game.state().to_fen()
    }

    pub fn load_fen(&mut self, fen: &str) -> JsValue {
        match Game::from_fen(fen) {
            Ok(game) => {
                self.game = game;
                to_js(&build_board_state(&self.game))
            }
            Err(e) => error_js(e),
        }
    }

    /// Squares are algebraic names ("e2"); promotion is a letter ("q", "n", ...).
    pub fn make_move(&mut self, from: &str, to: &str, promotion: Option<String>) -> JsValue {
        let uci = format!("{from}{to}{}", promotion.as_deref().unwrap_or(""));
        let req: MoveRequest = match uci.parse() {
            Ok(req) => req,
            Err(e) => return error_js(e),
        };
        match self.game.apply_request(&req) {
            Ok(_) => to_js(&build_board_state(&self.game)),
            Err(e) => error_js(e),
        }
    }

    pub fn undo(&mut self) -> JsValue {
        match self.game.undo_move() {
            Ok(_) => to_js(&build_board_state(&self.game)),
            Err(e) => error_js(e),
        }
    }

    pub fn make_ai_move(&mut self, difficulty: &str) -> JsValue {
        if self.game.is_over() {
            return to_js(&build_board_state(&self.game));
        }
        let config = AiConfig::from(parse_difficulty(difficulty));
        if let Some(result) = pick_move(self.game.state(), &config) {
            if let Err(e) = self.game.apply_move(&result.mv) {
                return error_js(e);
            }
        }
        to_js(&build_board_state(&self.game))
    }

    pub fn get_hint(&self, difficulty: &str) -> JsValue {
        if self.game.is_over() {
            return JsValue::NULL;
        }
        let config = AiConfig::from(parse_difficulty(difficulty));
        match pick_move(self.game.state(), &config) {
            Some(result) => to_js(&MoveJson::from(&result.mv)),
            None => JsValue::NULL,
        }
    }

    pub fn get_legal_moves_for_square(&self, square: &str) -> JsValue {
        let from: Position = match square.parse() {
            Ok(sq) => sq,
            Err(e) => return error_js(e),
        };
        if self.game.is_over() {
            return to_js(&Vec::<MoveJson>::new());
        }
        let moves: Vec<MoveJson> = crate::legal_moves(self.game.state(), Some(from))
            .iter()
            .map(MoveJson::from)
            .collect();
        to_js(&moves)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
