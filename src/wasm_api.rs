use crate::board::Board;
use crate::config::GameConfig;
use crate::game::{ClickOutcome, Game, Phase};
use crate::piece::{Color, PieceType};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    piece_type: String,
    color: String,
    /// Layout letter, e.g. "K" or "p"; the page maps it to a glyph.
    code: String,
}

#[derive(Serialize)]
struct MoveJson {
    from: [usize; 2],
    to: [usize; 2],
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_turn: String,
    phase: String,
    selected: Option<[usize; 2]>,
    highlights: Vec<[usize; 2]>,
    last_move: Option<MoveJson>,
    winner: Option<String>,
    banner: Option<String>,
}

#[derive(Serialize)]
struct ClickResult {
    outcome: String,
    state: BoardState,
}

fn piece_type_to_string(pt: PieceType) -> String {
    match pt {
        PieceType::King => "King".to_string(),
        PieceType::Queen => "Queen".to_string(),
        PieceType::Rook => "Rook".to_string(),
        PieceType::Bishop => "Bishop".to_string(),
        PieceType::Knight => "Knight".to_string(),
        PieceType::Pawn => "Pawn".to_string(),
    }
}

fn color_to_string(c: Color) -> String {
    c.to_string()
}

fn phase_to_string(phase: Phase) -> String {
    match phase {
        Phase::HumanToMove => "HumanToMove".to_string(),
        Phase::OpponentPending => "OpponentPending".to_string(),
        Phase::Finished(_) => "Finished".to_string(),
    }
}

fn outcome_to_string(outcome: ClickOutcome) -> String {
    match outcome {
        ClickOutcome::Ignored => "Ignored".to_string(),
        ClickOutcome::Selected(_) => "Selected".to_string(),
        ClickOutcome::Deselected => "Deselected".to_string(),
        ClickOutcome::Moved(_) => "Moved".to_string(),
    }
}

fn build_squares(board: &Board) -> Vec<Vec<Option<SquarePiece>>> {
    (0..8)
        .map(|r| {
            (0..8)
                .map(|c| {
                    board.squares[r][c].map(|p| SquarePiece {
                        piece_type: piece_type_to_string(p.piece_type),
                        color: color_to_string(p.color),
                        code: p.to_char().to_string(),
                    })
                })
                .collect()
        })
        .collect()
}

fn build_board_state(game: &Game) -> BoardState {
    let board = game.board();
    BoardState {
        squares: build_squares(board),
        current_turn: color_to_string(board.current_turn),
        phase: phase_to_string(game.phase()),
        selected: game.selection().map(|(r, c)| [r, c]),
        highlights: game.highlights().into_iter().map(|(r, c)| [r, c]).collect(),
        last_move: board.last_move.map(|m| MoveJson {
            from: [m.from.0, m.from.1],
            to: [m.to.0, m.to.1],
        }),
        winner: match game.phase() {
            Phase::Finished(c) => Some(color_to_string(c)),
            _ => None,
        },
        banner: game.banner().map(str::to_string),
    }
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        WebGame { game: Game::default() }
    }

    /// Start a game with settings given as a JSON object; missing fields take
    /// their defaults.
    pub fn with_config(json: &str) -> Result<WebGame, JsValue> {
        let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebGame { game: Game::new(config) })
    }

    pub fn state(&self) -> JsValue {
        let state = build_board_state(&self.game);
        serde_wasm_bindgen::to_value(&state).unwrap_or(JsValue::NULL)
    }

    pub fn click(&mut self, row: usize, col: usize) -> JsValue {
        let outcome = self.game.click(row, col);
        let result = ClickResult {
            outcome: outcome_to_string(outcome),
            state: build_board_state(&self.game),
        };
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    /// Called by the page `opponent_delay_ms` after a `Moved` click has been
    /// drawn.
    pub fn play_opponent(&mut self) -> JsValue {
        self.game.play_opponent();
        self.state()
    }

    pub fn legal_destinations(&self, row: usize, col: usize) -> JsValue {
        let targets: Vec<[usize; 2]> = self
            .game
            .board()
            .legal_destinations((row, col))
            .into_iter()
            .map(|(r, c)| [r, c])
            .collect();
        serde_wasm_bindgen::to_value(&targets).unwrap_or(JsValue::NULL)
    }

    pub fn opponent_delay_ms(&self) -> u32 {
        self.game.config().opponent_delay_ms
    }

    pub fn reset(&mut self) -> JsValue {
        self.game.reset();
        self.state()
    }
}
