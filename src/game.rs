// =============================================================================
// Turn scheduling and click handling
//
// The page used to fire the opponent's reply from a timer. Here the wait is an
// explicit phase: after the player's move the game sits in OpponentPending
// until the front end calls play_opponent(), which it does once it has redrawn
// the board and waited `opponent_delay_ms`. Everything runs synchronously.
// =============================================================================

use log::{debug, info};

use crate::board::Board;
use crate::config::GameConfig;
use crate::engine::pick_move;
use crate::moves::Move;
use crate::piece::Color;

/// The player always has the white pieces.
pub const HUMAN: Color = Color::White;
pub const OPPONENT: Color = Color::Black;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    HumanToMove,
    OpponentPending,
    Finished(Color),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing changed.
    Ignored,
    /// A player piece is now selected.
    Selected((usize, usize)),
    /// The previous selection was dropped without moving.
    Deselected,
    /// The selected piece moved.
    Moved(Move),
}

pub struct Game {
    board: Board,
    config: GameConfig,
    phase: Phase,
    selection: Option<(usize, usize)>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_board(config, Board::new())
    }

    /// Start from an arbitrary position. The phase follows the board's side
    /// to move, or is terminal if a king is already missing.
    pub fn with_board(config: GameConfig, board: Board) -> Self {
        let mut game = Game {
            board,
            config,
            phase: Phase::HumanToMove,
            selection: None,
        };
        let next = if game.board.current_turn == OPPONENT {
            Phase::OpponentPending
        } else {
            Phase::HumanToMove
        };
        game.phase = game.settle(next);
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Throw the current game away and set up the starting position again.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.phase = Phase::HumanToMove;
        self.selection = None;
        info!("new game");
    }

    pub fn winner(&self) -> Option<Color> {
        if self.config.detect_both_kings {
            self.board.winner()
        } else if self.board.is_king_captured(OPPONENT) {
            Some(HUMAN)
        } else {
            None
        }
    }

    /// Text for the end-of-game overlay, once there is a winner.
    pub fn banner(&self) -> Option<&str> {
        match self.phase {
            Phase::Finished(c) if c == HUMAN => Some(self.config.win_message.as_str()),
            Phase::Finished(_) => Some(self.config.loss_message.as_str()),
            _ => None,
        }
    }

    /// Destinations to highlight for the selected piece.
    pub fn highlights(&self) -> Vec<(usize, usize)> {
        self.selection
            .map(|from| self.board.legal_destinations(from))
            .unwrap_or_default()
    }

    fn is_human_piece(&self, square: (usize, usize)) -> bool {
        self.board.piece_at(square).map(|p| p.color == HUMAN).unwrap_or(false)
    }

    fn settle(&self, next: Phase) -> Phase {
        match self.winner() {
            Some(color) => {
                info!("{color} wins");
                Phase::Finished(color)
            }
            None => next,
        }
    }

    /// Handle a click on (row, col). With a piece selected, a click on one of
    /// its legal destinations moves it; any other click drops the selection
    /// and, if it lands on another player piece, selects that one instead.
    /// Illegal attempts are not reported beyond a debug log line.
    pub fn click(&mut self, row: usize, col: usize) -> ClickOutcome {
        if self.phase != Phase::HumanToMove {
            debug!("click at ({row}, {col}) ignored in {:?}", self.phase);
            return ClickOutcome::Ignored;
        }
        if row >= 8 || col >= 8 {
            debug!("click at ({row}, {col}) is off the board");
            return ClickOutcome::Ignored;
        }

        let square = (row, col);
        let previous = self.selection.take();

        if let Some(from) = previous {
            if self.board.is_legal(from, square) {
                let mv = Move::new(from, square);
                self.board.apply_move(&mv);
                info!("player plays {}", mv.to_notation());
                self.phase = self.settle(Phase::OpponentPending);
                return ClickOutcome::Moved(mv);
            }
            debug!("rejected {:?} -> {:?}", from, square);
        }

        if self.is_human_piece(square) {
            self.selection = Some(square);
            debug!("selected {:?}", square);
            ClickOutcome::Selected(square)
        } else if previous.is_some() {
            ClickOutcome::Deselected
        } else {
            ClickOutcome::Ignored
        }
    }

    /// Play a typed move as a fresh pair of clicks. Any earlier selection is
    /// dropped first so the source click cannot itself complete a move.
    pub fn play_move(&mut self, mv: &Move) -> ClickOutcome {
        self.selection = None;
        match self.click(mv.from.0, mv.from.1) {
            ClickOutcome::Selected(_) => self.click(mv.to.0, mv.to.1),
            _ => ClickOutcome::Ignored,
        }
    }

    /// The opponent's half of the turn. Does nothing unless a reply is due.
    /// When the opponent has no legal move the turn passes back silently.
    pub fn play_opponent(&mut self) -> Option<Move> {
        if self.phase != Phase::OpponentPending {
            return None;
        }

        let mv = pick_move(&self.board, OPPONENT);
        match mv {
            Some(m) => {
                self.board.apply_move(&m);
                info!("opponent plays {}", m.to_notation());
            }
            None => {
                self.board.current_turn = HUMAN;
                info!("opponent has no move; passing");
            }
        }
        self.phase = self.settle(Phase::HumanToMove);
        mv
    }
}
