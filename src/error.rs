use thiserror::Error;

/// Errors raised by the parts of the crate that accept outside input.
/// The click-driven game never surfaces these to the player; it logs and
/// carries on.
#[derive(Debug, Error)]
pub enum ChessError {
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("invalid board layout: {0}")]
    InvalidLayout(String),

    #[error("illegal move: {from:?} -> {to:?}")]
    IllegalMove {
        from: (usize, usize),
        to: (usize, usize),
    },

    #[error("not {0}'s turn")]
    NotYourTurn(crate::piece::Color),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
