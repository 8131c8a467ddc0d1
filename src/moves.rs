use serde::{Deserialize, Serialize};

use crate::error::ChessError;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: (usize, usize),
    pub to: (usize, usize),
}

/// Square name, e.g. (6, 4) -> "e2". Row 0 is rank 8.
pub fn square_name((row, col): (usize, usize)) -> String {
    let file = (b'a' + col as u8) as char;
    let rank = (b'8' - row as u8) as char;
    format!("{file}{rank}")
}

/// Parse a square name such as "e2" into (row, col).
pub fn parse_square(s: &str) -> Result<(usize, usize), ChessError> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(s.to_string()));
    }
    let (file, rank) = (bytes[0].to_ascii_lowercase(), bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidSquare(s.to_string()));
    }
    Ok(((b'8' - rank) as usize, (file - b'a') as usize))
}

impl Move {
    pub fn new(from: (usize, usize), to: (usize, usize)) -> Self {
        Move { from, to }
    }

    /// Coordinate notation, e.g. "e2e4".
    pub fn to_notation(&self) -> String {
        format!("{}{}", square_name(self.from), square_name(self.to))
    }

    /// Parse coordinate notation
    pub fn from_notation(s: &str) -> Result<Move, ChessError> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return Err(ChessError::InvalidNotation(s.to_string()));
        }
        let from = parse_square(&s[..2])?;
        let to = parse_square(&s[2..])?;
        Ok(Move { from, to })
    }
}
