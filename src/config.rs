use serde::{Deserialize, Serialize};

use crate::error::ChessError;

/// Game settings. Every field has a default, so a partial JSON object (or
/// `{}`) is a valid config.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// How long the front end waits after the player's move before asking
    /// the opponent to reply.
    pub opponent_delay_ms: u32,
    /// Report a win for either side. When false only the capture of the
    /// opponent's king ends the game, as the first version of the page did.
    pub detect_both_kings: bool,
    /// Banner shown when the player takes the opponent's king.
    pub win_message: String,
    /// Banner shown when the opponent takes the player's king.
    pub loss_message: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            opponent_delay_ms: 400,
            detect_both_kings: true,
            win_message: "You won the game just like you had won my heart \u{265F}\u{FE0F}\u{1F496}\nHappy Valentine's Day!".to_string(),
            loss_message: "The computer took your king. Try again!".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ChessError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ChessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
