// =============================================================================
// Opponent
//
// The computer side has no strategy: it collects every pseudo-legal move for
// its color and plays one of them uniformly at random. With no moves it
// passes; that is not treated as stalemate.
//
// Coordinate system: row 0 = Black's back rank, col 0 = file a.
// =============================================================================

use crate::board::Board;
use crate::moves::Move;
use crate::piece::Color;

/// Platform-appropriate random number in [0, 1).
/// Uses js_sys::Math::random() in WASM builds, rand crate natively.
pub fn random_f64() -> f64 {
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

/// Pick a random pseudo-legal move for `color`, or `None` if it has none.
pub fn pick_move(board: &Board, color: Color) -> Option<Move> {
    pick_move_with(board, color, random_f64)
}

/// Same as [`pick_move`] but draws from `rand01`, which must return values
/// in [0, 1). Lets tests and seeded self-play replay the same game.
pub fn pick_move_with(board: &Board, color: Color, mut rand01: impl FnMut() -> f64) -> Option<Move> {
    let moves = board.generate_moves(color);
    if moves.is_empty() {
        return None;
    }

    let index = (rand01() * moves.len() as f64) as usize;
    Some(moves[index.min(moves.len() - 1)])
}
