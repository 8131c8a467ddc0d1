use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChessError;
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};

/// Starting position, row 0 first. Uppercase is White, lowercase Black.
pub const STARTING_LAYOUT: [&str; 8] = [
    "rnbqkbnr",
    "pppppppp",
    "........",
    "........",
    "........",
    "........",
    "PPPPPPPP",
    "RNBQKBNR",
];

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Board {
    pub squares: [[Option<Piece>; 8]; 8],
    pub current_turn: Color,
    /// Only kept so front ends can mark the last move; legality never reads it.
    pub last_move: Option<Move>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            current_turn: Color::White,
            last_move: None,
        }
    }

    pub fn new() -> Self {
        let mut board = Board::empty();

        // Black pieces (rows 0-1)
        for (col, pt) in BACK_RANK.iter().enumerate() {
            board.squares[0][col] = Some(Piece::new(*pt, Color::Black));
        }
        for sq in &mut board.squares[1] {
            *sq = Some(Piece::new(PieceType::Pawn, Color::Black));
        }

        // White pieces (rows 6-7)
        for sq in &mut board.squares[6] {
            *sq = Some(Piece::new(PieceType::Pawn, Color::White));
        }
        for (col, pt) in BACK_RANK.iter().enumerate() {
            board.squares[7][col] = Some(Piece::new(*pt, Color::White));
        }

        board
    }

    /// Build a board from eight rows of eight layout characters, White to move.
    /// The grid is taken as-is: no check for king counts or pawn placement.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ChessError> {
        if rows.len() != 8 {
            return Err(ChessError::InvalidLayout(format!("expected 8 rows, got {}", rows.len())));
        }
        let mut board = Board::empty();
        for (r, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != 8 {
                return Err(ChessError::InvalidLayout(format!("row {r} has {} squares", chars.len())));
            }
            for (c, ch) in chars.into_iter().enumerate() {
                board.squares[r][c] = match ch {
                    '.' => None,
                    _ => Some(Piece::from_char(ch).ok_or_else(|| {
                        ChessError::InvalidLayout(format!("unknown piece '{ch}' at ({r}, {c})"))
                    })?),
                };
            }
        }
        Ok(board)
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.squares
            .iter()
            .map(|row| row.iter().map(|sq| sq.map(Piece::to_char).unwrap_or('.')).collect::<String>())
            .collect()
    }

    fn in_bounds(row: i32, col: i32) -> bool {
        (0..8).contains(&row) && (0..8).contains(&col)
    }

    fn on_board((row, col): (usize, usize)) -> bool {
        row < 8 && col < 8
    }

    pub fn piece_at(&self, (row, col): (usize, usize)) -> Option<Piece> {
        if Self::on_board((row, col)) {
            self.squares[row][col]
        } else {
            None
        }
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().filter(|sq| sq.is_some()).count()
    }

    pub fn find_king(&self, color: Color) -> Option<(usize, usize)> {
        for r in 0..8 {
            for c in 0..8 {
                if let Some(p) = self.squares[r][c] {
                    if p.piece_type == PieceType::King && p.color == color {
                        return Some((r, c));
                    }
                }
            }
        }
        None
    }

    pub fn is_king_captured(&self, color: Color) -> bool {
        self.find_king(color).is_none()
    }

    /// The color whose king is still standing once the other's is gone.
    /// If both are missing (only possible on a hand-built grid) the side that
    /// just moved is credited.
    pub fn winner(&self) -> Option<Color> {
        match (self.find_king(Color::White), self.find_king(Color::Black)) {
            (Some(_), Some(_)) => None,
            (Some(_), None) => Some(Color::White),
            (None, Some(_)) => Some(Color::Black),
            (None, None) => Some(self.current_turn.opposite()),
        }
    }

    // =========================================================================
    // Move legality
    //
    // Pseudo-legal only: kings may walk into attacked squares and nothing ever
    // looks at check. The side to move is not consulted either; callers pick
    // whose pieces they ask about.
    // =========================================================================

    pub fn is_legal(&self, from: (usize, usize), to: (usize, usize)) -> bool {
        if !Self::on_board(from) || !Self::on_board(to) || from == to {
            return false;
        }

        let piece = match self.squares[from.0][from.1] {
            Some(p) => p,
            None => return false,
        };
        let target = self.squares[to.0][to.1];

        if target.map(|t| t.color == piece.color).unwrap_or(false) {
            return false;
        }

        let dr = to.0 as i32 - from.0 as i32;
        let dc = to.1 as i32 - from.1 as i32;

        match piece.piece_type {
            PieceType::Pawn => self.is_pawn_move(from, piece.color, dr, dc, target.is_some()),
            PieceType::Rook => self.straight_clear(from, to),
            PieceType::Bishop => self.diagonal_clear(from, to),
            PieceType::Queen => self.straight_clear(from, to) || self.diagonal_clear(from, to),
            PieceType::Knight => matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2)),
            PieceType::King => dr.abs() <= 1 && dc.abs() <= 1,
        }
    }

    fn is_pawn_move(&self, from: (usize, usize), color: Color, dr: i32, dc: i32, capture: bool) -> bool {
        let dir = color.pawn_direction();

        // Single push
        if dc == 0 && dr == dir && !capture {
            return true;
        }

        // Double push from the home rank, both squares empty
        if dc == 0 && dr == 2 * dir && !capture && from.0 == color.home_rank() {
            let mid = (from.0 as i32 + dir) as usize;
            return self.squares[mid][from.1].is_none();
        }

        // Diagonal capture; same-color targets were already rejected
        dc.abs() == 1 && dr == dir && capture
    }

    fn straight_clear(&self, from: (usize, usize), to: (usize, usize)) -> bool {
        if from.0 != to.0 && from.1 != to.1 {
            return false;
        }
        self.path_clear(from, to)
    }

    fn diagonal_clear(&self, from: (usize, usize), to: (usize, usize)) -> bool {
        let dr = (to.0 as i32 - from.0 as i32).abs();
        let dc = (to.1 as i32 - from.1 as i32).abs();
        if dr != dc {
            return false;
        }
        self.path_clear(from, to)
    }

    /// Every square strictly between `from` and `to` is empty. Both squares
    /// must share a row, column or diagonal.
    fn path_clear(&self, from: (usize, usize), to: (usize, usize)) -> bool {
        let step_r = (to.0 as i32 - from.0 as i32).signum();
        let step_c = (to.1 as i32 - from.1 as i32).signum();
        let mut r = from.0 as i32 + step_r;
        let mut c = from.1 as i32 + step_c;
        while Self::in_bounds(r, c) && (r, c) != (to.0 as i32, to.1 as i32) {
            if self.squares[r as usize][c as usize].is_some() {
                return false;
            }
            r += step_r;
            c += step_c;
        }
        true
    }

    /// All squares the piece on `from` may move to, in row-major order.
    pub fn legal_destinations(&self, from: (usize, usize)) -> Vec<(usize, usize)> {
        let mut targets = Vec::new();
        for r in 0..8 {
            for c in 0..8 {
                if self.is_legal(from, (r, c)) {
                    targets.push((r, c));
                }
            }
        }
        targets
    }

    /// Every pseudo-legal move for `color`, ordered by source then destination.
    pub fn generate_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();

        for row in 0..8usize {
            for col in 0..8usize {
                match self.squares[row][col] {
                    Some(piece) if piece.color == color => {}
                    _ => continue,
                }
                for to in self.legal_destinations((row, col)) {
                    moves.push(Move::new((row, col), to));
                }
            }
        }

        moves
    }

    // =========================================================================
    // Move execution
    // =========================================================================

    /// Apply a move the caller has already validated. Whatever stood on the
    /// destination is overwritten, which is how captures happen.
    pub fn apply_move(&mut self, m: &Move) {
        let (fr, fc) = m.from;
        let (tr, tc) = m.to;
        if !Self::on_board(m.from) || !Self::on_board(m.to) {
            return;
        }

        let piece = match self.squares[fr][fc] {
            Some(p) => p,
            None => return,
        };

        self.squares[tr][tc] = Some(piece);
        self.squares[fr][fc] = None;
        self.last_move = Some(*m);
        self.current_turn = self.current_turn.opposite();
    }

    /// Validate a move for the side to move and apply it.
    pub fn try_move(&mut self, m: &Move) -> Result<(), ChessError> {
        let illegal = ChessError::IllegalMove { from: m.from, to: m.to };
        let piece = self.piece_at(m.from).ok_or(illegal)?;
        if piece.color != self.current_turn {
            return Err(ChessError::NotYourTurn(piece.color));
        }
        if !self.is_legal(m.from, m.to) {
            return Err(ChessError::IllegalMove { from: m.from, to: m.to });
        }
        self.apply_move(m);
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: (usize, usize), to: (usize, usize)) -> Move {
        Move { from, to }
    }

    fn board(rows: [&str; 8]) -> Board {
        Board::from_rows(&rows).expect("test layout should parse")
    }

    #[test]
    fn new_matches_starting_layout() {
        let b = Board::new();
        assert_eq!(b.to_rows(), STARTING_LAYOUT.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        assert_eq!(b, Board::from_rows(&STARTING_LAYOUT).unwrap());
        assert_eq!(b.current_turn, Color::White);
        assert_eq!(b.piece_count(), 32);
    }

    #[test]
    fn from_rows_rejects_bad_layouts() {
        assert!(Board::from_rows(&["........"; 7]).is_err());
        let mut rows = ["........"; 8];
        rows[3] = "...x....";
        assert!(matches!(Board::from_rows(&rows), Err(ChessError::InvalidLayout(_))));
        rows[3] = ".......";
        assert!(Board::from_rows(&rows).is_err());
    }

    #[test]
    fn basic_rejections() {
        let b = Board::new();
        assert!(!b.is_legal((6, 4), (6, 4)), "null move");
        assert!(!b.is_legal((4, 4), (3, 4)), "empty source");
        assert!(!b.is_legal((7, 0), (6, 0)), "own piece on target");
        assert!(!b.is_legal((6, 4), (8, 4)), "off the board");
    }

    #[test]
    fn starting_pawns_step_forward_only() {
        let b = Board::new();
        for col in 0..8 {
            assert!(b.is_legal((6, col), (5, col)), "white pawn {col} single step");
            assert!(b.is_legal((1, col), (2, col)), "black pawn {col} single step");
            assert!(!b.is_legal((6, col), (7, col)), "white pawn {col} backward");
            assert!(!b.is_legal((1, col), (0, col)), "black pawn {col} backward");
        }

        let mut open = Board::empty();
        open.squares[4][4] = Some(Piece::new(PieceType::Pawn, Color::White));
        assert!(!open.is_legal((4, 4), (4, 3)), "sideways");
        assert!(!open.is_legal((4, 4), (4, 5)), "sideways");
        assert!(!open.is_legal((4, 4), (5, 4)), "backward");
        assert!(!open.is_legal((4, 4), (3, 3)), "diagonal onto empty square");
    }

    #[test]
    fn double_step_needs_home_rank_and_clear_path() {
        let b = Board::new();
        assert!(b.is_legal((6, 4), (4, 4)));
        assert!(b.is_legal((1, 3), (3, 3)));
        assert!(!b.is_legal((6, 4), (3, 4)), "triple step");

        let blocked = board([
            "....k...",
            "........",
            "........",
            "........",
            "........",
            "....n...",
            "....P...",
            "....K...",
        ]);
        assert!(!blocked.is_legal((6, 4), (4, 4)), "intermediate occupied");
        assert!(!blocked.is_legal((6, 4), (5, 4)), "pawns never capture straight ahead");

        let dest_blocked = board([
            "....k...",
            "........",
            "........",
            "........",
            "....n...",
            "........",
            "....P...",
            "....K...",
        ]);
        assert!(!dest_blocked.is_legal((6, 4), (4, 4)), "destination occupied");
        assert!(dest_blocked.is_legal((6, 4), (5, 4)));

        let advanced = board([
            "....k...",
            "........",
            "........",
            "........",
            "........",
            "....P...",
            "........",
            "....K...",
        ]);
        assert!(!advanced.is_legal((5, 4), (3, 4)), "double step off the home rank");
    }

    #[test]
    fn pawns_capture_one_diagonal_forward() {
        let b = board([
            "....k...",
            "........",
            "........",
            "........",
            "...p.R..",
            "....P...",
            "........",
            "....K...",
        ]);
        assert!(b.is_legal((5, 4), (4, 3)), "capture black pawn");
        assert!(!b.is_legal((5, 4), (4, 5)), "own rook");
        assert!(b.is_legal((4, 3), (5, 4)), "black captures toward row 7");
        assert!(!b.is_legal((4, 3), (3, 2)), "black cannot capture backward");
    }

    #[test]
    fn pawn_on_last_rank_is_stuck() {
        let b = board([
            "P...k...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "....K...",
        ]);
        assert!(b.legal_destinations((0, 0)).is_empty());
    }

    #[test]
    fn sliders_need_every_square_between_empty() {
        let b = board([
            "....k...",
            "........",
            "........",
            "........",
            "R..p...r",
            "........",
            "........",
            "B...K..Q",
        ]);
        // Rook on (4,0): blocked by the pawn on (4,3)
        assert!(b.is_legal((4, 0), (4, 1)));
        assert!(b.is_legal((4, 0), (4, 3)), "capture the blocker");
        assert!(!b.is_legal((4, 0), (4, 4)));
        assert!(!b.is_legal((4, 0), (4, 7)));
        assert!(b.is_legal((4, 0), (0, 0)), "full column");
        assert!(!b.is_legal((4, 0), (3, 1)), "rooks do not go diagonal");

        // Bishop on (7,0): long diagonal to (0,7) passes (4,3)
        assert!(b.is_legal((7, 0), (5, 2)));
        assert!(b.is_legal((7, 0), (4, 3)));
        assert!(!b.is_legal((7, 0), (3, 4)));
        assert!(!b.is_legal((7, 0), (7, 1)), "bishops do not go straight");
        assert!(!b.is_legal((7, 0), (5, 1)), "not a diagonal");

        // Queen on (7,7)
        assert!(b.is_legal((7, 7), (7, 5)));
        assert!(!b.is_legal((7, 7), (7, 3)), "king in the way");
        assert!(b.is_legal((7, 7), (4, 7)), "capture the black rook");
        assert!(b.is_legal((7, 7), (1, 1)));
        assert!(!b.is_legal((7, 7), (5, 6)), "queens do not jump");
    }

    #[test]
    fn knights_ignore_blockers() {
        let b = Board::new();
        assert!(b.is_legal((7, 1), (5, 0)));
        assert!(b.is_legal((7, 1), (5, 2)));
        assert!(!b.is_legal((7, 1), (6, 3)), "own pawn");

        let mut open = Board::empty();
        open.squares[4][4] = Some(Piece::new(PieceType::Knight, Color::White));
        let offsets = [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];
        for (dr, dc) in offsets {
            let to = ((4 + dr) as usize, (4 + dc) as usize);
            assert!(open.is_legal((4, 4), to), "offset ({dr}, {dc})");
        }
        assert_eq!(open.legal_destinations((4, 4)).len(), 8);
    }

    #[test]
    fn king_steps_one_square_even_into_attack() {
        let b = board([
            "........",
            "........",
            "...r....",
            "...K....",
            "........",
            "........",
            "........",
            "....k...",
        ]);
        assert_eq!(b.legal_destinations((3, 3)).len(), 8);
        assert!(b.is_legal((3, 3), (3, 4)), "attacked by nothing is checked");
        assert!(!b.is_legal((3, 3), (1, 3)));
        assert!(!b.is_legal((7, 4), (7, 6)), "no castling");
    }

    #[test]
    fn initial_position_move_counts() {
        let b = Board::new();
        assert_eq!(b.generate_moves(Color::White).len(), 20);
        assert_eq!(b.generate_moves(Color::Black).len(), 20);
    }

    #[test]
    fn apply_move_overwrites_and_flips_turn() {
        let mut b = Board::new();
        let before = b.piece_count();
        b.apply_move(&mv((6, 4), (4, 4)));
        assert_eq!(b.squares[6][4], None);
        assert_eq!(b.squares[4][4], Some(Piece::new(PieceType::Pawn, Color::White)));
        assert_eq!(b.current_turn, Color::Black);
        assert_eq!(b.last_move, Some(mv((6, 4), (4, 4))));
        assert_eq!(b.piece_count(), before);

        // Replaying the same move is no longer legal
        assert!(!b.is_legal((6, 4), (4, 4)));
    }

    #[test]
    fn capture_removes_exactly_one_piece() {
        let mut b = board([
            "....k...",
            "........",
            "........",
            "...p....",
            "....P...",
            "........",
            "........",
            "....K...",
        ]);
        assert!(b.is_legal((4, 4), (3, 3)));
        b.apply_move(&mv((4, 4), (3, 3)));
        assert_eq!(b.piece_count(), 3);
        assert_eq!(b.squares[3][3].map(|p| p.color), Some(Color::White));
    }

    #[test]
    fn try_move_checks_turn_and_legality() {
        let mut b = Board::new();
        assert!(matches!(b.try_move(&mv((1, 4), (3, 4))), Err(ChessError::NotYourTurn(Color::Black))));
        assert!(matches!(b.try_move(&mv((6, 4), (3, 4))), Err(ChessError::IllegalMove { .. })));
        assert!(matches!(b.try_move(&mv((4, 4), (3, 4))), Err(ChessError::IllegalMove { .. })));
        assert_eq!(b, Board::new(), "rejected moves leave the board untouched");

        b.try_move(&mv((6, 4), (4, 4))).expect("double step");
        assert_eq!(b.current_turn, Color::Black);
    }

    #[test]
    fn winner_reports_missing_king() {
        assert_eq!(Board::new().winner(), None);

        let mut b = Board::new();
        b.squares[0][4] = None;
        assert_eq!(b.winner(), Some(Color::White));
        assert!(b.is_king_captured(Color::Black));

        let mut b = Board::new();
        b.squares[7][4] = None;
        assert_eq!(b.winner(), Some(Color::Black));

        let mut b = Board::empty();
        b.current_turn = Color::Black;
        assert_eq!(b.winner(), Some(Color::White), "side that just moved is credited");
    }

    #[test]
    fn display_prints_layout_rows() {
        let text = Board::new().to_string();
        assert_eq!(text.lines().next(), Some("rnbqkbnr"));
        assert_eq!(text.lines().last(), Some("RNBQKBNR"));
    }
}
