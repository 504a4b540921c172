//! Scene configuration
//!
//! All scene parameters are literal constants gathered in [`SceneConfig`].
//! Builders call [`SceneConfig::validate`] before emitting a single intent,
//! so a bad configuration never produces a partial trace.

use super::errors::TraceError;
use crate::execution::constants::BLANK_TOKEN;

/// One `add_token(column, player, game_board)` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub column: usize,
    pub player: String,
}

impl Move {
    pub fn new(column: usize, player: &str) -> Self {
        Move {
            column,
            player: player.to_string(),
        }
    }
}

/// Direction checked by one of the `winner_*` functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    Diagonal1,
    Diagonal2,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal1,
        Direction::Diagonal2,
    ];

    /// Name of the checking function in the listing
    pub fn function_name(&self) -> &'static str {
        match self {
            Direction::Horizontal => "winner_horizontal",
            Direction::Vertical => "winner_vertical",
            Direction::Diagonal1 => "winner_diagonal1",
            Direction::Diagonal2 => "winner_diagonal2",
        }
    }

    pub fn scene_name(&self) -> &'static str {
        match self {
            Direction::Horizontal => "winner-horizontal",
            Direction::Vertical => "winner-vertical",
            Direction::Diagonal1 => "winner-diagonal1",
            Direction::Diagonal2 => "winner-diagonal2",
        }
    }

    /// (row, column) step between consecutive cells of a line of four
    pub fn delta(&self) -> (i64, i64) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal1 => (1, 1),
            Direction::Diagonal2 => (1, -1),
        }
    }

    /// How far short of `len(b)` the row loop stops
    pub fn row_margin(&self) -> i64 {
        match self {
            Direction::Horizontal => 0,
            _ => 3,
        }
    }

    /// `(start, margin)` of the column loop: `range(start, len(b[row]) - margin)`
    pub fn column_bounds(&self) -> (i64, i64) {
        match self {
            Direction::Horizontal | Direction::Diagonal1 => (0, 3),
            Direction::Vertical => (0, 0),
            Direction::Diagonal2 => (3, 0),
        }
    }
}

/// Parameters of the Connect Four scenes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneConfig {
    pub width: usize,
    pub height: usize,
    /// Moves replayed by the `add-token` scene against an empty board
    pub moves: Vec<Move>,
    /// Board the `winner-*` scenes inspect, top row first
    pub partial_board: Vec<Vec<String>>,
}

impl SceneConfig {
    /// The board and moves used throughout the tutorial
    pub fn connect_four() -> Self {
        let partial = [
            [" ", " ", " ", " ", " ", " ", " "],
            [" ", " ", " ", " ", " ", " ", " "],
            [" ", " ", "G", "G", " ", " ", " "],
            [" ", "B", "B", "B", "B", " ", " "],
            [" ", "B", "G", "B", "G", " ", " "],
            ["B", "G", "G", "G", "B", "G", " "],
        ];

        SceneConfig {
            width: 7,
            height: 6,
            moves: vec![
                Move::new(2, "G"),
                Move::new(4, "B"),
                Move::new(2, "G"),
                Move::new(2, "B"),
            ],
            partial_board: partial
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), TraceError> {
        // The winner checks look three cells ahead and add_token scans from row 1
        if self.width < 4 || self.height < 4 {
            return Err(invalid(format!(
                "board must be at least 4x4, got {}x{}",
                self.width, self.height
            )));
        }

        for (i, m) in self.moves.iter().enumerate() {
            if m.column >= self.width {
                return Err(invalid(format!(
                    "move {} drops into column {} of a {}-column board",
                    i, m.column, self.width
                )));
            }
            if !is_token(&m.player) || m.player == BLANK_TOKEN {
                return Err(invalid(format!(
                    "move {} has player {:?}; players are single non-blank characters",
                    i, m.player
                )));
            }
        }

        if self.partial_board.len() != self.height {
            return Err(invalid(format!(
                "partial board has {} rows, expected {}",
                self.partial_board.len(),
                self.height
            )));
        }
        for (r, row) in self.partial_board.iter().enumerate() {
            if row.len() != self.width {
                return Err(invalid(format!(
                    "partial board row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    self.width
                )));
            }
            if let Some(cell) = row.iter().find(|cell| !is_token(cell)) {
                return Err(invalid(format!(
                    "partial board row {} holds {:?}; cells are single characters",
                    r, cell
                )));
            }
        }

        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::connect_four()
    }
}

fn is_token(s: &str) -> bool {
    s.chars().count() == 1
}

fn invalid(message: String) -> TraceError {
    TraceError::InvalidConfig { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::connect_four();
        assert!(config.validate().is_ok());
        assert_eq!(config.partial_board[3][1], "B");
    }

    #[test]
    fn test_rejects_move_outside_board() {
        let mut config = SceneConfig::connect_four();
        config.moves.push(Move::new(7, "G"));
        assert!(matches!(
            config.validate(),
            Err(TraceError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_rejects_blank_player() {
        let mut config = SceneConfig::connect_four();
        config.moves = vec![Move::new(0, " ")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_ragged_partial_board() {
        let mut config = SceneConfig::connect_four();
        config.partial_board[2].pop();
        assert!(config.validate().is_err());
    }
}
