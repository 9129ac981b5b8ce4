use crate::board::Point;

/// Dimensions and rules of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
    /// Guarantees the first reveal of every game cannot be a mine.
    pub first_safe: bool,
}

impl BoardConfig {
    pub fn new(rows: usize, cols: usize, mines: usize) -> Self {
        BoardConfig {
            rows,
            cols,
            mines,
            first_safe: false,
        }
    }

    pub fn first_safe(mut self, first_safe: bool) -> Self {
        self.first_safe = first_safe;
        self
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// The classic difficulty presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Difficulty {
    /// 9 x 9, 10 mines.
    Beginner,
    /// 16 x 16, 40 mines.
    Intermediate,
    /// 16 x 30, 99 mines.
    Expert,
}

impl Difficulty {
    pub fn config(self) -> BoardConfig {
        match self {
            Difficulty::Beginner => BoardConfig::new(9, 9, 10),
            Difficulty::Intermediate => BoardConfig::new(16, 16, 40),
            Difficulty::Expert => BoardConfig::new(16, 30, 99),
        }
    }
}

/// Options handed to `Agent::play`.
///
/// Only `opening` influences the solver. Everything else controls what gets drawn to the
/// terminal while the agent plays.
#[derive(Debug, Clone, Default)]
pub struct PlayConfig {
    /// Draw hidden mines.
    pub show_mines: bool,
    /// Use ANSI colours when drawing.
    pub coloured: bool,
    /// 0: silent, 1: result line, 2: final board, 3: board after every iteration.
    pub verbosity: u8,
    /// Highlight the agent's pending search sets in per-iteration drawings.
    pub show_strategy: bool,
    /// Wait for Enter after each per-iteration drawing.
    pub step_by_step: bool,
    /// First cell to reveal. Drawn at random by the agent when absent.
    pub opening: Option<Point>,
}

impl PlayConfig {
    pub fn with_opening(mut self, opening: Point) -> Self {
        self.opening = Some(opening);
        self
    }
}
