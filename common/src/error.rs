use crate::board::Point;

/// Failures raised by the board engine.
///
/// A rejected flag is not an error: `Board::flag` reports it through its return value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The value of a cell was requested before the cell was revealed.
    #[error("cell ({}, {}) has not been revealed", .0.row, .0.col)]
    IllegalQuery(Point),
    /// A mine was stepped on without first-safe protection. The game is lost.
    #[error("stepped on a mine at ({}, {})", .0.row, .0.col)]
    Detonation(Point),
    #[error("cell ({}, {}) is outside the board", .0.row, .0.col)]
    OutOfBounds(Point),
    #[error("{mines} mines do not fit on a board of {cells} cells")]
    TooManyMines { mines: usize, cells: usize },
}
