use crate::config::BoardConfig;
use crate::error::BoardError;
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, index};
use std::collections::BTreeSet;

/// Value used for mine cells in `Board::snapshot`.
pub const MINE_VALUE: u8 = 9;

/// A 0-indexed coordinate on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Point { row, col }
    }
}

/// What a player sees on a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Tile {
    Hidden,
    Flagged,
    Revealed(u8), // The u8 is the number of adjacent mines.
    /// A mine that was stepped on.
    Exploded,
    /// A hidden mine, only produced when mines are asked to be shown.
    Mine,
}

/// Three-way status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// The board engine. Owns the mine layout and the player-visible stepped/flagged sets.
///
/// Sets are ordered so that every traversal, and therefore every seeded run, is reproducible.
pub struct Board {
    config: BoardConfig,
    rng: StdRng,
    grid: BTreeSet<Point>,
    mines: BTreeSet<Point>,
    stepped: BTreeSet<Point>,
    flagged: BTreeSet<Point>,
    /// Armed while the first reveal of the game is still pending and first-safe is enabled.
    ignore_mine: bool,
}

// --- Construction ---

impl Board {
    /// Creates a board and places its mines with `rng`.
    pub fn new(config: BoardConfig, rng: StdRng) -> Result<Self, BoardError> {
        let mut board = Self::empty(config, rng)?;
        board.reset();
        Ok(board)
    }

    pub fn seeded(config: BoardConfig, seed: u64) -> Result<Self, BoardError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    /// Creates a board with a fixed mine layout. `config.mines` is replaced by the layout size.
    ///
    /// `rng` is still used for first-safe relocation and for any later `reset`.
    pub fn with_mines(
        config: BoardConfig,
        mines: impl IntoIterator<Item = Point>,
        rng: StdRng,
    ) -> Result<Self, BoardError> {
        let mines: BTreeSet<Point> = mines.into_iter().collect();
        let config = BoardConfig {
            mines: mines.len(),
            ..config
        };
        let mut board = Self::empty(config, rng)?;
        if let Some(&outside) = mines.iter().find(|p| !board.contains(**p)) {
            return Err(BoardError::OutOfBounds(outside));
        }
        board.mines = mines;
        Ok(board)
    }

    fn empty(config: BoardConfig, rng: StdRng) -> Result<Self, BoardError> {
        if config.mines >= config.cells() {
            return Err(BoardError::TooManyMines {
                mines: config.mines,
                cells: config.cells(),
            });
        }
        let grid = (0..config.rows)
            .cartesian_product(0..config.cols)
            .map(|(row, col)| Point { row, col })
            .collect();
        Ok(Board {
            config,
            rng,
            grid,
            mines: BTreeSet::new(),
            stepped: BTreeSet::new(),
            flagged: BTreeSet::new(),
            ignore_mine: config.first_safe,
        })
    }

    /// Samples a fresh mine layout and clears everything the player did.
    pub fn reset(&mut self) {
        let cols = self.config.cols;
        self.mines = index::sample(&mut self.rng, self.config.cells(), self.config.mines)
            .into_iter()
            .map(|i| Point {
                row: i / cols,
                col: i % cols,
            })
            .collect();
        self.stepped.clear();
        self.flagged.clear();
        self.ignore_mine = self.config.first_safe;
    }
}

// --- Player actions and queries ---

impl Board {
    /// Reveals `at` and returns its value.
    ///
    /// Stepping on a mine fails with `Detonation`, unless this is the first reveal of a
    /// first-safe game, in which case the mine is moved to a random untouched cell first.
    /// Stepping on a flagged cell is allowed and leaves the flag in place.
    pub fn step(&mut self, at: Point) -> Result<u8, BoardError> {
        if !self.contains(at) {
            return Err(BoardError::OutOfBounds(at));
        }
        let ignore_mine = std::mem::take(&mut self.ignore_mine);
        self.stepped.insert(at);

        if self.mines.contains(&at) {
            if !ignore_mine {
                return Err(BoardError::Detonation(at));
            }
            let candidates: Vec<Point> = self
                .grid
                .iter()
                .filter(|p| !self.stepped.contains(*p) && !self.mines.contains(*p))
                .copied()
                .collect();
            let Some(&relocated) = candidates.choose(&mut self.rng) else {
                return Err(BoardError::Detonation(at));
            };
            self.mines.remove(&at);
            self.mines.insert(relocated);
            tracing::debug!(?at, ?relocated, "first step hit a mine, relocated it");
        }

        self.cell_value(at)
    }

    /// Marks `at` as a suspected mine. Returns `false` if the cell is already revealed
    /// (or not on the board), in which case nothing changes.
    pub fn flag(&mut self, at: Point) -> bool {
        if self.stepped.contains(&at) || !self.contains(at) {
            return false;
        }
        self.flagged.insert(at);
        true
    }

    /// The number of mines around a revealed cell.
    pub fn cell_value(&self, at: Point) -> Result<u8, BoardError> {
        if !self.stepped.contains(&at) {
            return Err(BoardError::IllegalQuery(at));
        }
        Ok(self.count_adjacent_mines(at))
    }

    /// The up to eight cells around `at` that lie on the board.
    pub fn neighbours(&self, at: Point) -> BTreeSet<Point> {
        let rows = self.config.rows as isize;
        let cols = self.config.cols as isize;

        (-1..=1)
            .cartesian_product(-1..=1)
            .filter(|&offset| offset != (0, 0))
            .filter_map(|(dr, dc)| {
                let row = at.row as isize + dr;
                let col = at.col as isize + dc;
                if row >= 0 && row < rows && col >= 0 && col < cols {
                    Some(Point {
                        row: row as usize,
                        col: col as usize,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Mines not covered by a flag.
    pub fn mines_remaining(&self) -> usize {
        self.mines.difference(&self.flagged).count()
    }

    /// Cells neither stepped on nor flagged.
    pub fn tiles_remaining(&self) -> usize {
        self.grid
            .iter()
            .filter(|p| !self.stepped.contains(*p) && !self.flagged.contains(*p))
            .count()
    }

    /// True once every mine is flagged and none was stepped on. A game still in progress
    /// reports false, the same as a lost one; see `state` for the three-way status.
    pub fn winning_state(&self) -> bool {
        if self.stepped.intersection(&self.mines).next().is_some() {
            return false;
        }
        self.mines_remaining() == 0
    }

    pub fn state(&self) -> GameState {
        if self.stepped.intersection(&self.mines).next().is_some() {
            GameState::Lost
        } else if self.mines_remaining() == 0 {
            GameState::Won
        } else {
            GameState::Playing
        }
    }

    /// Counts the mines around a point, revealed or not.
    fn count_adjacent_mines(&self, at: Point) -> u8 {
        self.neighbours(at)
            .iter()
            .filter(|p| self.mines.contains(*p))
            .count() as u8
    }
}

// --- Views ---

impl Board {
    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }

    pub fn mine_count(&self) -> usize {
        self.config.mines
    }

    pub fn contains(&self, at: Point) -> bool {
        at.row < self.config.rows && at.col < self.config.cols
    }

    pub fn grid(&self) -> &BTreeSet<Point> {
        &self.grid
    }

    pub fn stepped(&self) -> &BTreeSet<Point> {
        &self.stepped
    }

    pub fn flagged(&self) -> &BTreeSet<Point> {
        &self.flagged
    }

    pub fn is_stepped(&self, at: Point) -> bool {
        self.stepped.contains(&at)
    }

    pub fn is_flagged(&self, at: Point) -> bool {
        self.flagged.contains(&at)
    }

    /// Cells neither stepped on nor flagged.
    pub fn unknown(&self) -> BTreeSet<Point> {
        self.grid
            .iter()
            .filter(|p| !self.stepped.contains(*p) && !self.flagged.contains(*p))
            .copied()
            .collect()
    }

    /// The full value grid with mines encoded as `MINE_VALUE`.
    ///
    /// This reads hidden information and exists for rendering and export only.
    pub fn snapshot(&self) -> Vec<Vec<u8>> {
        (0..self.config.rows)
            .map(|row| {
                (0..self.config.cols)
                    .map(|col| {
                        let at = Point { row, col };
                        if self.mines.contains(&at) {
                            MINE_VALUE
                        } else {
                            self.count_adjacent_mines(at)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// What the player sees at `at`. Hidden mines show as `Tile::Mine` only with `show_mines`.
    pub fn tile(&self, at: Point, show_mines: bool) -> Tile {
        if self.stepped.contains(&at) {
            if self.mines.contains(&at) {
                Tile::Exploded
            } else {
                Tile::Revealed(self.count_adjacent_mines(at))
            }
        } else if self.flagged.contains(&at) {
            Tile::Flagged
        } else if show_mines && self.mines.contains(&at) {
            Tile::Mine
        } else {
            Tile::Hidden
        }
    }

    pub fn tiles(&self, show_mines: bool) -> Vec<Vec<Tile>> {
        (0..self.config.rows)
            .map(|row| {
                (0..self.config.cols)
                    .map(|col| self.tile(Point { row, col }, show_mines))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_board_initialization() {
        // A fresh board has exactly the configured number of mines and nothing revealed
        let board = Board::seeded(BoardConfig::new(5, 5, 3), 1).unwrap();
        assert_eq!(board.rows(), 5);
        assert_eq!(board.cols(), 5);
        assert_eq!(board.mines.len(), 3);
        assert_eq!(board.mine_count(), 3);
        assert_eq!(board.grid.len(), 25);
        assert!(board.stepped.is_empty());
        assert!(board.flagged.is_empty());
        assert_eq!(board.state(), GameState::Playing);
        assert_eq!(board.tiles_remaining(), 25);
    }

    #[test]
    fn test_board_initialization_too_many_mines() {
        let result = Board::seeded(BoardConfig::new(3, 3, 9), 1);
        assert!(matches!(
            result,
            Err(BoardError::TooManyMines { mines: 9, cells: 9 })
        ));
    }

    #[test]
    fn test_neighbours() {
        let board = Board::seeded(BoardConfig::new(3, 3, 1), 1).unwrap();

        // Corner cell should have 3 neighbours
        assert_eq!(board.neighbours(Point::new(0, 0)).len(), 3);
        // Center cell should have 8 neighbours
        assert_eq!(board.neighbours(Point::new(1, 1)).len(), 8);
        // Edge cell should have 5 neighbours
        assert_eq!(board.neighbours(Point::new(0, 1)).len(), 5);

        assert!(!board.neighbours(Point::new(1, 1)).contains(&Point::new(1, 1)));
    }

    #[test]
    fn test_cell_value_requires_reveal() {
        let mut board =
            Board::with_mines(BoardConfig::new(3, 3, 0), [Point::new(0, 0)], rng()).unwrap();
        let at = Point::new(1, 1);

        assert_eq!(board.cell_value(at), Err(BoardError::IllegalQuery(at)));
        assert_eq!(board.step(at), Ok(1));
        assert_eq!(board.cell_value(at), Ok(1));
        assert_eq!(board.step(Point::new(2, 2)), Ok(0));
    }

    #[test]
    fn test_detonation() {
        let mine = Point::new(0, 0);
        let mut board = Board::with_mines(BoardConfig::new(3, 3, 0), [mine], rng()).unwrap();

        assert_eq!(board.step(mine), Err(BoardError::Detonation(mine)));
        assert!(board.is_stepped(mine));
        assert!(!board.winning_state());
        assert_eq!(board.state(), GameState::Lost);
        assert_eq!(board.tile(mine, false), Tile::Exploded);
    }

    #[test]
    fn test_first_step_relocates_mine() {
        let mine = Point::new(1, 1);
        let config = BoardConfig::new(3, 3, 0).first_safe(true);
        let mut board = Board::with_mines(config, [mine, Point::new(0, 0)], rng()).unwrap();

        let value = board.step(mine).unwrap();

        assert!(board.is_stepped(mine));
        assert!(!board.mines.contains(&mine));
        assert_eq!(board.mines.len(), 2);
        assert_eq!(value, board.count_adjacent_mines(mine));
        assert_eq!(board.state(), GameState::Playing);
    }

    #[test]
    fn test_first_safe_is_consumed_by_any_first_step() {
        let mine = Point::new(2, 2);
        let config = BoardConfig::new(3, 3, 0).first_safe(true);
        let mut board = Board::with_mines(config, [mine], rng()).unwrap();

        assert_eq!(board.step(Point::new(0, 0)), Ok(0));
        assert_eq!(board.step(mine), Err(BoardError::Detonation(mine)));
    }

    #[test]
    fn test_reset_restores_first_safe() {
        let config = BoardConfig::new(4, 4, 15).first_safe(true);
        let mut board = Board::seeded(config, 3).unwrap();

        for _ in 0..5 {
            board.reset();
            assert_eq!(board.mines.len(), 15);
            // Only one safe cell exists, and the first step always ends up on it
            let value = board.step(Point::new(0, 0)).unwrap();
            assert_eq!(value as usize, board.neighbours(Point::new(0, 0)).len());
            assert_eq!(board.mines.len(), 15);
        }
    }

    #[test]
    fn test_flag_rejected_on_revealed_cell() {
        let mut board = Board::with_mines(BoardConfig::new(2, 2, 0), [Point::new(0, 0)], rng())
            .unwrap();
        let at = Point::new(1, 1);
        board.step(at).unwrap();

        assert!(!board.flag(at));
        assert!(!board.is_flagged(at));
        assert!(!board.flag(Point::new(5, 5)));
        assert!(board.flag(Point::new(0, 0)));
        assert_eq!(board.mines_remaining(), 0);
        assert!(board.winning_state());
    }

    #[test]
    fn test_stepping_flagged_cell_keeps_stale_flag() {
        // Flagging a revealed cell is refused, but revealing a flagged one is not
        let mut board = Board::with_mines(BoardConfig::new(2, 2, 0), [Point::new(0, 0)], rng())
            .unwrap();
        let at = Point::new(1, 0);

        assert!(board.flag(at));
        assert_eq!(board.step(at), Ok(1));
        assert!(board.is_stepped(at));
        assert!(board.is_flagged(at));
        assert_eq!(board.tile(at, false), Tile::Revealed(1));
    }

    #[test]
    fn test_remaining_counts() {
        let mines = [Point::new(0, 0), Point::new(0, 1)];
        let mut board = Board::with_mines(BoardConfig::new(2, 3, 0), mines, rng()).unwrap();

        assert_eq!(board.mines_remaining(), 2);
        assert_eq!(board.tiles_remaining(), 6);

        board.flag(Point::new(0, 0));
        board.flag(Point::new(1, 2)); // wrong flag
        board.step(Point::new(1, 0)).unwrap();

        assert_eq!(board.mines_remaining(), 1);
        assert_eq!(board.tiles_remaining(), 3);
        assert_eq!(board.unknown().len(), 3);
        assert!(!board.winning_state());
    }

    #[test]
    fn test_snapshot_and_tiles() {
        let mines = [Point::new(0, 0)];
        let mut board = Board::with_mines(BoardConfig::new(2, 3, 0), mines, rng()).unwrap();
        board.step(Point::new(1, 2)).unwrap();
        board.flag(Point::new(0, 1));

        assert_eq!(board.snapshot(), vec![vec![9, 1, 0], vec![1, 1, 0]]);
        assert_eq!(
            board.tiles(true),
            vec![
                vec![Tile::Mine, Tile::Flagged, Tile::Hidden],
                vec![Tile::Hidden, Tile::Hidden, Tile::Revealed(0)],
            ]
        );
        assert_eq!(board.tile(Point::new(0, 0), false), Tile::Hidden);
    }

    #[test]
    fn test_single_cell_board() {
        let mut board = Board::seeded(BoardConfig::new(1, 1, 0), 0).unwrap();
        assert_eq!(board.step(Point::new(0, 0)), Ok(0));
        assert!(board.winning_state());
        assert_eq!(board.tiles_remaining(), 0);
    }

    #[test]
    fn test_step_out_of_bounds() {
        let mut board = Board::seeded(BoardConfig::new(2, 2, 1), 0).unwrap();
        let at = Point::new(2, 0);
        assert_eq!(board.step(at), Err(BoardError::OutOfBounds(at)));
        assert!(board.stepped.is_empty());
    }
}
