//! setsweeper: a Minesweeper board engine and agents that play it by deduction.
//!
//! - `board`: mine layout, reveal/flag, win and loss queries, first-safe openings
//! - `agent`: `SimpleAgent` (single-cell rule) and `SetAgent` (adds the pairwise rule and
//!   density-aware guessing), both behind the `Agent` trait
//! - `render` / `report`: terminal drawing and serializable game reports
//!
//! ```
//! use setsweeper::{Agent, Board, BoardConfig, PlayConfig, SetAgent};
//!
//! let config = BoardConfig::new(9, 9, 10).first_safe(true);
//! let mut board = Board::seeded(config, 42).unwrap();
//! let outcome = SetAgent::seeded(7).play(&mut board, &PlayConfig::default()).unwrap();
//! assert_eq!(outcome.won(), board.winning_state());
//! ```

pub mod agent;
pub mod board;
pub mod config;
pub mod error;
pub mod render;
pub mod report;

pub use agent::{Agent, AgentKind, Move, MoveKind, MoveSource, Outcome, SetAgent, SimpleAgent};
pub use board::{Board, GameState, MINE_VALUE, Point, Tile};
pub use config::{BoardConfig, Difficulty, PlayConfig};
pub use error::BoardError;
pub use report::{GameReport, play_seeded};
