//! Agents that play a `Board` to completion.
//!
//! Both agents share the same working-set bookkeeping (`Session`) and deduction rules
//! (`rules`). `SetAgent` adds the pairwise rule and a smarter guess on top.

mod rules;
mod session;
mod set;
mod simple;

pub use rules::{Deduction, pairwise, primitive};
pub use set::SetAgent;
pub use simple::SimpleAgent;

use crate::board::{Board, GameState, Point};
use crate::config::PlayConfig;
use crate::error::BoardError;
use rand::Rng;
use rand::rngs::StdRng;

/// What the agent did to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MoveKind {
    Step,
    Flag,
}

/// Why the agent did it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MoveSource {
    /// The first reveal of the game.
    Opening,
    /// Proven by the primitive or the pairwise rule.
    Deduced,
    /// A random pick with nothing left to deduce.
    Guess,
    /// Every remaining unknown cell had to be a mine.
    Forced,
}

/// A single board mutation made by an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Move {
    pub point: Point,
    pub kind: MoveKind,
    pub source: MoveSource,
}

/// How a game played by an agent ended, with every move in order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Outcome {
    pub state: GameState,
    pub moves: Vec<Move>,
}

impl Outcome {
    pub fn won(&self) -> bool {
        self.state == GameState::Won
    }

    /// Moves made without a proof, the opening included.
    pub fn guesses(&self) -> usize {
        self.moves
            .iter()
            .filter(|m| matches!(m.source, MoveSource::Opening | MoveSource::Guess))
            .count()
    }
}

/// A Minesweeper-playing strategy.
pub trait Agent {
    fn name(&self) -> &'static str;

    /// Plays `board` from its current state until every cell is stepped on or flagged, or a
    /// mine goes off. A detonation is reported as a lost `Outcome`; any other board error means
    /// the agent misused the board and is returned as is.
    fn play(&mut self, board: &mut Board, config: &PlayConfig) -> Result<Outcome, BoardError>;
}

/// The available agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AgentKind {
    /// Single-cell deduction, uniform guesses.
    Simple,
    /// Single-cell and pairwise deduction, probability-weighted guesses.
    Set,
}

impl AgentKind {
    pub fn build(self, rng: StdRng) -> Box<dyn Agent> {
        match self {
            AgentKind::Simple => Box::new(SimpleAgent::new(rng)),
            AgentKind::Set => Box::new(SetAgent::new(rng)),
        }
    }
}

/// The configured opening, or a uniformly random cell.
fn opening(board: &Board, config: &PlayConfig, rng: &mut StdRng) -> Point {
    config.opening.unwrap_or_else(|| Point {
        row: rng.random_range(0..board.rows()),
        col: rng.random_range(0..board.cols()),
    })
}
