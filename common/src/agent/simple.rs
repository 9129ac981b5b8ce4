use super::rules::primitive;
use super::session::Session;
use super::{Agent, MoveKind, MoveSource, Outcome, opening};
use crate::board::{Board, Point};
use crate::config::PlayConfig;
use crate::error::BoardError;
use crate::render;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Plays with the single-cell rule only and guesses uniformly when it runs dry.
pub struct SimpleAgent {
    rng: StdRng,
}

impl SimpleAgent {
    pub fn new(rng: StdRng) -> Self {
        SimpleAgent { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Agent for SimpleAgent {
    fn name(&self) -> &'static str {
        "simple"
    }

    /// Every iteration flags at most one cell, steps onto at most one cell and searches at most
    /// one revealed cell, in that order.
    fn play(&mut self, board: &mut Board, config: &PlayConfig) -> Result<Outcome, BoardError> {
        let mut session = Session::open(opening(board, config, &mut self.rng));

        while board.tiles_remaining() > 0 {
            // --- 1. Flag a proven mine ---
            if let Some(at) = session.to_flag.pop_first() {
                session.flag(board, at);
            }

            // --- 2. Step onto a proven safe cell ---
            if let Some(at) = session.to_step.pop_first() {
                if !session.step(board, at)? {
                    break;
                }
            }

            // --- 3. Read the clue of a revealed cell ---
            if let Some(at) = session.to_search.pop_first() {
                session.absorb(primitive(board, at)?);
            }

            // --- 4. Nothing left to do: guess ---
            if session.is_idle() {
                let field: Vec<Point> = board.unknown().into_iter().collect();
                let Some(&at) = field.choose(&mut self.rng) else {
                    break;
                };
                tracing::debug!(?at, unknown = field.len(), "no deduction left, guessing");
                session.queue(at, MoveKind::Step, MoveSource::Guess);
            }

            render::iteration(board, config, None);
        }

        render::finish(board, config);
        Ok(session.finish(board))
    }
}
