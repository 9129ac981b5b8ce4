use super::rules::{pairwise, primitive};
use super::session::Session;
use super::{Agent, MoveKind, MoveSource, Outcome, opening};
use crate::board::{Board, Point};
use crate::config::PlayConfig;
use crate::error::BoardError;
use crate::render;
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;

/// Plays with the single-cell and the pairwise rule, keeping every revealed cell whose
/// surroundings are not settled yet as a frontier to compare pairs from.
///
/// When nothing can be deduced it guesses next to the frontier cell with the lowest local
/// mine density, if that beats the density over the whole unknown field.
pub struct SetAgent {
    rng: StdRng,
}

impl SetAgent {
    pub fn new(rng: StdRng) -> Self {
        SetAgent { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Queues a single guess. If every unknown cell must be a mine, the guess is a flag.
    fn guess(
        &mut self,
        board: &Board,
        session: &mut Session,
        frontier: &BTreeSet<Point>,
    ) -> Result<(), BoardError> {
        let mut fail_chance = board.mines_remaining() as f64 / board.tiles_remaining() as f64;
        let mut field = board.unknown();

        for &cell in frontier {
            let neighbours = board.neighbours(cell);
            let local: BTreeSet<Point> = neighbours
                .iter()
                .copied()
                .filter(|&p| !board.is_stepped(p) && !board.is_flagged(p))
                .collect();
            if local.is_empty() {
                continue;
            }
            let flagged = neighbours.iter().filter(|&&p| board.is_flagged(p)).count();
            let local_chance =
                (board.cell_value(cell)? as f64 - flagged as f64) / local.len() as f64;
            if local_chance < fail_chance {
                fail_chance = local_chance;
                field = local;
            }
        }

        let field: Vec<Point> = field.into_iter().collect();
        let Some(&at) = field.choose(&mut self.rng) else {
            return Ok(());
        };
        if board.mines_remaining() == board.tiles_remaining() {
            tracing::debug!(?at, "every unknown cell is a mine, flagging");
            session.queue(at, MoveKind::Flag, MoveSource::Forced);
        } else {
            tracing::debug!(?at, fail_chance, "no deduction left, guessing");
            session.queue(at, MoveKind::Step, MoveSource::Guess);
        }
        Ok(())
    }
}

impl Agent for SetAgent {
    fn name(&self) -> &'static str {
        "set"
    }

    /// Every iteration flags all proven mines, steps onto all proven safe cells, then either
    /// searches every pending revealed cell or, with none pending, compares frontier pairs.
    ///
    /// A guess is made only after an iteration in which nothing changed.
    fn play(&mut self, board: &mut Board, config: &PlayConfig) -> Result<Outcome, BoardError> {
        let mut session = Session::open(opening(board, config, &mut self.rng));
        let mut frontier: BTreeSet<Point> = BTreeSet::new();
        let mut state_changed = false;

        'game: while board.tiles_remaining() > 0 {
            if session.is_idle() && !state_changed {
                self.guess(board, &mut session, &frontier)?;
            }
            state_changed = false;

            // --- 1. Flag every proven mine ---
            while let Some(at) = session.to_flag.pop_first() {
                session.flag(board, at);
                state_changed = true;
            }

            // --- 2. Step onto every proven safe cell ---
            while let Some(at) = session.to_step.pop_first() {
                if !session.step(board, at)? {
                    break 'game;
                }
                state_changed = true;
            }

            render::iteration(board, config, Some((&frontier, &session.to_search)));

            if !session.to_search.is_empty() {
                // --- 3a. Read every pending clue, keeping the unsettled ones as frontier ---
                while let Some(at) = session.to_search.pop_first() {
                    session.absorb(primitive(board, at)?);
                    if session.has_unresolved_neighbour(board, at) {
                        frontier.insert(at);
                        state_changed = true;
                    } else {
                        frontier.remove(&at);
                    }
                }
            } else {
                // --- 3b. Compare every overlapping pair of frontier cells ---
                let cells: Vec<Point> = frontier.iter().copied().collect();
                for (a, b) in cells.into_iter().tuple_combinations() {
                    let an = board.neighbours(a);
                    let bn = board.neighbours(b);
                    if an.is_disjoint(&bn) {
                        continue;
                    }
                    let deduction = pairwise(board, a, b)?;
                    if deduction.is_empty() {
                        continue;
                    }
                    session
                        .to_search
                        .extend(an.union(&bn).copied().filter(|&p| board.is_stepped(p)));
                    session.absorb(deduction);
                    frontier.remove(&a);
                    frontier.remove(&b);
                    state_changed = true;
                }
            }
        }

        render::finish(board, config);
        Ok(session.finish(board))
    }
}
