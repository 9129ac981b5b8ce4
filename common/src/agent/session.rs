use super::rules::Deduction;
use super::{Move, MoveKind, MoveSource, Outcome};
use crate::board::{Board, Point};
use crate::error::BoardError;
use std::collections::{BTreeMap, BTreeSet};

/// Working sets of a single play session.
///
/// Cells are taken out with `pop_first`, so which pending cell is handled next depends only on
/// the set contents and every seeded run replays identically.
pub(crate) struct Session {
    /// Cells known (or chosen) to be stepped on next.
    pub to_step: BTreeSet<Point>,
    /// Cells known (or chosen) to be flagged next.
    pub to_flag: BTreeSet<Point>,
    /// Revealed cells whose clue has not been looked at since their surroundings changed.
    pub to_search: BTreeSet<Point>,
    moves: Vec<Move>,
    /// Queued cells that did not come from a deduction.
    origins: BTreeMap<Point, MoveSource>,
}

impl Session {
    pub fn open(opening: Point) -> Self {
        Session {
            to_step: BTreeSet::from([opening]),
            to_flag: BTreeSet::new(),
            to_search: BTreeSet::new(),
            moves: Vec::new(),
            origins: BTreeMap::from([(opening, MoveSource::Opening)]),
        }
    }

    /// True when nothing is waiting to be flagged, stepped on or searched.
    pub fn is_idle(&self) -> bool {
        self.to_step.is_empty() && self.to_flag.is_empty() && self.to_search.is_empty()
    }

    /// Queues a move that was not deduced.
    pub fn queue(&mut self, at: Point, kind: MoveKind, source: MoveSource) {
        match kind {
            MoveKind::Step => self.to_step.insert(at),
            MoveKind::Flag => self.to_flag.insert(at),
        };
        self.origins.insert(at, source);
    }

    pub fn absorb(&mut self, deduction: Deduction) {
        if !deduction.is_empty() {
            tracing::trace!(safe = ?deduction.safe, mines = ?deduction.mines, "deduced");
        }
        self.to_step.extend(deduction.safe);
        self.to_flag.extend(deduction.mines);
    }

    /// Flags `at` and schedules its revealed neighbours for another search.
    /// Returns false if the board refused the flag or the cell was already flagged.
    pub fn flag(&mut self, board: &mut Board, at: Point) -> bool {
        let source = self.origins.remove(&at).unwrap_or(MoveSource::Deduced);
        if board.is_flagged(at) || !board.flag(at) {
            return false;
        }
        self.record(at, MoveKind::Flag, source);
        self.to_search.extend(
            board
                .neighbours(at)
                .into_iter()
                .filter(|&p| board.is_stepped(p)),
        );
        true
    }

    /// Steps onto `at` and schedules it and its revealed neighbours for search.
    ///
    /// Returns `Ok(false)` if a mine went off. Cells already stepped on are skipped without
    /// counting as a move.
    pub fn step(&mut self, board: &mut Board, at: Point) -> Result<bool, BoardError> {
        let source = self.origins.remove(&at).unwrap_or(MoveSource::Deduced);
        if board.is_stepped(at) {
            return Ok(true);
        }
        match board.step(at) {
            Ok(_) => {}
            Err(BoardError::Detonation(_)) => {
                self.record(at, MoveKind::Step, source);
                tracing::debug!(?at, ?source, "stepped on a mine");
                return Ok(false);
            }
            Err(err) => return Err(err),
        }
        self.record(at, MoveKind::Step, source);
        self.to_search.insert(at);
        self.to_search.extend(
            board
                .neighbours(at)
                .into_iter()
                .filter(|&p| board.is_stepped(p)),
        );
        Ok(true)
    }

    /// Whether some neighbour of `at` is still unknown and not already scheduled.
    pub fn has_unresolved_neighbour(&self, board: &Board, at: Point) -> bool {
        board.neighbours(at).into_iter().any(|p| {
            !board.is_stepped(p)
                && !board.is_flagged(p)
                && !self.to_step.contains(&p)
                && !self.to_flag.contains(&p)
        })
    }

    pub fn finish(self, board: &Board) -> Outcome {
        Outcome {
            state: board.state(),
            moves: self.moves,
        }
    }

    fn record(&mut self, point: Point, kind: MoveKind, source: MoveSource) {
        self.moves.push(Move {
            point,
            kind,
            source,
        });
    }
}
