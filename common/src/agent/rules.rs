use crate::board::{Board, Point};
use crate::error::BoardError;
use std::collections::BTreeSet;

/// Cells proven safe or proven to be mines by one application of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduction {
    pub safe: BTreeSet<Point>,
    pub mines: BTreeSet<Point>,
}

impl Deduction {
    pub fn is_empty(&self) -> bool {
        self.safe.is_empty() && self.mines.is_empty()
    }
}

/// The single-cell rule.
///
/// If a revealed cell has exactly as many unrevealed neighbours as its value, all of them are
/// mines. If it already has as many flagged neighbours as its value, the unflagged rest is safe.
pub fn primitive(board: &Board, cell: Point) -> Result<Deduction, BoardError> {
    let value = board.cell_value(cell)? as usize;
    let unknown: BTreeSet<Point> = board
        .neighbours(cell)
        .into_iter()
        .filter(|&p| !board.is_stepped(p))
        .collect();
    let unflagged: BTreeSet<Point> = unknown
        .iter()
        .copied()
        .filter(|&p| !board.is_flagged(p))
        .collect();
    let flagged = unknown.len() - unflagged.len();

    let mut deduction = Deduction::default();
    if unknown.len() == value {
        deduction.mines = unflagged.clone();
    }
    if flagged == value {
        deduction.safe = unflagged;
    }
    Ok(deduction)
}

/// The pairwise rule for two revealed cells with overlapping neighbourhoods.
///
/// The mines still unaccounted for around `a` and around `b` share whatever lies in the
/// overlap, so their difference comes from the cells only `a` sees minus the cells only `b`
/// sees. When that difference equals the number of unknown cells only `a` sees, all of those
/// are mines and everything only `b` sees is safe. The same holds with the roles swapped.
pub fn pairwise(board: &Board, a: Point, b: Point) -> Result<Deduction, BoardError> {
    let av = board.cell_value(a)? as i64;
    let bv = board.cell_value(b)? as i64;
    let an = board.neighbours(a);
    let bn = board.neighbours(b);
    let af = an.iter().filter(|&&p| board.is_flagged(p)).count() as i64;
    let bf = bn.iter().filter(|&&p| board.is_flagged(p)).count() as i64;

    let exclusive = |own: &BTreeSet<Point>, other: &BTreeSet<Point>| -> BTreeSet<Point> {
        own.difference(other)
            .copied()
            .filter(|&p| !board.is_stepped(p) && !board.is_flagged(p))
            .collect()
    };
    let only_a = exclusive(&an, &bn);
    let only_b = exclusive(&bn, &an);

    let vdiff = av - bv;
    let fdiff = af - bf;

    let mut deduction = Deduction::default();
    if vdiff - fdiff == only_a.len() as i64 {
        deduction.mines.extend(only_a.iter().copied());
        deduction.safe.extend(only_b.iter().copied());
    }
    if fdiff - vdiff == only_b.len() as i64 {
        deduction.mines.extend(only_b);
        deduction.safe.extend(only_a);
    }
    Ok(deduction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board(rows: usize, cols: usize, mines: &[(usize, usize)]) -> Board {
        let mines = mines.iter().map(|&(row, col)| Point::new(row, col));
        Board::with_mines(BoardConfig::new(rows, cols, 0), mines, StdRng::seed_from_u64(0))
            .unwrap()
    }

    #[test]
    fn test_primitive_all_unknown_are_mines() {
        // A '1' in the corner with its only hidden neighbour being a mine
        let mut board = board(2, 2, &[(0, 0)]);
        for p in [Point::new(0, 1), Point::new(1, 0), Point::new(1, 1)] {
            board.step(p).unwrap();
        }

        let deduction = primitive(&board, Point::new(1, 1)).unwrap();
        assert_eq!(deduction.mines, BTreeSet::from([Point::new(0, 0)]));
        assert!(deduction.safe.is_empty());
    }

    #[test]
    fn test_primitive_satisfied_by_flags() {
        let mut board = board(3, 3, &[(0, 0)]);
        board.step(Point::new(1, 1)).unwrap();
        board.flag(Point::new(0, 0));

        let deduction = primitive(&board, Point::new(1, 1)).unwrap();
        assert!(deduction.mines.is_empty());
        assert_eq!(deduction.safe.len(), 7);
        assert!(!deduction.safe.contains(&Point::new(0, 0)));
    }

    #[test]
    fn test_primitive_zero_clears_neighbours() {
        let mut board = board(3, 3, &[(2, 2)]);
        board.step(Point::new(0, 0)).unwrap();

        let deduction = primitive(&board, Point::new(0, 0)).unwrap();
        assert_eq!(deduction.safe.len(), 3);
        assert!(deduction.mines.is_empty());
    }

    #[test]
    fn test_primitive_undecided() {
        let mut board = board(3, 3, &[(0, 0)]);
        board.step(Point::new(1, 1)).unwrap();

        assert!(primitive(&board, Point::new(1, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_primitive_rejects_hidden_cell() {
        let board = board(2, 2, &[(0, 0)]);
        let at = Point::new(1, 1);
        assert_eq!(primitive(&board, at), Err(BoardError::IllegalQuery(at)));
    }

    #[test]
    fn test_pairwise_one_two_pattern() {
        // Bottom row revealed under two mines.
        //
        //   # # # #
        //   1 2 2 1
        //
        // Mines at (0,1) and (0,2). Comparing (1,1)=2 with (1,0)=1 forces (0,2), the only
        // unknown cell (1,1) sees alone. (1,0) sees no unknown cell alone, so nothing is safe.
        let mut board = board(2, 4, &[(0, 1), (0, 2)]);
        for col in 0..4 {
            board.step(Point::new(1, col)).unwrap();
        }
        assert_eq!(board.cell_value(Point::new(1, 0)), Ok(1));
        assert_eq!(board.cell_value(Point::new(1, 1)), Ok(2));

        let deduction = pairwise(&board, Point::new(1, 1), Point::new(1, 0)).unwrap();
        assert_eq!(deduction.mines, BTreeSet::from([Point::new(0, 2)]));
        assert!(deduction.safe.is_empty());

        // (1,3)=1 against (1,2)=2 forces (0,1)
        let deduction = pairwise(&board, Point::new(1, 3), Point::new(1, 2)).unwrap();
        assert_eq!(deduction.mines, BTreeSet::from([Point::new(0, 1)]));
    }

    #[test]
    fn test_pairwise_proves_safe_cells() {
        //   # # # #
        //   1 1 . .
        //
        // (1,0)=1 sees (0,0),(0,1). (1,1)=1 also sees (0,2) and (1,2).
        // The mine must lie in the overlap, so (0,2) and (1,2) are safe.
        let mut board = board(2, 4, &[(0, 0)]);
        board.step(Point::new(1, 0)).unwrap();
        board.step(Point::new(1, 1)).unwrap();

        let deduction = pairwise(&board, Point::new(1, 0), Point::new(1, 1)).unwrap();
        assert!(deduction.mines.is_empty());
        assert_eq!(
            deduction.safe,
            BTreeSet::from([Point::new(0, 2), Point::new(1, 2)])
        );

        // Swapping the pair gives the same conclusion
        let swapped = pairwise(&board, Point::new(1, 1), Point::new(1, 0)).unwrap();
        assert_eq!(swapped, deduction);
    }

    #[test]
    fn test_pairwise_accounts_for_flags() {
        //   # # #
        //   1 2 #
        //
        // Mines at (0,0) and (1,2). With (1,2) flagged, (1,1)=2 has one unflagged mine left,
        // same as (1,0)=1, so the cells only (1,1) sees and that are unknown, (0,2), are safe.
        let mut board = board(2, 3, &[(0, 0), (1, 2)]);
        board.step(Point::new(1, 0)).unwrap();
        board.step(Point::new(1, 1)).unwrap();
        board.flag(Point::new(1, 2));

        let deduction = pairwise(&board, Point::new(1, 0), Point::new(1, 1)).unwrap();
        assert!(deduction.mines.is_empty());
        assert_eq!(deduction.safe, BTreeSet::from([Point::new(0, 2)]));
    }
}
