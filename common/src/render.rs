//! Plain-text drawing of a board, with optional colours and highlights.

use crate::board::{Board, Point, Tile};
use crate::config::PlayConfig;
use colored::{Color, ColoredString, Colorize};
use std::collections::BTreeSet;

const DIGITS: [&str; 9] = ["0", "1", "2", "3", "4", "5", "6", "7", "8"];

/// What to draw besides the player-visible state.
#[derive(Debug, Clone, Default)]
pub struct DrawOptions {
    pub show_mines: bool,
    pub coloured: bool,
    /// Cells drawn on a yellow background.
    pub highlighted: BTreeSet<Point>,
    /// Cells drawn underlined.
    pub underlined: BTreeSet<Point>,
}

impl From<&PlayConfig> for DrawOptions {
    fn from(config: &PlayConfig) -> Self {
        DrawOptions {
            show_mines: config.show_mines,
            coloured: config.coloured,
            ..Default::default()
        }
    }
}

/// Draws the board one row per line:
/// `#` hidden, `F` flagged, `X` exploded, `M` hidden mine, digits for revealed cells.
pub fn draw(board: &Board, options: &DrawOptions) -> String {
    let mut out = String::new();
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let at = Point { row, col };
            let tile = board.tile(at, options.show_mines);

            let mut cell: ColoredString = glyph(tile).normal();
            if let (true, Some(fg)) = (options.coloured, colour(tile)) {
                cell = cell.color(fg);
            }
            if options.highlighted.contains(&at) {
                cell = cell.on_bright_yellow();
            }
            if options.underlined.contains(&at) {
                cell = cell.underline();
            }

            out.push_str(&cell.to_string());
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn glyph(tile: Tile) -> &'static str {
    match tile {
        Tile::Hidden => "#",
        Tile::Flagged => "F",
        Tile::Exploded => "X",
        Tile::Mine => "M",
        Tile::Revealed(n) => DIGITS[n as usize],
    }
}

fn colour(tile: Tile) -> Option<Color> {
    let colour = match tile {
        Tile::Hidden => return None,
        Tile::Flagged => Color::BrightBlue,
        Tile::Exploded | Tile::Mine => Color::BrightRed,
        Tile::Revealed(0) => Color::Black,
        Tile::Revealed(1) => Color::Red,
        Tile::Revealed(2) => Color::Green,
        Tile::Revealed(3) => Color::Yellow,
        Tile::Revealed(4) => Color::Blue,
        Tile::Revealed(5) => Color::Magenta,
        Tile::Revealed(6) => Color::Cyan,
        Tile::Revealed(7) => Color::White,
        Tile::Revealed(_) => Color::BrightBlack,
    };
    Some(colour)
}

// --- Agent output ---

/// Per-iteration drawing, shown at verbosity 3 and above.
///
/// `strategy` holds the pairwise frontier (highlighted) and the pending searches (underlined),
/// drawn only with `show_strategy`. Only a view with a strategy pauses for `step_by_step`.
pub(crate) fn iteration(
    board: &Board,
    config: &PlayConfig,
    strategy: Option<(&BTreeSet<Point>, &BTreeSet<Point>)>,
) {
    if config.verbosity <= 2 {
        return;
    }
    let mut options = DrawOptions::from(config);
    if let (true, Some((frontier, searching))) = (config.show_strategy, strategy) {
        options.highlighted = frontier.clone();
        options.underlined = searching.clone();
    }
    println!("{}", draw(board, &options));

    if pauses(config, strategy.is_some()) {
        // Any input, or a closed stdin, moves on.
        let _ = std::io::stdin().read_line(&mut String::new());
    }
}

fn pauses(config: &PlayConfig, has_strategy: bool) -> bool {
    config.step_by_step && has_strategy
}

/// End-of-game output: the final board at verbosity 2, the result from verbosity 1.
pub(crate) fn finish(board: &Board, config: &PlayConfig) {
    if config.verbosity > 1 {
        println!("{}", draw(board, &DrawOptions::from(config)));
    }
    if config.verbosity > 0 {
        if board.winning_state() {
            println!("I won!");
        } else {
            println!("I lost...");
        }
    }
}
