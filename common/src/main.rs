use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use setsweeper::*;
use tracing_subscriber::EnvFilter;

/// Play automated games of Minesweeper.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed for both the board and the agent seeds
    #[arg(short, long, conflicts_with_all = ["board_seed", "agent_seed"])]
    seed: Option<u64>,

    /// Seed for the board
    #[arg(long)]
    board_seed: Option<u64>,

    /// Seed for the agent
    #[arg(long)]
    agent_seed: Option<u64>,

    /// Agent playing the game
    #[arg(short, long, value_enum, default_value_t = AgentKind::Set)]
    agent: AgentKind,

    /// Board size preset [default: expert]
    #[arg(short, long, value_enum, conflicts_with_all = ["rows", "columns", "mines"])]
    difficulty: Option<Difficulty>,

    /// Number of rows of the board
    #[arg(short, long, short_alias = 'H', alias = "height", requires_all = ["columns", "mines"])]
    rows: Option<usize>,

    /// Number of columns of the board
    #[arg(short, long, short_alias = 'W', alias = "width", requires_all = ["rows", "mines"])]
    columns: Option<usize>,

    /// Number of mines on the board
    #[arg(short, long, requires_all = ["rows", "columns"])]
    mines: Option<usize>,

    /// Colour the board drawings
    #[arg(short = 'C', long)]
    coloured: bool,

    /// Increase output verbosity (-vvvv also enables debug logs)
    #[arg(short = 'v', long, alias = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Show the location of all mines on the board
    #[arg(long)]
    show_mines: bool,

    /// Highlight the cells the set agent is working on. Needs -vvv
    #[arg(long)]
    show_strategy: bool,

    /// Number of games to play
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    play_count: u32,

    /// Pause on Enter at notable moments
    #[arg(long)]
    step_by_step: bool,

    /// Make sure the first cell revealed is never a mine
    #[arg(long)]
    first_safe: bool,
}

impl Args {
    fn board_config(&self) -> BoardConfig {
        let config = match (self.rows, self.columns, self.mines) {
            (Some(rows), Some(cols), Some(mines)) => BoardConfig::new(rows, cols, mines),
            _ => self.difficulty.unwrap_or(Difficulty::Expert).config(),
        };
        config.first_safe(self.first_safe)
    }

    fn play_config(&self) -> PlayConfig {
        PlayConfig {
            show_mines: self.show_mines,
            coloured: self.coloured,
            verbosity: self.verbosity,
            show_strategy: self.show_strategy,
            step_by_step: self.step_by_step,
            opening: None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbosity);
    if args.coloured {
        colored::control::set_override(true);
    }

    // --- 1. Seeds ---
    let mut master = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let board_seed = args.board_seed.unwrap_or_else(|| {
        let seed: u64 = master.random();
        println!("Board seed: {seed}");
        seed
    });
    let agent_seed = args.agent_seed.unwrap_or_else(|| {
        let seed: u64 = master.random();
        println!("Agent seed: {seed}");
        seed
    });

    // --- 2. Board and agent ---
    let mut board = Board::seeded(args.board_config(), board_seed)?;
    let mut agent = args.agent.build(StdRng::seed_from_u64(agent_seed));
    let play_config = args.play_config();
    tracing::debug!(
        agent = agent.name(),
        rows = board.rows(),
        cols = board.cols(),
        mines = board.mine_count(),
        first_safe = board.config().first_safe,
        "starting"
    );

    // --- 3. Game loop ---
    let total = args.play_count as usize;
    let progress = progress_bar(total, args.verbosity < 1)?;
    let mut wins = 0;
    for game in 1..=total {
        board.reset();
        let outcome = agent.play(&mut board, &play_config)?;
        if outcome.won() {
            wins += 1;
        }
        tracing::debug!(
            game,
            state = ?outcome.state,
            moves = outcome.moves.len(),
            guesses = outcome.guesses(),
            "game finished"
        );

        if args.step_by_step && total > 1 {
            let _ = std::io::stdin().read_line(&mut String::new());
        }
        progress.set_message(format!("{:.1}%", percent(wins, game)));
        progress.inc(1);
    }
    progress.finish();

    // --- 4. Final result ---
    println!(
        "Won {wins} out of {total} games ({:.1}%)",
        percent(wins, total)
    );
    Ok(())
}

/// Sends logs to stderr. `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbosity: u8) {
    let default = if verbosity > 3 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// One tick per game, with the running win rate as the message. Hidden unless `visible`.
fn progress_bar(total: usize, visible: bool) -> anyhow::Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("[{bar:60}] {percent}% ({msg})")?.progress_chars("= "),
    );
    Ok(pb)
}

fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}
