use crate::agent::{AgentKind, Move, Outcome};
use crate::board::{Board, GameState, Tile};
use crate::config::{BoardConfig, PlayConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A finished game: final display state plus every move that led to it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameReport {
    pub rows: usize,
    pub cols: usize,
    pub state: GameState,
    pub moves: Vec<Move>,
    /// Final display state, hidden mines included.
    pub tiles: Vec<Vec<Tile>>,
}

impl GameReport {
    pub fn new(board: &Board, outcome: Outcome) -> Self {
        GameReport {
            rows: board.rows(),
            cols: board.cols(),
            state: outcome.state,
            moves: outcome.moves,
            tiles: board.tiles(true),
        }
    }

    /// Deserializes a report from bytes.
    pub fn deserialize(bts: &[u8]) -> anyhow::Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    /// Serializes the report to bytes.
    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    /// The final tiles flattened row by row: `0..=8` revealed, -1 hidden, -2 flagged,
    /// -3 exploded, -4 unflagged mine.
    pub fn cells(&self) -> Vec<i8> {
        self.tiles
            .iter()
            .flatten()
            .map(|tile| match tile {
                Tile::Revealed(n) => *n as i8,
                Tile::Hidden => -1,
                Tile::Flagged => -2,
                Tile::Exploded => -3,
                Tile::Mine => -4,
            })
            .collect()
    }
}

/// Plays one silent game from two seeds.
pub fn play_seeded(
    config: BoardConfig,
    board_seed: u64,
    agent: AgentKind,
    agent_seed: u64,
) -> anyhow::Result<GameReport> {
    let mut board = Board::seeded(config, board_seed)?;
    let mut agent = agent.build(StdRng::seed_from_u64(agent_seed));
    let outcome = agent.play(&mut board, &PlayConfig::default())?;
    Ok(GameReport::new(&board, outcome))
}
