use setsweeper as ss;
use wasm_bindgen::prelude::*;

/// Plays a whole game and returns the serialized `GameReport`.
#[wasm_bindgen]
pub fn play_game(
    rows: usize,
    cols: usize,
    mines: usize,
    board_seed: u64,
    agent_seed: u64,
    pairwise: bool,
    first_safe: bool,
) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let config = ss::BoardConfig::new(rows, cols, mines).first_safe(first_safe);
    let agent = if pairwise {
        ss::AgentKind::Set
    } else {
        ss::AgentKind::Simple
    };
    ss::play_seeded(config, board_seed, agent, agent_seed)
        .and_then(|report| report.serialize())
        .map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn did_win(bts: Vec<u8>) -> Result<bool, String> {
    console_error_panic_hook::set_once();

    let report = ss::GameReport::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(report.state == ss::GameState::Won)
}

/// The final board, row by row. See `GameReport::cells` for the encoding.
#[wasm_bindgen]
pub fn get_cells(bts: Vec<u8>) -> Result<Vec<i8>, String> {
    console_error_panic_hook::set_once();

    let report = ss::GameReport::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(report.cells())
}
