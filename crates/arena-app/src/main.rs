use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use arena_app::game_loop::{self, LoopConfig};
use arena_app::presenter::LogPresenter;
use arena_app::session;
use arena_app::state::AppState;
use arena_core::commands::PlayerCommand;
use arena_sim::engine::SimConfig;

/// Default demo length: two minutes at 60 fps.
const DEMO_FRAMES: u64 = 60 * 120;

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let session_path = std::env::args().nth(1).map(PathBuf::from);
    let seed = match std::env::args().nth(2) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| format!("Invalid seed {raw:?}: {e}"))?,
        None => SimConfig::default().seed,
    };
    let session = session::load_session(session_path.as_deref());

    let config = LoopConfig {
        sim: SimConfig { seed, session },
        max_frames: Some(DEMO_FRAMES),
        ..Default::default()
    };

    let state = AppState::new();
    let (tx, handle) = game_loop::spawn_game_loop(
        config,
        Arc::clone(&state.latest_snapshot),
        Box::new(LogPresenter::new()),
    )?;
    *state.command_tx.lock().map_err(|e| e.to_string())? = Some(tx);

    state.send_command(PlayerCommand::StartGame { session })?;

    handle
        .join()
        .map_err(|_| "Game loop thread panicked".to_string())?;

    if let Some(snapshot) = state.snapshot()? {
        info!(
            "finished on wave {} ({:?}), upgrades {:?}",
            snapshot.wave, snapshot.phase, snapshot.upgrades
        );
    }
    state.shutdown()
}
