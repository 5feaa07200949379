//! Application state shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use arena_core::commands::PlayerCommand;
use arena_core::state::GameStateSnapshot;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// `mpsc::Sender` is Send but not Sync, so it sits behind a `Mutex`.
/// The latest snapshot is shared with the game loop thread through an `Arc`.
pub struct AppState {
    /// Channel to the game loop. `None` until the loop is started.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the game loop after each frame.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a player command to the running game loop.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), String> {
        let lock = self.command_tx.lock().map_err(|e| e.to_string())?;
        let tx = lock.as_ref().ok_or("Game loop not started")?;
        tx.send(GameLoopCommand::PlayerCommand(command))
            .map_err(|e| format!("Game loop disconnected: {e}"))
    }

    /// Copy of the most recent snapshot, if any frame has run yet.
    pub fn snapshot(&self) -> Result<Option<GameStateSnapshot>, String> {
        let lock = self.latest_snapshot.lock().map_err(|e| e.to_string())?;
        Ok(lock.clone())
    }

    /// Ask the game loop to stop. Later commands fail with "not started".
    pub fn shutdown(&self) -> Result<(), String> {
        if let Some(tx) = self.command_tx.lock().map_err(|e| e.to_string())?.take() {
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        Ok(())
    }
}
