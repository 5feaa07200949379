//! Presentation adapter boundary.
//!
//! The host hands every snapshot and event to a `Presenter`. Presentation
//! is best-effort: failures are logged and dropped so they never stall the
//! simulation.

use std::collections::HashMap;

use log::{debug, info, warn};

use arena_core::events::GameEvent;
use arena_core::state::GameStateSnapshot;

/// Consumer of simulation output (renderer, audio, UI).
pub trait Presenter {
    /// Called once per frame with the full snapshot.
    fn present(&mut self, snapshot: &GameStateSnapshot) -> Result<(), String>;

    /// Called for each event in the snapshot, in order.
    fn on_event(&mut self, event: &GameEvent) -> Result<(), String>;
}

/// Deliver one frame to `presenter`, swallowing any failure.
/// Returns the number of calls that failed.
pub fn dispatch(presenter: &mut dyn Presenter, snapshot: &GameStateSnapshot) -> usize {
    let mut failures = 0;
    for event in &snapshot.events {
        if let Err(e) = presenter.on_event(event) {
            warn!("presenter dropped {event:?}: {e}");
            failures += 1;
        }
    }
    if let Err(e) = presenter.present(snapshot) {
        warn!("presenter failed on tick {}: {e}", snapshot.time.tick);
        failures += 1;
    }
    failures
}

/// Opaque handle a presentation layer would attach to an enemy mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u64);

/// Presenter that writes events to the log and keeps a slot -> handle
/// table the way a scene graph would.
#[derive(Debug, Default)]
pub struct LogPresenter {
    handles: HashMap<u32, SceneHandle>,
    next_handle: u64,
    frames: u64,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_for(&self, slot: u32) -> Option<SceneHandle> {
        self.handles.get(&slot).copied()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, snapshot: &GameStateSnapshot) -> Result<(), String> {
        self.frames += 1;
        self.handles
            .retain(|slot, _| snapshot.enemies.iter().any(|e| e.slot == *slot));
        for enemy in &snapshot.enemies {
            if !self.handles.contains_key(&enemy.slot) {
                self.next_handle += 1;
                self.handles.insert(enemy.slot, SceneHandle(self.next_handle));
            }
        }
        Ok(())
    }

    fn on_event(&mut self, event: &GameEvent) -> Result<(), String> {
        match event {
            GameEvent::WaveStart { wave, enemy_max_hp } => {
                info!("wave {wave} begins ({enemy_max_hp} hp per enemy)");
            }
            GameEvent::UpgradeGate { wave, offers } => {
                let lines: Vec<&str> = offers.iter().map(|o| o.description.as_str()).collect();
                info!("wave {wave} cleared, choose: {}", lines.join(" | "));
            }
            GameEvent::PlayerDeath { wave } => info!("defeated on wave {wave}"),
            other => debug!("{other:?}"),
        }
        Ok(())
    }
}
