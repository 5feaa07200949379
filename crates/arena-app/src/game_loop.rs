//! Game loop thread: drives the simulation engine once per frame.
//!
//! The engine is created inside this thread so it is owned by it alone.
//! Commands arrive via an `mpsc` channel. Snapshots go to the presenter and
//! are stored in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info};

use arena_core::commands::{FrameInput, InputSnapshot};
use arena_core::state::GameStateSnapshot;
use arena_sim::engine::{SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;
use crate::presenter::{self, Presenter};
use crate::state::GameLoopCommand;

/// Host settings for the game loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    pub sim: SimConfig,
    /// Target frames per second.
    pub frame_rate: u32,
    /// Drive the player with the autopilot instead of idle input.
    pub autopilot: bool,
    /// Stop after this many frames (demo runs).
    pub max_frames: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            frame_rate: 60,
            autopilot: true,
            max_frames: None,
        }
    }
}

impl LoopConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.frame_rate.max(1)))
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: LoopConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    presenter: Box<dyn Presenter + Send>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>), String> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("arena-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot, presenter);
        })
        .map_err(|e| format!("Failed to spawn game loop thread: {e}"))?;

    Ok((cmd_tx, handle))
}

/// Advance the engine by one frame, feeding it autopilot input when enabled.
pub fn step_frame(
    engine: &mut SimulationEngine,
    pilot: Option<&mut Autopilot>,
    previous: Option<&GameStateSnapshot>,
    raw_dt: f64,
) -> GameStateSnapshot {
    let input = match (pilot, previous) {
        (Some(pilot), Some(previous)) => {
            let (input, commands) = pilot.drive(previous);
            engine.queue_commands(commands);
            input
        }
        _ => InputSnapshot::default(),
    };
    engine.tick(&FrameInput::new(raw_dt, input))
}

/// The game loop. Runs until Shutdown, channel disconnect or the frame limit.
fn run_game_loop(
    config: LoopConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    mut presenter: Box<dyn Presenter + Send>,
) {
    let mut engine = SimulationEngine::new(config.sim);
    let mut pilot = config.autopilot.then(Autopilot::new);
    let mut previous: Option<GameStateSnapshot> = None;
    let frame_duration = config.frame_duration();
    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;
    let mut frames: u64 = 0;

    info!("game loop started at {} fps", config.frame_rate);
    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    debug!("command {cmd:?}");
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one frame with the measured wall-clock delta
        let now = Instant::now();
        let raw_dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        let snapshot = step_frame(&mut engine, pilot.as_mut(), previous.as_ref(), raw_dt);

        // 3. Hand the frame to the presenter (best-effort)
        presenter::dispatch(presenter.as_mut(), &snapshot);

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        previous = Some(snapshot);

        frames += 1;
        if config.max_frames.is_some_and(|max| frames >= max) {
            info!("frame limit reached after {frames} frames");
            return;
        }

        // 5. Sleep until the next frame
        next_frame_time += frame_duration;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > frame_duration * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_frame_time = now;
        }
    }
}
