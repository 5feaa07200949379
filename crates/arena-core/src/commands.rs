//! Player commands and per-frame input sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. Input is a
//! snapshot taken once per rendered frame.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::enums::*;

/// Discrete menu / flow actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start a new game from the main menu with the given session settings.
    StartGame { session: SessionConfig },
    /// Restart with the current session settings.
    Restart,
    /// Leave the current game.
    ReturnToMenu,
    /// Pick an upgrade at the gate between waves.
    ChooseUpgrade { kind: UpgradeKind },
    Pause,
    Resume,
}

/// Normalized controls for one frame, produced by the input aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Strafe axis in [-1, 1], camera-relative.
    pub move_x: f64,
    /// Forward axis in [-1, 1], camera-relative.
    pub move_z: f64,
    /// Camera yaw used to rotate movement into world space (radians).
    pub camera_yaw: f64,
    /// Attack button held.
    pub attack: bool,
    /// Jump button held.
    pub jump: bool,
    /// Weapon-switch button held.
    pub weapon_switch: bool,
}

/// Everything the engine needs to advance one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Unscaled, unclamped seconds since the previous frame.
    pub raw_dt: f64,
    pub input: InputSnapshot,
}

impl FrameInput {
    pub fn new(raw_dt: f64, input: InputSnapshot) -> Self {
        Self { raw_dt, input }
    }

    /// A frame with no input.
    pub fn idle(raw_dt: f64) -> Self {
        Self {
            raw_dt,
            input: InputSnapshot::default(),
        }
    }
}
