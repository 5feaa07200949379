//! Events emitted by the simulation for audio, particle and UI feedback.
//!
//! Events are fire-and-forget: the simulation never waits on a response.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::UpgradeOffer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Player started an attack swing.
    Attack { weapon: WeaponKind },
    /// A melee swing connected.
    MeleeHit {
        slot: u32,
        damage: u32,
        remaining_hp: u32,
    },
    /// An arrow connected.
    RangedHit {
        slot: u32,
        damage: u32,
        remaining_hp: u32,
    },
    /// Emitted exactly once per enemy per wave.
    EnemyDeath { slot: u32, wave: u32 },
    WeaponSwitch { weapon: WeaponKind },
    WaveStart { wave: u32, enemy_max_hp: u32 },
    PlayerHit { damage: u32, remaining_hp: u32 },
    PlayerDeath { wave: u32 },
    /// Ask the UI to show the upgrade choice.
    UpgradeGate { wave: u32, offers: Vec<UpgradeOffer> },
    UpgradeApplied { kind: UpgradeKind, level: u32 },
}
