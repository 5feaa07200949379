//! Game state snapshot: the complete visible state handed to the
//! presentation layer once per frame.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimTime};

/// Complete read-only view produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub session: SessionConfig,
    pub wave: u32,
    /// Current global time scale (1.0 normal, lower during slow motion).
    pub time_scale: f64,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    /// Slot of the nearest living enemy.
    pub target_enemy: Option<u32>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub camera: CameraView,
    pub upgrades: UpgradeLevelsView,
    /// Present while the upgrade gate is open.
    pub upgrade_offers: Option<Vec<UpgradeOffer>>,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub facing: f64,
    pub hp: u32,
    pub max_hp: u32,
    /// hp / max_hp in [0, 1] for bar rendering.
    pub hp_fraction: f64,
    pub attacking: bool,
    pub weapon: WeaponKind,
    pub weapon_name: String,
    /// Recently hit; drives the red flash.
    pub flash: bool,
    pub grounded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub slot: u32,
    pub archetype: EnemyArchetype,
    pub position: Position,
    pub facing: f64,
    pub state: EnemyState,
    pub hp: u32,
    pub max_hp: u32,
    pub hp_fraction: f64,
    pub alive: bool,
    pub flash: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    /// Flight direction as a facing angle.
    pub heading: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Position,
    pub color: ParticleColor,
    pub opacity: f64,
}

/// Camera focus and shake for the presentation camera rig.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraView {
    pub focus: Position,
    /// Remaining shake time (wall-clock seconds).
    pub shake_timer: f64,
    pub shake_intensity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevelsView {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
}

/// One choice shown at the upgrade gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOffer {
    pub kind: UpgradeKind,
    /// Level before taking the upgrade.
    pub level: u32,
    pub current: f64,
    pub next: f64,
    /// Human readable "current → next" line.
    pub description: String,
}
