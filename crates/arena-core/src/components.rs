//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Marks the player entity. Exactly one exists while a game is running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Hit points. `current` never exceeds `max` and never goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

/// Player controller state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    /// Vertical velocity (units/s, positive is up).
    pub vertical_velocity: f64,
    /// Facing angle (radians, 0 = +z).
    pub facing: f64,
    /// Attack swing in progress.
    pub attacking: bool,
    /// Remaining swing time (seconds).
    pub attack_timer: f64,
    /// Time until the next attack may trigger (seconds).
    pub attack_cooldown: f64,
    /// Refractory window against incoming hits (seconds).
    pub hit_cooldown: f64,
    pub weapon: WeaponKind,
    /// Attack input was held last frame (edge detection).
    pub attack_latch: bool,
    /// Weapon-switch input was held last frame (edge detection).
    pub switch_latch: bool,
}

/// An enemy combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Stable index within the wave (0 or 1).
    pub slot: u32,
    pub archetype: EnemyArchetype,
    /// Facing angle (radians, 0 = +z).
    pub facing: f64,
    /// Refractory window against player hits (seconds).
    pub hit_cooldown: f64,
    pub alive: bool,
}

/// Enemy state machine data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBrain {
    pub state: EnemyState,
    /// Seconds left in the current timed state.
    pub state_timer: f64,
    /// Facing angle frozen when the charge began. Always `Some` in `Charge`
    /// and `Retreat`.
    pub charge_dir: Option<f64>,
}

/// A player arrow in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub lifetime_secs: f64,
    /// Damage frozen at launch.
    pub damage: u32,
}

/// Cosmetic particle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub lifetime_secs: f64,
    pub color: ParticleColor,
    pub opacity: f64,
    /// Spawn order, used to retire the oldest particles first.
    pub serial: u64,
}
