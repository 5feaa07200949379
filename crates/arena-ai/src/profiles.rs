//! Archetype-specific behavioral profiles.
//!
//! Both archetypes run the same state machine; they differ only in these
//! numbers. Mesh and animation differences live in the presentation layer.

use arena_core::enums::EnemyArchetype;

/// Tuning for an enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyBehaviorProfile {
    /// Hit points at wave 1 (before battle-mode scaling).
    pub base_hp: u32,
    /// Contact damage at wave 0, before wave scaling and defense.
    pub base_damage: f64,
    /// Approach speed (units/s). Retreat runs at a fraction of this.
    pub move_speed: f64,
    /// Charge speed at wave 0 (units/s).
    pub charge_speed: f64,
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> EnemyBehaviorProfile {
    match archetype {
        EnemyArchetype::Beast => EnemyBehaviorProfile {
            base_hp: 80,
            base_damage: 8.0,
            move_speed: 4.0,
            charge_speed: 8.0,
        },
        EnemyArchetype::Warrior => EnemyBehaviorProfile {
            base_hp: 70,
            base_damage: 10.0,
            move_speed: 4.5,
            charge_speed: 9.0,
        },
    }
}
