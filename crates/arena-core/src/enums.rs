//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    /// Player, enemies and projectiles are simulated.
    Active,
    Paused,
    /// Between waves, waiting for the player to pick an upgrade.
    UpgradeSelect,
    /// Player hit points reached zero.
    GameOver,
}

/// Enemy AI state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Closing in on the player.
    #[default]
    Approach,
    /// Telegraphing a charge.
    Windup,
    /// Dashing along a frozen direction.
    Charge,
    /// Backing off after a charge.
    Retreat,
}

/// Enemy archetype. Both share the same state machine; only tuning differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Winged creature.
    #[default]
    Beast,
    /// Humanoid fighter.
    Warrior,
}

/// How many enemies fight at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleMode {
    /// 1 vs 1.
    #[default]
    Single,
    /// 1 vs 2.
    Double,
}

impl BattleMode {
    pub fn enemy_count(&self) -> u32 {
        match self {
            BattleMode::Single => 1,
            BattleMode::Double => 2,
        }
    }
}

/// Player weapons, in switching order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Sword,
    Spear,
    Bow,
}

/// Persistent stat upgrades chosen between waves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Hp,
    Attack,
    Defense,
    Agility,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Hp,
        UpgradeKind::Attack,
        UpgradeKind::Defense,
        UpgradeKind::Agility,
    ];
}

/// How an enemy was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Melee,
    Ranged,
}

/// Color tag for cosmetic particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Enemy hit sparks.
    Gold,
    /// Enemy death burst.
    Ember,
    /// Weapon swing.
    White,
    /// Player taking damage.
    Red,
    /// Weapon switch.
    Steel,
}
