//! Session configuration read at each game (re)start.

use serde::{Deserialize, Serialize};

use crate::enums::{BattleMode, EnemyArchetype};

/// Options chosen on the menu. The engine never persists these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub battle_mode: BattleMode,
    #[serde(default)]
    pub archetype: EnemyArchetype,
    /// Offer an upgrade between waves. When off, the next wave starts as
    /// soon as the post-kill delay elapses.
    #[serde(default = "default_upgrade_gate")]
    pub upgrade_gate: bool,
}

fn default_upgrade_gate() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            battle_mode: BattleMode::default(),
            archetype: EnemyArchetype::default(),
            upgrade_gate: default_upgrade_gate(),
        }
    }
}

impl SessionConfig {
    /// Parse a session from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid session config: {e}"))
    }
}
