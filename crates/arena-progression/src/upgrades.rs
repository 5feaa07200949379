use serde::{Deserialize, Serialize};

use arena_core::constants::*;
use arena_core::enums::UpgradeKind;
use arena_core::state::{UpgradeLevelsView, UpgradeOffer};

/// Attack multiplier at a given attack level (+15% per level).
pub fn attack_multiplier(level: u32) -> f64 {
    1.0 + level as f64 * ATTACK_UPGRADE_STEP
}

/// Incoming damage multiplier at a given defense level (-12% per level,
/// never below 10%).
pub fn defense_multiplier(level: u32) -> f64 {
    (1.0 - level as f64 * DEFENSE_UPGRADE_STEP).max(DEFENSE_MULTIPLIER_FLOOR)
}

/// Movement speed at a given agility level (+10% per level).
pub fn move_speed(level: u32) -> f64 {
    PLAYER_BASE_SPEED * (1.0 + level as f64 * AGILITY_UPGRADE_STEP)
}

pub fn upgrade_name(kind: UpgradeKind) -> &'static str {
    match kind {
        UpgradeKind::Hp => "hp",
        UpgradeKind::Attack => "attack",
        UpgradeKind::Defense => "defense",
        UpgradeKind::Agility => "agility",
    }
}

/// Upgrade counts for the current run. Counts only ever go up; a new run
/// starts from `UpgradeLevels::default()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    hp: u32,
    attack: u32,
    defense: u32,
    agility: u32,
}

impl UpgradeLevels {
    pub fn level_for(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Hp => self.hp,
            UpgradeKind::Attack => self.attack,
            UpgradeKind::Defense => self.defense,
            UpgradeKind::Agility => self.agility,
        }
    }

    /// Take one level of `kind`. Returns the new level.
    pub fn increment(&mut self, kind: UpgradeKind) -> u32 {
        let slot = match kind {
            UpgradeKind::Hp => &mut self.hp,
            UpgradeKind::Attack => &mut self.attack,
            UpgradeKind::Defense => &mut self.defense,
            UpgradeKind::Agility => &mut self.agility,
        };
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn total(&self) -> u32 {
        self.hp + self.attack + self.defense + self.agility
    }

    pub fn attack_multiplier(&self) -> f64 {
        attack_multiplier(self.attack)
    }

    pub fn defense_multiplier(&self) -> f64 {
        defense_multiplier(self.defense)
    }

    pub fn move_speed(&self) -> f64 {
        move_speed(self.agility)
    }

    /// The four choices for the upgrade gate, each describing the value
    /// before and after taking it.
    pub fn offers(&self, current_max_hp: u32) -> Vec<UpgradeOffer> {
        UpgradeKind::ALL
            .iter()
            .map(|&kind| {
                let level = self.level_for(kind);
                let (current, next, description) = match kind {
                    UpgradeKind::Hp => {
                        let next = current_max_hp + HP_UPGRADE_AMOUNT;
                        (
                            current_max_hp as f64,
                            next as f64,
                            format!("max hp {current_max_hp} -> {next}"),
                        )
                    }
                    UpgradeKind::Attack => {
                        let (c, n) = (attack_multiplier(level), attack_multiplier(level + 1));
                        (c, n, format!("attack x{c:.2} -> x{n:.2}"))
                    }
                    UpgradeKind::Defense => {
                        let (c, n) = (defense_multiplier(level), defense_multiplier(level + 1));
                        (c, n, format!("damage taken x{c:.2} -> x{n:.2}"))
                    }
                    UpgradeKind::Agility => {
                        let (c, n) = (move_speed(level), move_speed(level + 1));
                        (c, n, format!("speed {c:.1} -> {n:.1}"))
                    }
                };
                UpgradeOffer {
                    kind,
                    level,
                    current,
                    next,
                    description,
                }
            })
            .collect()
    }

    pub fn view(&self) -> UpgradeLevelsView {
        UpgradeLevelsView {
            hp: self.hp,
            attack: self.attack,
            defense: self.defense,
            agility: self.agility,
        }
    }
}
