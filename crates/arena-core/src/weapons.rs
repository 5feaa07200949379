//! The fixed weapon table.

use crate::enums::WeaponKind;

/// Static tuning for one weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub kind: WeaponKind,
    pub name: &'static str,
    /// Base damage before wave scaling and upgrades.
    pub damage: f64,
    /// Melee reach. `None` for ranged weapons, which spawn a projectile.
    pub range: Option<f64>,
    /// Attack cooldown (seconds).
    pub cooldown_secs: f64,
}

/// Weapons in switching order.
pub const WEAPONS: [WeaponStats; 3] = [
    WeaponStats {
        kind: WeaponKind::Sword,
        name: "sword",
        damage: 15.0,
        range: Some(2.8),
        cooldown_secs: 0.3,
    },
    WeaponStats {
        kind: WeaponKind::Spear,
        name: "spear",
        damage: 20.0,
        range: Some(4.0),
        cooldown_secs: 0.5,
    },
    WeaponStats {
        kind: WeaponKind::Bow,
        name: "bow",
        damage: 12.0,
        range: None,
        cooldown_secs: 0.6,
    },
];

impl WeaponKind {
    pub fn index(&self) -> usize {
        match self {
            WeaponKind::Sword => 0,
            WeaponKind::Spear => 1,
            WeaponKind::Bow => 2,
        }
    }

    pub fn stats(&self) -> &'static WeaponStats {
        &WEAPONS[self.index()]
    }

    /// Next weapon in the cycle.
    pub fn next(&self) -> WeaponKind {
        WEAPONS[(self.index() + 1) % WEAPONS.len()].kind
    }

    pub fn is_ranged(&self) -> bool {
        self.stats().range.is_none()
    }
}
