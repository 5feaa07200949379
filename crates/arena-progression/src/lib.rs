//! Between-wave progression: persistent stat upgrades, the multipliers they
//! feed into combat and movement, and the offers shown at the upgrade gate.

pub mod upgrades;

pub use arena_core as core;
pub use upgrades::UpgradeLevels;
