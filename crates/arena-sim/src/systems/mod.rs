//! ECS systems that operate on the simulation state each tick.
//!
//! Systems are free functions over `&mut SimState` (or `&World` when
//! read-only). Persistent data lives in components and in `SimState`.

pub mod cleanup;
pub mod enemy_ai;
pub mod particles;
pub mod player;
pub mod projectiles;
pub mod snapshot;
pub mod waves;
