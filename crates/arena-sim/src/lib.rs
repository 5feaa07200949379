//! Simulation engine for the arena.
//!
//! Owns the hecs ECS world, advances one tick per rendered frame,
//! and produces `GameStateSnapshot`s for the presentation layer.

pub mod combat;
pub mod engine;
pub mod pulses;
pub mod scheduler;
pub mod state;
pub mod systems;
pub mod world_setup;

pub use arena_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
