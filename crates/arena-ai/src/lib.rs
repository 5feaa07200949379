//! Enemy AI for the arena.
//!
//! Implements the per-enemy approach / windup / charge / retreat state
//! machine and the archetype-driven tuning profiles it reads.

pub mod fsm;
pub mod profiles;

pub use arena_core as core;
