//! Arena host application.
//!
//! Runs the simulation engine on a frame-driven game-loop thread, forwards
//! commands to it and hands snapshots to a presentation adapter.

pub mod autopilot;
pub mod game_loop;
pub mod presenter;
pub mod session;
pub mod state;

pub use arena_core as core;
