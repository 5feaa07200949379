//! The mutable simulation state shared by every system.
//!
//! One `SimState` lives inside the engine. Systems receive it by `&mut`
//! for the duration of a tick; nothing else holds a reference into it.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_core::events::GameEvent;
use arena_core::types::SimTime;
use arena_progression::UpgradeLevels;

use crate::pulses::Pulses;
use crate::scheduler::Scheduler;

pub struct SimState {
    pub world: World,
    pub rng: ChaCha8Rng,
    pub time: SimTime,
    /// Current wave number (1-based).
    pub wave: u32,
    pub upgrades: UpgradeLevels,
    pub pulses: Pulses,
    pub scheduler: Scheduler,
    /// Events produced this tick, drained into the snapshot.
    pub events: Vec<GameEvent>,
    /// Every enemy of the current wave is down and the gate is scheduled.
    pub wave_cleared: bool,
    /// Monotonic counter stamped on particles.
    pub particle_serial: u64,
    pub despawn_buffer: Vec<Entity>,
}

impl SimState {
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            time: SimTime::default(),
            wave: 1,
            upgrades: UpgradeLevels::default(),
            pulses: Pulses::default(),
            scheduler: Scheduler::default(),
            events: Vec::new(),
            wave_cleared: false,
            particle_serial: 0,
            despawn_buffer: Vec::new(),
        }
    }

    /// Clear everything belonging to the current run. The RNG keeps its
    /// stream and the scheduler moves to a new epoch, so deferred events
    /// from the old run no-op when they come due.
    pub fn reset(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.wave = 1;
        self.upgrades = UpgradeLevels::default();
        self.pulses = Pulses::default();
        self.scheduler.advance_epoch();
        self.events.clear();
        self.wave_cleared = false;
        self.particle_serial = 0;
        self.despawn_buffer.clear();
    }
}
