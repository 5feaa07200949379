//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the simulation state, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless,
//! so whole runs can be driven from tests with a fixed seed.

use std::collections::VecDeque;

use hecs::World;
use log::{info, warn};

use arena_core::commands::{FrameInput, PlayerCommand};
use arena_core::components::{Health, Player};
use arena_core::config::SessionConfig;
use arena_core::constants::PLAYER_BASE_HP;
use arena_core::enums::GamePhase;
use arena_core::events::GameEvent;
use arena_core::state::{GameStateSnapshot, UpgradeOffer};
use arena_core::types::SimTime;
use arena_progression::UpgradeLevels;

use crate::combat;
use crate::scheduler::DeferredKind;
use crate::state::SimState;
use crate::systems;
use crate::world_setup;

/// Configuration for a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs = same simulation.
    pub seed: u64,
    /// Session used until a `StartGame` command supplies another.
    pub session: SessionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            session: SessionConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    state: SimState,
    phase: GamePhase,
    session: SessionConfig,
    command_queue: VecDeque<PlayerCommand>,
    /// Offers shown while the upgrade gate is open.
    upgrade_offers: Option<Vec<UpgradeOffer>>,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: SimState::new(config.seed),
            phase: GamePhase::default(),
            session: config.session,
            command_queue: VecDeque::new(),
            upgrade_offers: None,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one frame and return the resulting snapshot.
    ///
    /// Nothing advances on the main menu or while paused, wall clock
    /// included. Outside `Active` only particles, shake and deferred events
    /// keep running.
    pub fn tick(&mut self, frame: &FrameInput) -> GameStateSnapshot {
        self.process_commands();

        if !matches!(self.phase, GamePhase::MainMenu | GamePhase::Paused) {
            let dt = self
                .state
                .time
                .advance(frame.raw_dt, self.state.pulses.time_scale());
            self.fire_deferred();

            if self.phase == GamePhase::Active {
                self.run_systems(dt, frame);
            }

            systems::particles::run(&mut self.state.world, dt);
            self.state.pulses.shake.decay(frame.raw_dt);
            systems::cleanup::run(&mut self.state.world, &mut self.state.despawn_buffer);
        }

        let events = std::mem::take(&mut self.state.events);
        systems::snapshot::build_snapshot(
            &self.state,
            self.phase,
            &self.session,
            self.upgrade_offers.clone(),
            events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.state.time
    }

    pub fn wave(&self) -> u32 {
        self.state.wave
    }

    pub fn time_scale(&self) -> f64 {
        self.state.pulses.time_scale()
    }

    pub fn session(&self) -> SessionConfig {
        self.session
    }

    pub fn upgrades(&self) -> UpgradeLevels {
        self.state.upgrades
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.state.world
    }

    /// Direct access to the simulation state (for test setup).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame { session } => {
                if self.phase == GamePhase::MainMenu {
                    self.session = session;
                    self.start_run();
                } else {
                    warn!("ignoring StartGame in {:?}", self.phase);
                }
            }
            PlayerCommand::Restart => {
                if self.phase != GamePhase::MainMenu {
                    self.start_run();
                }
            }
            PlayerCommand::ReturnToMenu => {
                self.state.reset();
                self.upgrade_offers = None;
                self.phase = GamePhase::MainMenu;
                info!("returned to menu");
            }
            PlayerCommand::ChooseUpgrade { kind } => {
                if self.phase == GamePhase::UpgradeSelect {
                    systems::waves::apply_upgrade(&mut self.state, kind);
                    systems::waves::advance_wave(&mut self.state, &self.session);
                    self.upgrade_offers = None;
                    self.phase = GamePhase::Active;
                } else {
                    warn!("ignoring ChooseUpgrade({kind:?}) in {:?}", self.phase);
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    /// Tear down the current run and start wave 1 with `self.session`.
    fn start_run(&mut self) {
        self.state.reset();
        self.upgrade_offers = None;
        world_setup::spawn_player(&mut self.state.world, PLAYER_BASE_HP);
        systems::waves::spawn_wave(&mut self.state, &self.session);
        self.phase = GamePhase::Active;
        info!(
            "run started: {:?} vs {:?}, upgrade gate {}",
            self.session.battle_mode,
            self.session.archetype,
            if self.session.upgrade_gate { "on" } else { "off" }
        );
    }

    /// Fire wall-clock events that came due this frame.
    fn fire_deferred(&mut self) {
        let now = self.state.time.wall_secs;
        for kind in self.state.scheduler.drain_due(now) {
            match kind {
                DeferredKind::SlowMotionRebound { pulse } => {
                    self.state.pulses.dilation.end_slow_motion(pulse);
                }
                DeferredKind::UpgradeGate { wave } => {
                    if self.phase != GamePhase::Active || wave != self.state.wave {
                        continue;
                    }
                    self.open_upgrade_gate();
                }
            }
        }
    }

    fn open_upgrade_gate(&mut self) {
        if !self.session.upgrade_gate {
            systems::waves::advance_wave(&mut self.state, &self.session);
            return;
        }
        let max_hp = player_health(&self.state.world).map_or(PLAYER_BASE_HP, |h| h.max);
        let offers = self.state.upgrades.offers(max_hp);
        self.state.events.push(GameEvent::UpgradeGate {
            wave: self.state.wave,
            offers: offers.clone(),
        });
        self.upgrade_offers = Some(offers);
        self.phase = GamePhase::UpgradeSelect;
        info!("upgrade gate opened after wave {}", self.state.wave);
    }

    /// Run the gameplay systems in order.
    fn run_systems(&mut self, dt: f64, frame: &FrameInput) {
        // 1. Player controller (movement, attacks, arrow launch)
        systems::player::run(&mut self.state, dt, &frame.input);
        // 2. Enemy AI (FSM, charge contact)
        systems::enemy_ai::run(&mut self.state, dt);
        // 3. Projectiles (flight, hits), halted once the player is down
        if !combat::player_down(&self.state.world) {
            systems::projectiles::run(&mut self.state, dt);
        }

        if combat::player_down(&self.state.world) {
            self.phase = GamePhase::GameOver;
            info!("game over on wave {}", self.state.wave);
        }
    }
}

fn player_health(world: &World) -> Option<Health> {
    world
        .query::<(&Player, &Health)>()
        .iter()
        .next()
        .map(|(_, (_, health))| *health)
}
