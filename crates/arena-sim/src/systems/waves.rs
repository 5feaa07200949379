//! Wave progression: spawning enemies, advancing waves and applying
//! upgrades chosen at the gate.

use log::info;
use rand::Rng;

use arena_core::components::{Enemy, Health, Player};
use arena_core::config::SessionConfig;
use arena_core::constants::*;
use arena_core::enums::UpgradeKind;
use arena_core::events::GameEvent;
use arena_core::types::Position;

use crate::combat;
use crate::state::SimState;
use crate::world_setup;

/// Replace the current enemies with a fresh set for `state.wave`.
///
/// Enemies appear on the enemy arena circle at a random angle, in 1 vs 2
/// on opposite sides.
pub fn spawn_wave(state: &mut SimState, session: &SessionConfig) {
    let stale: Vec<_> = state
        .world
        .query::<&Enemy>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in stale {
        let _ = state.world.despawn(entity);
    }

    let max_hp = combat::enemy_max_hp(session.archetype, state.wave, session.battle_mode);
    let base_angle = state.rng.gen_range(0.0..std::f64::consts::TAU);
    for slot in 0..session.battle_mode.enemy_count() {
        let angle = base_angle + slot as f64 * std::f64::consts::PI;
        let position = Position::new(
            ENEMY_ARENA_RADIUS * angle.sin(),
            GROUND_Y,
            ENEMY_ARENA_RADIUS * angle.cos(),
        );
        world_setup::spawn_enemy(&mut state.world, slot, session.archetype, position, max_hp);
    }

    state.wave_cleared = false;
    state.events.push(GameEvent::WaveStart {
        wave: state.wave,
        enemy_max_hp: max_hp,
    });
    info!(
        "wave {} started: {} x {:?} ({} hp)",
        state.wave,
        session.battle_mode.enemy_count(),
        session.archetype,
        max_hp
    );
}

/// Move to the next wave: heal the player and respawn the enemies.
pub fn advance_wave(state: &mut SimState, session: &SessionConfig) {
    state.wave += 1;
    heal_player(state, WAVE_HEAL);
    spawn_wave(state, session);
}

/// Record an upgrade. Hp upgrades also raise max hp and heal by the same
/// amount.
pub fn apply_upgrade(state: &mut SimState, kind: UpgradeKind) {
    let level = state.upgrades.increment(kind);
    if kind == UpgradeKind::Hp {
        for (_entity, (_player, health)) in state.world.query_mut::<(&Player, &mut Health)>() {
            health.max += HP_UPGRADE_AMOUNT;
        }
        heal_player(state, HP_UPGRADE_AMOUNT);
    }
    info!("upgrade {kind:?} -> level {level}");
    state.events.push(GameEvent::UpgradeApplied { kind, level });
}

fn heal_player(state: &mut SimState, amount: u32) {
    for (_entity, (_player, health)) in state.world.query_mut::<(&Player, &mut Health)>() {
        health.current = (health.current + amount).min(health.max);
    }
}
