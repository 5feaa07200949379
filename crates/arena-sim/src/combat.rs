//! Combat resolution: damage formulas, hit tests and hit feedback.
//!
//! Formulas are pure functions. The `strike_*` / `register_*` functions
//! apply outcomes to the world and queue the matching events, particles,
//! shake and slow motion.

use hecs::{Entity, World};
use log::{debug, info};

use arena_ai::profiles::get_profile;
use arena_core::components::{Enemy, Fighter, Health, Player};
use arena_core::constants::*;
use arena_core::enums::{BattleMode, EnemyArchetype, HitKind, ParticleColor};
use arena_core::events::GameEvent;
use arena_core::types::Position;
use arena_core::weapons::WeaponStats;

use crate::scheduler::DeferredKind;
use crate::state::SimState;
use crate::world_setup;

/// Result of applying damage to an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead.
    Ignored,
    Hit { damage: u32, remaining: u32 },
    Killed { damage: u32 },
}

/// A connected player hit, ready for feedback.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    pub slot: u32,
    pub position: Position,
    pub outcome: DamageOutcome,
}

/// Weapon damage before the attack multiplier.
pub fn raw_weapon_damage(weapon: &WeaponStats, wave: u32) -> f64 {
    weapon.damage + wave as f64 * WEAPON_DAMAGE_PER_WAVE
}

/// Final player damage: rounded half away from zero.
pub fn scaled_damage(raw: f64, attack_multiplier: f64) -> u32 {
    (raw * attack_multiplier).round().max(0.0) as u32
}

/// Damage an enemy of `archetype` deals on contact at `wave`. Never below 1.
pub fn incoming_damage(archetype: EnemyArchetype, wave: u32, defense_multiplier: f64) -> u32 {
    let raw = get_profile(archetype).base_damage + wave as f64 * ENEMY_DAMAGE_PER_WAVE;
    ((raw * defense_multiplier).round() as u32).max(1)
}

/// Per-enemy max hp for a wave. The per-wave bonus starts at wave 2.
pub fn enemy_max_hp(archetype: EnemyArchetype, wave: u32, mode: BattleMode) -> u32 {
    let base = get_profile(archetype).base_hp as f64;
    let bonus = if wave >= 2 {
        (wave * ENEMY_HP_PER_WAVE) as f64
    } else {
        0.0
    };
    let scale = match mode {
        BattleMode::Single => 1.0,
        BattleMode::Double => DOUBLE_MODE_HP_SCALE,
    };
    ((base + bonus) * scale).round() as u32
}

/// Apply `raw_damage * attack_multiplier` (rounded) to one enemy.
///
/// Dead enemies ignore damage, so death is reported once. A hit arms the
/// enemy's refractory window; a kill clamps hp to zero.
pub fn apply_damage(
    enemy: &mut Enemy,
    health: &mut Health,
    raw_damage: f64,
    attack_multiplier: f64,
) -> DamageOutcome {
    if !enemy.alive {
        return DamageOutcome::Ignored;
    }
    let damage = scaled_damage(raw_damage, attack_multiplier);
    health.current = health.current.saturating_sub(damage);
    enemy.hit_cooldown = ENEMY_HIT_COOLDOWN;
    if health.current == 0 {
        enemy.alive = false;
        DamageOutcome::Killed { damage }
    } else {
        DamageOutcome::Hit {
            damage,
            remaining: health.current,
        }
    }
}

/// Resolve a melee swing from the player's torso against every living enemy
/// torso within weapon range whose hit cooldown has expired. Hits are
/// returned in slot order.
pub fn resolve_melee(
    world: &mut World,
    weapon: &WeaponStats,
    wave: u32,
    attack_multiplier: f64,
) -> Vec<HitRecord> {
    let Some(range) = weapon.range else {
        return Vec::new();
    };
    let Some(origin) = player_position(world) else {
        return Vec::new();
    };
    let origin = origin.raised(TORSO_HEIGHT);
    let raw = raw_weapon_damage(weapon, wave);

    let mut hits = Vec::new();
    for (_entity, (enemy, health, pos)) in world.query_mut::<(&mut Enemy, &mut Health, &Position)>() {
        if !enemy.alive || enemy.hit_cooldown > 0.0 {
            continue;
        }
        if pos.raised(TORSO_HEIGHT).range_to(&origin) >= range {
            continue;
        }
        let outcome = apply_damage(enemy, health, raw, attack_multiplier);
        hits.push(HitRecord {
            slot: enemy.slot,
            position: *pos,
            outcome,
        });
    }
    hits.sort_by_key(|hit| hit.slot);
    hits
}

/// First living enemy (lowest slot) whose torso lies within the arrow hit
/// radius of `arrow` and whose hit cooldown has expired.
pub fn find_arrow_target(world: &World, arrow: &Position) -> Option<Entity> {
    let mut best: Option<(u32, Entity)> = None;
    for (entity, (enemy, pos)) in world.query::<(&Enemy, &Position)>().iter() {
        if !enemy.alive || enemy.hit_cooldown > 0.0 {
            continue;
        }
        if pos.raised(TORSO_HEIGHT).range_to(arrow) >= ARROW_HIT_RADIUS {
            continue;
        }
        if best.map_or(true, |(slot, _)| enemy.slot < slot) {
            best = Some((enemy.slot, entity));
        }
    }
    best.map(|(_, entity)| entity)
}

/// Apply a frozen arrow damage to `target`.
pub fn strike_with_arrow(state: &mut SimState, target: Entity, damage: u32) -> Option<HitRecord> {
    let (enemy, health, pos) = state
        .world
        .query_one_mut::<(&mut Enemy, &mut Health, &Position)>(target)
        .ok()?;
    let outcome = apply_damage(enemy, health, damage as f64, 1.0);
    Some(HitRecord {
        slot: enemy.slot,
        position: *pos,
        outcome,
    })
}

/// Emit events and effects for connected hits. Every connected hit shakes
/// the camera and bursts gold; a kill adds the death burst and starts the
/// slow-motion pulse. The last kill of a wave schedules the upgrade gate
/// exactly once.
pub fn register_hits(state: &mut SimState, hits: &[HitRecord], kind: HitKind) {
    let mut killed = false;
    for hit in hits {
        let (damage, remaining_hp) = match hit.outcome {
            DamageOutcome::Ignored => continue,
            DamageOutcome::Hit { damage, remaining } => (damage, remaining),
            DamageOutcome::Killed { damage } => (damage, 0),
        };
        let burst_origin = hit.position.raised(BURST_HEIGHT);
        let (shake, burst) = match kind {
            HitKind::Melee => (MELEE_HIT_SHAKE, MELEE_HIT_BURST),
            HitKind::Ranged => (RANGED_HIT_SHAKE, RANGED_HIT_BURST),
        };
        state.pulses.shake.trigger(shake);
        world_setup::spawn_burst(
            &mut state.world,
            &mut state.rng,
            &mut state.particle_serial,
            burst_origin,
            ParticleColor::Gold,
            burst,
        );
        state.events.push(match kind {
            HitKind::Melee => GameEvent::MeleeHit {
                slot: hit.slot,
                damage,
                remaining_hp,
            },
            HitKind::Ranged => GameEvent::RangedHit {
                slot: hit.slot,
                damage,
                remaining_hp,
            },
        });

        if remaining_hp > 0 {
            continue;
        }
        killed = true;
        debug!("enemy {} killed by {damage} ({kind:?})", hit.slot);
        world_setup::spawn_burst(
            &mut state.world,
            &mut state.rng,
            &mut state.particle_serial,
            burst_origin,
            ParticleColor::Ember,
            DEATH_BURST,
        );
        state.events.push(GameEvent::EnemyDeath {
            slot: hit.slot,
            wave: state.wave,
        });
        let pulse = state.pulses.dilation.begin_slow_motion();
        state.scheduler.schedule(
            state.time.wall_secs,
            SLOW_MO_DURATION_SECS,
            DeferredKind::SlowMotionRebound { pulse },
        );
    }

    if killed && !state.wave_cleared && all_enemies_down(&state.world) {
        state.wave_cleared = true;
        info!("wave {} cleared", state.wave);
        state.scheduler.schedule(
            state.time.wall_secs,
            UPGRADE_GATE_DELAY_SECS,
            DeferredKind::UpgradeGate { wave: state.wave },
        );
    }
}

/// A charging enemy made contact. Gated by the player's hit cooldown.
/// Returns whether damage was dealt.
pub fn strike_player(state: &mut SimState, archetype: EnemyArchetype) -> bool {
    let defense = state.upgrades.defense_multiplier();
    let damage = incoming_damage(archetype, state.wave, defense);

    let mut struck = None;
    for (_entity, (_player, fighter, health, pos)) in state
        .world
        .query_mut::<(&Player, &mut Fighter, &mut Health, &Position)>()
    {
        if fighter.hit_cooldown > 0.0 || health.current == 0 {
            continue;
        }
        fighter.hit_cooldown = PLAYER_HIT_COOLDOWN;
        health.current = health.current.saturating_sub(damage);
        struck = Some((health.current, *pos));
    }
    let Some((remaining_hp, pos)) = struck else {
        return false;
    };

    state.pulses.shake.trigger(PLAYER_HIT_SHAKE);
    world_setup::spawn_burst(
        &mut state.world,
        &mut state.rng,
        &mut state.particle_serial,
        pos.raised(BURST_HEIGHT),
        ParticleColor::Red,
        PLAYER_HIT_BURST,
    );
    state.events.push(GameEvent::PlayerHit {
        damage,
        remaining_hp,
    });
    if remaining_hp == 0 {
        info!("player defeated on wave {}", state.wave);
        state.events.push(GameEvent::PlayerDeath { wave: state.wave });
    }
    true
}

/// True once the player's health has reached zero.
pub fn player_down(world: &World) -> bool {
    world
        .query::<(&Player, &Health)>()
        .iter()
        .any(|(_, (_, health))| health.current == 0)
}

/// True when no enemy is alive.
pub fn all_enemies_down(world: &World) -> bool {
    world.query::<&Enemy>().iter().all(|(_, enemy)| !enemy.alive)
}

pub fn player_position(world: &World) -> Option<Position> {
    world
        .query::<(&Player, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| *pos)
}
