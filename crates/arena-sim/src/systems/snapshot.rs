//! Snapshot system: queries the ECS world and builds a complete
//! `GameStateSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use arena_core::components::*;
use arena_core::config::SessionConfig;
use arena_core::constants::*;
use arena_core::enums::GamePhase;
use arena_core::events::GameEvent;
use arena_core::state::*;
use arena_core::types::{Position, Velocity};

use crate::pulses::Pulses;
use crate::state::SimState;

/// Build a complete GameStateSnapshot from the current state.
pub fn build_snapshot(
    state: &SimState,
    phase: GamePhase,
    session: &SessionConfig,
    upgrade_offers: Option<Vec<UpgradeOffer>>,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    let player = build_player(&state.world);
    let enemies = build_enemies(&state.world);
    let target_enemy = nearest_living_enemy(&player.position, &enemies);
    let target_position = target_enemy
        .and_then(|slot| enemies.iter().find(|e| e.slot == slot))
        .map(|e| e.position);

    GameStateSnapshot {
        time: state.time,
        phase,
        session: *session,
        wave: state.wave,
        time_scale: state.pulses.time_scale(),
        camera: build_camera(&player.position, target_position.as_ref(), &state.pulses),
        player,
        enemies,
        target_enemy,
        projectiles: build_projectiles(&state.world),
        particles: build_particles(&state.world),
        upgrades: state.upgrades.view(),
        upgrade_offers,
        events,
    }
}

fn build_player(world: &World) -> PlayerView {
    world
        .query::<(&Player, &Position, &Fighter, &Health)>()
        .iter()
        .next()
        .map(|(_, (_, pos, fighter, health))| PlayerView {
            position: *pos,
            facing: fighter.facing,
            hp: health.current,
            max_hp: health.max,
            hp_fraction: fraction(health),
            attacking: fighter.attacking,
            weapon: fighter.weapon,
            weapon_name: fighter.weapon.stats().name.to_string(),
            flash: fighter.hit_cooldown > PLAYER_FLASH_THRESHOLD,
            grounded: pos.y <= GROUND_Y + GROUNDED_EPSILON,
        })
        .unwrap_or_default()
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &EnemyBrain, &Position, &Health)>()
        .iter()
        .map(|(_, (enemy, brain, pos, health))| EnemyView {
            slot: enemy.slot,
            archetype: enemy.archetype,
            position: *pos,
            facing: enemy.facing,
            state: brain.state,
            hp: health.current,
            max_hp: health.max,
            hp_fraction: fraction(health),
            alive: enemy.alive,
            flash: enemy.hit_cooldown > ENEMY_FLASH_THRESHOLD,
        })
        .collect();
    enemies.sort_by_key(|e| e.slot);
    enemies
}

/// Nearest living enemy on the ground plane. Ties go to the lower slot.
fn nearest_living_enemy(player: &Position, enemies: &[EnemyView]) -> Option<u32> {
    let mut best: Option<(f64, u32)> = None;
    for enemy in enemies.iter().filter(|e| e.alive) {
        let range = player.horizontal_range_to(&enemy.position);
        if best.map_or(true, |(best_range, _)| range < best_range) {
            best = Some((range, enemy.slot));
        }
    }
    best.map(|(_, slot)| slot)
}

/// Camera focus sits on the scaled player/target midpoint, or the scaled
/// player position when nothing is targeted.
fn build_camera(player: &Position, target: Option<&Position>, pulses: &Pulses) -> CameraView {
    let (x, z) = match target {
        Some(t) => ((player.x + t.x) / 2.0, (player.z + t.z) / 2.0),
        None => (player.x, player.z),
    };
    CameraView {
        focus: Position::new(
            x * CAMERA_FOCUS_SCALE,
            CAMERA_FOCUS_HEIGHT,
            z * CAMERA_FOCUS_SCALE,
        ),
        shake_timer: pulses.shake.timer,
        shake_intensity: pulses.shake.intensity,
    }
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Projectile, &Position, &Velocity)>()
        .iter()
        .map(|(_, (_, pos, vel))| ProjectileView {
            position: *pos,
            heading: vel.x.atan2(vel.z),
        })
        .collect()
}

fn build_particles(world: &World) -> Vec<ParticleView> {
    let mut particles: Vec<(u64, ParticleView)> = world
        .query::<(&Particle, &Position)>()
        .iter()
        .map(|(_, (particle, pos))| {
            (
                particle.serial,
                ParticleView {
                    position: *pos,
                    color: particle.color,
                    opacity: particle.opacity,
                },
            )
        })
        .collect();
    particles.sort_by_key(|(serial, _)| *serial);
    particles.into_iter().map(|(_, view)| view).collect()
}

fn fraction(health: &Health) -> f64 {
    if health.max == 0 {
        0.0
    } else {
        health.current as f64 / health.max as f64
    }
}
