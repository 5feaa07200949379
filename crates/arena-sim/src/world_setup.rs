//! Entity spawn factories.
//!
//! Creates the player, enemies, arrows and particle bursts with their
//! component bundles.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::*;
use arena_core::types::{Position, Velocity};

/// Spawn the player at the start position with full health.
pub fn spawn_player(world: &mut World, max_hp: u32) -> Entity {
    world.spawn((
        Player,
        Position::new(PLAYER_SPAWN_X, GROUND_Y, 0.0),
        Fighter {
            vertical_velocity: 0.0,
            facing: PLAYER_SPAWN_FACING,
            attacking: false,
            attack_timer: 0.0,
            attack_cooldown: 0.0,
            hit_cooldown: 0.0,
            weapon: WeaponKind::default(),
            attack_latch: false,
            switch_latch: false,
        },
        Health {
            current: max_hp,
            max: max_hp,
        },
    ))
}

/// Spawn one enemy in `Approach` at `position`, facing the arena center.
pub fn spawn_enemy(
    world: &mut World,
    slot: u32,
    archetype: EnemyArchetype,
    position: Position,
    max_hp: u32,
) -> Entity {
    let facing = position.facing_to(&Position::default());
    world.spawn((
        Enemy {
            slot,
            archetype,
            facing,
            hit_cooldown: 0.0,
            alive: true,
        },
        EnemyBrain {
            state: EnemyState::Approach,
            state_timer: 0.0,
            charge_dir: None,
        },
        position,
        Health {
            current: max_hp,
            max: max_hp,
        },
    ))
}

/// Spawn an arrow. `damage` is frozen for the arrow's whole flight.
pub fn spawn_projectile(
    world: &mut World,
    position: Position,
    velocity: Velocity,
    damage: u32,
) -> Entity {
    world.spawn((
        Projectile {
            lifetime_secs: ARROW_LIFETIME_SECS,
            damage,
        },
        position,
        velocity,
    ))
}

/// Spawn `count` particles at `origin` with randomized spread, rise and
/// lifetime. Over-cap particles are retired by the cleanup system.
pub fn spawn_burst(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    next_serial: &mut u64,
    origin: Position,
    color: ParticleColor,
    count: u32,
) {
    for _ in 0..count {
        let velocity = Velocity::new(
            rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
            rng.gen_range(PARTICLE_MIN_RISE..PARTICLE_MAX_RISE),
            rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
        );
        let lifetime_secs = PARTICLE_BASE_LIFETIME + rng.gen_range(0.0..PARTICLE_LIFETIME_JITTER);
        let serial = *next_serial;
        *next_serial += 1;
        world.spawn((
            Particle {
                lifetime_secs,
                color,
                opacity: 1.0,
                serial,
            },
            origin,
            velocity,
        ));
    }
}
