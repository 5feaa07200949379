//! Cleanup system: removes spent projectiles and particles.

use hecs::{Entity, World};

use arena_core::components::{Particle, Projectile};
use arena_core::constants::{MAX_PARTICLES, PROJECTILE_BOUNDS_RADIUS};
use arena_core::types::Position;

/// Despawn arrows that expired, hit something or left the bounds, and
/// particles that burned out. Then retire the oldest particles until the
/// live count is back under the cap.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (projectile, pos)) in world.query_mut::<(&Projectile, &Position)>() {
        if projectile.lifetime_secs <= 0.0 || pos.radius() > PROJECTILE_BOUNDS_RADIUS {
            despawn_buffer.push(entity);
        }
    }

    let mut live: Vec<(u64, Entity)> = Vec::new();
    for (entity, particle) in world.query_mut::<&Particle>() {
        if particle.lifetime_secs <= 0.0 {
            despawn_buffer.push(entity);
        } else {
            live.push((particle.serial, entity));
        }
    }
    if live.len() > MAX_PARTICLES {
        live.sort_unstable_by_key(|(serial, _)| *serial);
        let excess = live.len() - MAX_PARTICLES;
        despawn_buffer.extend(live.drain(..excess).map(|(_, entity)| entity));
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
