//! Projectile system: arrow flight and hits.

use hecs::Entity;

use arena_core::components::Projectile;
use arena_core::enums::HitKind;
use arena_core::types::{Position, Velocity};

use crate::combat;
use crate::state::SimState;

/// Move every arrow, then test it against living enemies. The first enemy
/// hit absorbs the arrow; spent arrows are removed by the cleanup system.
pub fn run(state: &mut SimState, dt: f64) {
    let mut flying: Vec<(Entity, Position, u32)> = Vec::new();
    for (entity, (projectile, pos, vel)) in
        state
            .world
            .query_mut::<(&mut Projectile, &mut Position, &Velocity)>()
    {
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
        projectile.lifetime_secs -= dt;
        if projectile.lifetime_secs > 0.0 {
            flying.push((entity, *pos, projectile.damage));
        }
    }

    for (entity, pos, damage) in flying {
        let Some(target) = combat::find_arrow_target(&state.world, &pos) else {
            continue;
        };
        if let Some(hit) = combat::strike_with_arrow(state, target, damage) {
            combat::register_hits(state, &[hit], HitKind::Ranged);
        }
        if let Ok(mut projectile) = state.world.get::<&mut Projectile>(entity) {
            projectile.lifetime_secs = 0.0;
        }
    }
}
