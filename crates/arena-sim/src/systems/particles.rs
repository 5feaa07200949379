//! Particle system: ballistic motion and fade-out.

use hecs::World;

use arena_core::components::Particle;
use arena_core::constants::{PARTICLE_FADE_SECS, PARTICLE_GRAVITY};
use arena_core::types::{Position, Velocity};

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (particle, pos, vel)) in
        world.query_mut::<(&mut Particle, &mut Position, &mut Velocity)>()
    {
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
        vel.y -= PARTICLE_GRAVITY * dt;
        particle.lifetime_secs -= dt;
        particle.opacity = (particle.lifetime_secs / PARTICLE_FADE_SECS).clamp(0.0, 1.0);
    }
}
