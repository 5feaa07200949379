//! Player system: movement, jumping, weapon switching and attacks.

use glam::DVec2;
use hecs::Entity;

use arena_core::commands::InputSnapshot;
use arena_core::components::{Fighter, Player};
use arena_core::constants::*;
use arena_core::enums::{HitKind, ParticleColor, WeaponKind};
use arena_core::events::GameEvent;
use arena_core::types::{facing_direction, Position, Velocity};

use crate::combat;
use crate::state::SimState;
use crate::world_setup;

/// What the controller decided this tick; acted on once the component
/// borrow is released.
#[derive(Debug, Default)]
struct Actions {
    switched_to: Option<WeaponKind>,
    attack: Option<WeaponKind>,
    position: Position,
    facing: f64,
}

/// Run the player controller for one tick.
pub fn run(state: &mut SimState, dt: f64, input: &InputSnapshot) {
    let Some(entity) = find_player(state) else {
        return;
    };
    let speed = state.upgrades.move_speed();

    let actions = {
        let Ok((pos, fighter)) = state
            .world
            .query_one_mut::<(&mut Position, &mut Fighter)>(entity)
        else {
            return;
        };
        control(pos, fighter, dt, speed, input)
    };

    if let Some(weapon) = actions.switched_to {
        world_setup::spawn_burst(
            &mut state.world,
            &mut state.rng,
            &mut state.particle_serial,
            actions.position.raised(BURST_HEIGHT),
            ParticleColor::Steel,
            SWITCH_BURST,
        );
        state.events.push(GameEvent::WeaponSwitch { weapon });
    }

    if let Some(weapon) = actions.attack {
        trigger_attack(state, weapon, actions.position, actions.facing);
    }
}

/// Apply one frame of input to the player's components.
fn control(
    pos: &mut Position,
    fighter: &mut Fighter,
    dt: f64,
    speed: f64,
    input: &InputSnapshot,
) -> Actions {
    let mut actions = Actions::default();

    // Camera-relative axes, capped to unit length so diagonals aren't faster.
    let axes = DVec2::new(input.move_x, input.move_z).clamp_length_max(1.0);
    let world_dir = rotate_by_yaw(axes, input.camera_yaw);
    pos.x += world_dir.x * speed * dt;
    pos.z += world_dir.y * speed * dt;
    pos.clamp_to_radius(PLAYER_ARENA_RADIUS);
    if axes.length() > FACING_DEADZONE {
        fighter.facing = world_dir.x.atan2(world_dir.y);
    }

    let grounded = pos.y <= GROUND_Y + GROUNDED_EPSILON;
    if input.jump && grounded {
        fighter.vertical_velocity = JUMP_VELOCITY;
    }
    fighter.vertical_velocity -= GRAVITY * dt;
    pos.y += fighter.vertical_velocity * dt;
    if pos.y < GROUND_Y {
        pos.y = GROUND_Y;
        fighter.vertical_velocity = 0.0;
    }

    if input.weapon_switch && !fighter.switch_latch {
        fighter.weapon = fighter.weapon.next();
        actions.switched_to = Some(fighter.weapon);
    }
    fighter.switch_latch = input.weapon_switch;

    fighter.attack_cooldown = (fighter.attack_cooldown - dt).max(0.0);
    if fighter.attacking {
        fighter.attack_timer -= dt;
        if fighter.attack_timer <= 0.0 {
            fighter.attacking = false;
            fighter.attack_timer = 0.0;
        }
    }
    if input.attack && !fighter.attack_latch && !fighter.attacking && fighter.attack_cooldown <= 0.0 {
        fighter.attacking = true;
        fighter.attack_timer = ATTACK_DURATION;
        fighter.attack_cooldown = fighter.weapon.stats().cooldown_secs;
        actions.attack = Some(fighter.weapon);
    }
    fighter.attack_latch = input.attack;

    fighter.hit_cooldown = (fighter.hit_cooldown - dt).max(0.0);

    actions.position = *pos;
    actions.facing = fighter.facing;
    actions
}

/// Rotate camera-relative axes into the world frame. Forward (+z) maps to
/// the camera's facing direction.
fn rotate_by_yaw(axes: DVec2, yaw: f64) -> DVec2 {
    let forward = facing_direction(yaw);
    let right = DVec2::new(forward.y, -forward.x);
    right * axes.x + forward * axes.y
}

fn trigger_attack(state: &mut SimState, weapon: WeaponKind, position: Position, facing: f64) {
    state.events.push(GameEvent::Attack { weapon });
    world_setup::spawn_burst(
        &mut state.world,
        &mut state.rng,
        &mut state.particle_serial,
        position.raised(TORSO_HEIGHT),
        ParticleColor::White,
        SWING_BURST,
    );

    let stats = weapon.stats();
    let attack_multiplier = state.upgrades.attack_multiplier();
    if weapon.is_ranged() {
        let dir = facing_direction(facing);
        let spawn = Position::new(
            position.x + dir.x * ARROW_SPAWN_OFFSET,
            position.y + ARROW_SPAWN_HEIGHT,
            position.z + dir.y * ARROW_SPAWN_OFFSET,
        );
        let velocity = Velocity::new(dir.x * ARROW_SPEED, 0.0, dir.y * ARROW_SPEED);
        let damage = combat::scaled_damage(
            combat::raw_weapon_damage(stats, state.wave),
            attack_multiplier,
        );
        world_setup::spawn_projectile(&mut state.world, spawn, velocity, damage);
    } else {
        let hits = combat::resolve_melee(&mut state.world, stats, state.wave, attack_multiplier);
        combat::register_hits(state, &hits, HitKind::Melee);
    }
}

fn find_player(state: &SimState) -> Option<Entity> {
    state
        .world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(entity, _)| entity)
}
