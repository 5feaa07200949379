//! Enemy behavior finite state machine.
//!
//! Pure functions that compute state transitions and movement for one enemy
//! based on its archetype, current state, and the player's position.
//! No ECS dependency; operates on plain data. Randomness (windup length)
//! comes from the caller's RNG so runs stay reproducible per seed.

use glam::DVec2;
use rand::Rng;

use arena_core::constants::*;
use arena_core::enums::{EnemyArchetype, EnemyState};
use arena_core::types::{facing_direction, Position};

use crate::profiles::{get_profile, EnemyBehaviorProfile};

/// Input to the enemy FSM for a single enemy.
#[derive(Debug, Clone)]
pub struct EnemyContext {
    pub archetype: EnemyArchetype,
    pub state: EnemyState,
    pub state_timer: f64,
    pub charge_dir: Option<f64>,
    pub position: Position,
    pub facing: f64,
    pub player_position: Position,
    pub wave: u32,
    /// Simulated seconds for this tick.
    pub dt: f64,
    /// Wall-clock seconds, used only for the cosmetic bob.
    pub wall_secs: f64,
}

/// Output from the enemy FSM.
#[derive(Debug, Clone)]
pub struct EnemyUpdate {
    pub new_state: EnemyState,
    pub state_timer: f64,
    pub charge_dir: Option<f64>,
    /// New position, already clamped to the enemy arena radius.
    pub position: Position,
    pub facing: f64,
    pub state_changed: bool,
    /// Charging and within contact range of the player this tick.
    pub contact: bool,
}

/// Evaluate the FSM for one enemy. Returns its next state and placement.
pub fn evaluate<R: Rng + ?Sized>(ctx: &EnemyContext, rng: &mut R) -> EnemyUpdate {
    let profile = get_profile(ctx.archetype);
    let timer = ctx.state_timer - ctx.dt;

    let mut update = match ctx.state {
        EnemyState::Approach => evaluate_approach(ctx, &profile, rng),
        EnemyState::Windup => evaluate_windup(ctx, timer),
        EnemyState::Charge => evaluate_charge(ctx, &profile, timer),
        EnemyState::Retreat => evaluate_retreat(ctx, &profile, timer),
    };

    update.position.clamp_to_radius(ENEMY_ARENA_RADIUS);
    update
}

/// Charge speed for a wave.
pub fn charge_speed(profile: &EnemyBehaviorProfile, wave: u32) -> f64 {
    profile.charge_speed * (1.0 + wave as f64 * CHARGE_SPEED_PER_WAVE)
}

fn evaluate_approach<R: Rng + ?Sized>(
    ctx: &EnemyContext,
    profile: &EnemyBehaviorProfile,
    rng: &mut R,
) -> EnemyUpdate {
    let distance = ctx.position.horizontal_range_to(&ctx.player_position);
    let facing = ctx.position.facing_to(&ctx.player_position);

    // Never step past the player.
    let step = (profile.move_speed * ctx.dt).min(distance);
    let mut position = step_along(ctx.position, facing, step);
    position.y = GROUND_Y + bob(ctx.wall_secs, 0.25, 0.4);

    if distance < ENGAGEMENT_RANGE {
        return EnemyUpdate {
            new_state: EnemyState::Windup,
            state_timer: rng.gen_range(WINDUP_MIN_SECS..WINDUP_MAX_SECS),
            charge_dir: None,
            position,
            facing,
            state_changed: true,
            contact: false,
        };
    }

    EnemyUpdate {
        new_state: EnemyState::Approach,
        state_timer: 0.0,
        charge_dir: None,
        position,
        facing,
        state_changed: false,
        contact: false,
    }
}

fn evaluate_windup(ctx: &EnemyContext, timer: f64) -> EnemyUpdate {
    let facing = ctx.position.facing_to(&ctx.player_position);

    // Sideways shiver telegraphs the charge.
    let jitter = (ctx.wall_secs / 0.025).sin() * 0.03;
    let mut position = step_along(ctx.position, facing + std::f64::consts::FRAC_PI_2, jitter);
    position.y = GROUND_Y + 0.2;

    if timer <= 0.0 {
        // Direction is frozen here and not re-aimed during the charge.
        return EnemyUpdate {
            new_state: EnemyState::Charge,
            state_timer: CHARGE_SECS,
            charge_dir: Some(facing),
            position,
            facing,
            state_changed: true,
            contact: false,
        };
    }

    EnemyUpdate {
        new_state: EnemyState::Windup,
        state_timer: timer,
        charge_dir: None,
        position,
        facing,
        state_changed: false,
        contact: false,
    }
}

fn evaluate_charge(ctx: &EnemyContext, profile: &EnemyBehaviorProfile, timer: f64) -> EnemyUpdate {
    let heading = ctx.charge_dir.unwrap_or(ctx.facing);
    let mut position = step_along(ctx.position, heading, charge_speed(profile, ctx.wave) * ctx.dt);
    position.y = GROUND_Y + bob(ctx.wall_secs, 0.08, 0.15);

    let contact = position
        .raised(CONTACT_HEIGHT)
        .range_to(&ctx.player_position.raised(CONTACT_HEIGHT))
        < CHARGE_CONTACT_RADIUS;

    if timer <= 0.0 {
        return EnemyUpdate {
            new_state: EnemyState::Retreat,
            state_timer: RETREAT_SECS,
            charge_dir: Some(heading),
            position,
            facing: heading,
            state_changed: true,
            contact,
        };
    }

    EnemyUpdate {
        new_state: EnemyState::Charge,
        state_timer: timer,
        charge_dir: Some(heading),
        position,
        facing: heading,
        state_changed: false,
        contact,
    }
}

fn evaluate_retreat(ctx: &EnemyContext, profile: &EnemyBehaviorProfile, timer: f64) -> EnemyUpdate {
    let heading = ctx.charge_dir.unwrap_or(ctx.facing);
    let speed = profile.move_speed * RETREAT_SPEED_FACTOR;
    let mut position = step_along(ctx.position, heading, -speed * ctx.dt);
    position.y = GROUND_Y + bob(ctx.wall_secs, 0.2, 0.4);
    let facing = ctx.position.facing_to(&ctx.player_position);

    if timer <= 0.0 {
        return EnemyUpdate {
            new_state: EnemyState::Approach,
            state_timer: 0.0,
            charge_dir: None,
            position,
            facing,
            state_changed: true,
            contact: false,
        };
    }

    EnemyUpdate {
        new_state: EnemyState::Retreat,
        state_timer: timer,
        charge_dir: Some(heading),
        position,
        facing,
        state_changed: false,
        contact: false,
    }
}

/// Move `distance` along a facing angle on the ground plane.
fn step_along(position: Position, facing: f64, distance: f64) -> Position {
    let flat: DVec2 = position.horizontal() + facing_direction(facing) * distance;
    Position::new(flat.x, position.y, flat.y)
}

/// Cosmetic hop height: |sin(t / period)| * amplitude.
fn bob(wall_secs: f64, period: f64, amplitude: f64) -> f64 {
    (wall_secs / period).sin().abs() * amplitude
}
