//! Enemy AI system: runs the enemy FSM for every living enemy and applies
//! charge contact damage to the player.

use hecs::Entity;
use log::trace;

use arena_ai::fsm::{evaluate, EnemyContext};
use arena_core::components::{Enemy, EnemyBrain};
use arena_core::types::Position;

use crate::combat;
use crate::state::SimState;

/// Run the enemy AI for one tick.
pub fn run(state: &mut SimState, dt: f64) {
    let Some(player_position) = combat::player_position(&state.world) else {
        return;
    };

    // Slot order keeps contact resolution deterministic in 1 vs 2.
    let mut enemies: Vec<(u32, Entity)> = Vec::new();
    for (entity, enemy) in state.world.query_mut::<&mut Enemy>() {
        enemy.hit_cooldown = (enemy.hit_cooldown - dt).max(0.0);
        if enemy.alive {
            enemies.push((enemy.slot, entity));
        }
    }
    enemies.sort_by_key(|(slot, _)| *slot);

    for (slot, entity) in enemies {
        let Ok((enemy, brain, pos)) = state
            .world
            .query_one_mut::<(&mut Enemy, &mut EnemyBrain, &mut Position)>(entity)
        else {
            continue;
        };

        let ctx = EnemyContext {
            archetype: enemy.archetype,
            state: brain.state,
            state_timer: brain.state_timer,
            charge_dir: brain.charge_dir,
            position: *pos,
            facing: enemy.facing,
            player_position,
            wave: state.wave,
            dt,
            wall_secs: state.time.wall_secs,
        };
        let update = evaluate(&ctx, &mut state.rng);

        if update.state_changed {
            trace!("enemy {slot}: {:?} -> {:?}", brain.state, update.new_state);
        }
        brain.state = update.new_state;
        brain.state_timer = update.state_timer;
        brain.charge_dir = update.charge_dir;
        enemy.facing = update.facing;
        *pos = update.position;
        let archetype = enemy.archetype;

        // A defeated player halts the remaining enemies this tick.
        if update.contact
            && combat::strike_player(state, archetype)
            && combat::player_down(&state.world)
        {
            break;
        }
    }
}
