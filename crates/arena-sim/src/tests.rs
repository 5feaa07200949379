//! Tests for the simulation engine, combat resolution, wave progression and
//! deferred events.

use hecs::World;
use proptest::prelude::*;

use arena_core::commands::{FrameInput, InputSnapshot, PlayerCommand};
use arena_core::components::*;
use arena_core::config::SessionConfig;
use arena_core::constants::*;
use arena_core::enums::*;
use arena_core::events::GameEvent;
use arena_core::state::GameStateSnapshot;
use arena_core::types::{Position, Velocity};
use arena_progression::UpgradeLevels;

use crate::combat::{self, DamageOutcome};
use crate::engine::{SimConfig, SimulationEngine};
use crate::pulses::{CameraShake, TimeDilation};
use crate::scheduler::{DeferredKind, Scheduler};
use crate::state::SimState;
use crate::systems::{cleanup, projectiles};
use crate::world_setup;

const DT: f64 = 1.0 / 60.0;

// ---- Helpers ----

fn started(session: SessionConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 99,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartGame { session });
    engine.tick(&FrameInput::idle(DT));
    engine
}

fn single() -> SessionConfig {
    SessionConfig::default()
}

fn double() -> SessionConfig {
    SessionConfig {
        battle_mode: BattleMode::Double,
        ..Default::default()
    }
}

fn press(input: InputSnapshot) -> FrameInput {
    FrameInput::new(DT, input)
}

fn attack() -> FrameInput {
    press(InputSnapshot {
        attack: true,
        ..Default::default()
    })
}

/// Run idle frames and collect every event they produced.
fn run_idle(engine: &mut SimulationEngine, frames: usize) -> (GameStateSnapshot, Vec<GameEvent>) {
    let mut events = Vec::new();
    let mut snap = GameStateSnapshot::default();
    for _ in 0..frames {
        snap = engine.tick(&FrameInput::idle(DT));
        events.extend(snap.events.iter().cloned());
    }
    (snap, events)
}

fn place_enemy(engine: &mut SimulationEngine, slot: u32, position: Position) {
    for (_e, (enemy, pos)) in engine
        .state_mut()
        .world
        .query_mut::<(&Enemy, &mut Position)>()
    {
        if enemy.slot == slot {
            *pos = position;
        }
    }
}

fn set_enemy_hp(engine: &mut SimulationEngine, slot: u32, hp: u32) {
    for (_e, (enemy, health)) in engine
        .state_mut()
        .world
        .query_mut::<(&Enemy, &mut Health)>()
    {
        if enemy.slot == slot {
            health.current = hp;
        }
    }
}

fn enemy_health(engine: &SimulationEngine, slot: u32) -> Health {
    let mut query = engine.world().query::<(&Enemy, &Health)>();
    query
        .iter()
        .find(|(_, (enemy, _))| enemy.slot == slot)
        .map(|(_, (_, health))| *health)
        .expect("enemy slot exists")
}

fn player_health(engine: &SimulationEngine) -> Health {
    let mut query = engine.world().query::<(&Player, &Health)>();
    query
        .iter()
        .next()
        .map(|(_, (_, health))| *health)
        .expect("player exists")
}

fn player_position(engine: &SimulationEngine) -> Position {
    combat::player_position(engine.world()).expect("player exists")
}

/// Put enemy `slot` mid-charge at `position`, heading for the player.
fn start_charge(engine: &mut SimulationEngine, slot: u32, position: Position) {
    let player = player_position(engine);
    let heading = position.facing_to(&player);
    for (_e, (enemy, brain, pos)) in engine
        .state_mut()
        .world
        .query_mut::<(&mut Enemy, &mut EnemyBrain, &mut Position)>()
    {
        if enemy.slot == slot {
            enemy.facing = heading;
            brain.state = EnemyState::Charge;
            brain.state_timer = CHARGE_SECS;
            brain.charge_dir = Some(heading);
            *pos = position;
        }
    }
}

fn count_gate_events(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::UpgradeGate { .. }))
        .count()
}

/// Cycle sword -> spear -> bow, releasing the switch between presses.
fn equip_bow(engine: &mut SimulationEngine) {
    let switch = press(InputSnapshot {
        weapon_switch: true,
        ..Default::default()
    });
    for _ in 0..2 {
        engine.tick(&switch);
        engine.tick(&FrameInput::idle(DT));
    }
}

fn set_player_hp(engine: &mut SimulationEngine, hp: u32) {
    for (_e, (_p, health)) in engine
        .state_mut()
        .world
        .query_mut::<(&Player, &mut Health)>()
    {
        health.current = hp;
    }
}

/// Kill enemy `slot` with one sword swing from point blank.
fn kill_with_sword(engine: &mut SimulationEngine, slot: u32) -> GameStateSnapshot {
    let player = player_position(engine);
    place_enemy(engine, slot, Position::new(player.x + 1.5, 0.0, player.z));
    set_enemy_hp(engine, slot, 1);
    engine.tick(&attack())
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let run = |seed: u64| {
        let mut engine = SimulationEngine::new(SimConfig {
            seed,
            ..Default::default()
        });
        engine.queue_command(PlayerCommand::StartGame { session: double() });
        let mut out = Vec::new();
        for i in 0..300 {
            let input = InputSnapshot {
                move_x: (i as f64 * 0.05).sin(),
                move_z: (i as f64 * 0.03).cos(),
                attack: i % 20 < 3,
                weapon_switch: i % 90 == 0,
                ..Default::default()
            };
            let snap = engine.tick(&press(input));
            out.push(serde_json::to_string(&snap).unwrap());
        }
        out
    };
    assert_eq!(run(12345), run(12345), "Snapshots diverged with same seed");
}

#[test]
fn test_determinism_different_seeds() {
    let a = started(single());
    let mut b = SimulationEngine::new(SimConfig {
        seed: 1,
        ..Default::default()
    });
    b.queue_command(PlayerCommand::StartGame { session: single() });
    b.tick(&FrameInput::idle(DT));
    let pos_a = a.world().query::<(&Enemy, &Position)>().iter().next().map(|(_, (_, p))| *p);
    let pos_b = b.world().query::<(&Enemy, &Position)>().iter().next().map(|(_, (_, p))| *p);
    assert_ne!(pos_a, pos_b, "spawn angle should depend on the seed");
}

// ---- Phases and commands ----

#[test]
fn test_menu_does_not_advance() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick(&FrameInput::idle(DT));
    assert_eq!(snap.phase, GamePhase::MainMenu);
    assert_eq!(snap.time.tick, 0);
    assert!(snap.enemies.is_empty());
}

#[test]
fn test_start_game_spawns_wave_one() {
    let engine = started(single());
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.wave(), 1);
    assert_eq!(enemy_health(&engine, 0).max, 80);
    assert_eq!(player_health(&engine).current, PLAYER_BASE_HP);
    let count = engine.world().query::<&Enemy>().iter().count();
    assert_eq!(count, 1);

    let engine = started(double());
    let count = engine.world().query::<&Enemy>().iter().count();
    assert_eq!(count, 2);
    assert_eq!(enemy_health(&engine, 0).max, 56);
    assert_eq!(enemy_health(&engine, 1).max, 56);
}

#[test]
fn test_double_mode_spawns_opposite_sides() {
    let engine = started(double());
    let mut query = engine.world().query::<(&Enemy, &Position)>();
    let positions: Vec<Position> = query.iter().map(|(_, (_, p))| *p).collect();
    let a = positions[0].horizontal();
    let b = positions[1].horizontal();
    assert!((a + b).length() < 1.0, "enemies should start roughly opposite: {a} {b}");
}

#[test]
fn test_pause_freezes_everything() {
    let mut engine = started(single());
    engine.tick(&FrameInput::idle(DT));
    engine.queue_command(PlayerCommand::Pause);
    let paused = engine.tick(&FrameInput::idle(DT));
    assert_eq!(paused.phase, GamePhase::Paused);
    let frozen = engine.time();

    run_idle(&mut engine, 30);
    assert_eq!(engine.time().tick, frozen.tick);
    assert_eq!(engine.time().wall_secs, frozen.wall_secs);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick(&FrameInput::idle(DT));
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.time().tick, frozen.tick + 1);
}

#[test]
fn test_choose_upgrade_ignored_outside_gate() {
    let mut engine = started(single());
    engine.queue_command(PlayerCommand::ChooseUpgrade {
        kind: UpgradeKind::Attack,
    });
    engine.tick(&FrameInput::idle(DT));
    assert_eq!(engine.upgrades(), UpgradeLevels::default());
    assert_eq!(engine.wave(), 1);
}

#[test]
fn test_return_to_menu_clears_world() {
    let mut engine = started(single());
    engine.queue_command(PlayerCommand::ReturnToMenu);
    let snap = engine.tick(&FrameInput::idle(DT));
    assert_eq!(snap.phase, GamePhase::MainMenu);
    assert_eq!(engine.world().len(), 0);
}

// ---- Player ----

#[test]
fn test_player_stays_in_arena() {
    let mut engine = started(single());
    place_enemy(&mut engine, 0, Position::new(0.0, 0.0, -ENEMY_ARENA_RADIUS));
    let right = InputSnapshot {
        move_x: 1.0,
        ..Default::default()
    };
    for _ in 0..300 {
        engine.tick(&press(right));
        assert!(player_position(&engine).radius() <= PLAYER_ARENA_RADIUS + 1e-9);
    }
    assert!(player_position(&engine).x > PLAYER_ARENA_RADIUS - 0.5);
}

#[test]
fn test_movement_follows_camera_yaw() {
    let mut engine = started(single());
    let start = player_position(&engine);
    let forward = InputSnapshot {
        move_z: 1.0,
        camera_yaw: std::f64::consts::FRAC_PI_2,
        ..Default::default()
    };
    let snap = engine.tick(&press(forward));
    let moved = player_position(&engine);
    assert!(moved.x > start.x, "forward at yaw pi/2 should head +x");
    assert!((moved.z - start.z).abs() < 1e-9);
    assert!((snap.player.facing - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn test_jump_and_land() {
    let mut engine = started(single());
    let snap = engine.tick(&press(InputSnapshot {
        jump: true,
        ..Default::default()
    }));
    assert!(snap.player.position.y > 0.0);
    assert!(!snap.player.grounded);

    let (snap, _) = run_idle(&mut engine, 90);
    assert_eq!(snap.player.position.y, GROUND_Y);
    assert!(snap.player.grounded);
}

#[test]
fn test_weapon_switch_needs_release() {
    let mut engine = started(single());
    let held = press(InputSnapshot {
        weapon_switch: true,
        ..Default::default()
    });
    let first = engine.tick(&held);
    assert_eq!(first.player.weapon, WeaponKind::Spear);
    assert!(first
        .events
        .contains(&GameEvent::WeaponSwitch { weapon: WeaponKind::Spear }));
    let second = engine.tick(&held);
    assert_eq!(second.player.weapon, WeaponKind::Spear, "holding must not cycle");

    engine.tick(&FrameInput::idle(DT));
    let third = engine.tick(&held);
    assert_eq!(third.player.weapon, WeaponKind::Bow);
    assert_eq!(third.player.weapon_name, "bow");
}

#[test]
fn test_held_attack_triggers_once() {
    let mut engine = started(single());
    let mut attacks = 0;
    for _ in 0..60 {
        let snap = engine.tick(&attack());
        attacks += snap
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Attack { .. }))
            .count();
    }
    assert_eq!(attacks, 1);
}

// ---- Combat ----

#[test]
fn test_sword_hit_wave_one() {
    let mut engine = started(single());
    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 2.0, 0.0, player.z));

    let snap = engine.tick(&attack());
    assert!(snap.events.contains(&GameEvent::MeleeHit {
        slot: 0,
        damage: 17,
        remaining_hp: 63,
    }));
    assert_eq!(enemy_health(&engine, 0).current, 63);
    assert!(snap.camera.shake_timer > 0.0);
    assert!(snap.enemies[0].flash);
    assert!(snap.particles.iter().any(|p| p.color == ParticleColor::Gold));
}

#[test]
fn test_lethal_sword_hit_is_a_confirmed_hit() {
    let mut engine = started(single());
    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 2.0, 0.0, player.z));
    set_enemy_hp(&mut engine, 0, 10);

    let snap = engine.tick(&attack());
    let hit = snap
        .events
        .iter()
        .position(|e| {
            *e == GameEvent::MeleeHit {
                slot: 0,
                damage: 17,
                remaining_hp: 0,
            }
        })
        .expect("killing blow reports a melee hit");
    let death = snap
        .events
        .iter()
        .position(|e| *e == GameEvent::EnemyDeath { slot: 0, wave: 1 })
        .expect("killing blow reports the death");
    assert!(hit < death);
    assert!(snap.camera.shake_timer > 0.0);
    assert!(snap.particles.iter().any(|p| p.color == ParticleColor::Gold));
    assert!(snap.particles.iter().any(|p| p.color == ParticleColor::Ember));
}

#[test]
fn test_sword_out_of_range_misses() {
    let mut engine = started(single());
    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 3.5, 0.0, player.z));
    let snap = engine.tick(&attack());
    assert!(snap.events.contains(&GameEvent::Attack {
        weapon: WeaponKind::Sword
    }));
    assert_eq!(enemy_health(&engine, 0).current, 80);
}

#[test]
fn test_melee_respects_enemy_hit_cooldown() {
    let mut world = World::new();
    world_setup::spawn_player(&mut world, PLAYER_BASE_HP);
    world_setup::spawn_enemy(
        &mut world,
        0,
        EnemyArchetype::Beast,
        Position::new(PLAYER_SPAWN_X + 1.0, 0.0, 0.0),
        80,
    );
    let sword = WeaponKind::Sword.stats();
    let first = combat::resolve_melee(&mut world, sword, 1, 1.0);
    assert_eq!(first.len(), 1);
    let second = combat::resolve_melee(&mut world, sword, 1, 1.0);
    assert!(second.is_empty(), "second swing inside the cooldown must not land");
}

#[test]
fn test_charge_contact_wave_three() {
    let mut engine = started(single());
    engine.state_mut().wave = 3;
    let player = player_position(&engine);
    start_charge(&mut engine, 0, Position::new(player.x + 1.0, 0.0, player.z));

    let snap = engine.tick(&FrameInput::idle(DT));
    assert!(snap.events.contains(&GameEvent::PlayerHit {
        damage: 13,
        remaining_hp: 87,
    }));
    assert!(snap.player.flash);

    // Refractory window blocks further contact damage.
    run_idle(&mut engine, 20);
    assert_eq!(player_health(&engine).current, 87);
}

#[test]
fn test_two_chargers_hit_once_per_window() {
    let mut engine = started(double());
    let player = player_position(&engine);
    start_charge(&mut engine, 0, Position::new(player.x + 1.0, 0.0, player.z));
    start_charge(&mut engine, 1, Position::new(player.x - 1.0, 0.0, player.z));
    let snap = engine.tick(&FrameInput::idle(DT));
    let hits = snap
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn test_player_death_ends_run() {
    let mut engine = started(single());
    set_player_hp(&mut engine, 5);
    let player = player_position(&engine);
    start_charge(&mut engine, 0, Position::new(player.x + 1.0, 0.0, player.z));

    let snap = engine.tick(&FrameInput::idle(DT));
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.events.contains(&GameEvent::PlayerHit {
        damage: 10,
        remaining_hp: 0,
    }));
    assert!(snap.events.contains(&GameEvent::PlayerDeath { wave: 1 }));

    engine.queue_command(PlayerCommand::Pause);
    engine.tick(&FrameInput::idle(DT));
    assert_eq!(engine.phase(), GamePhase::GameOver);

    engine.queue_command(PlayerCommand::Restart);
    engine.tick(&FrameInput::idle(DT));
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(player_health(&engine).current, PLAYER_BASE_HP);
    assert_eq!(engine.wave(), 1);
}

#[test]
fn test_player_death_halts_the_tick() {
    let mut engine = started(double());
    set_player_hp(&mut engine, 5);
    let player = player_position(&engine);
    start_charge(&mut engine, 0, Position::new(player.x + 1.0, 0.0, player.z));

    let far = Position::new(0.0, 0.0, -ENEMY_ARENA_RADIUS);
    place_enemy(&mut engine, 1, far);
    set_enemy_hp(&mut engine, 1, 1);
    world_setup::spawn_projectile(
        &mut engine.state_mut().world,
        far.raised(TORSO_HEIGHT),
        Velocity::new(0.0, 0.0, 0.0),
        14,
    );

    let snap = engine.tick(&FrameInput::idle(DT));
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.events.contains(&GameEvent::PlayerDeath { wave: 1 }));
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyDeath { .. } | GameEvent::RangedHit { .. })));
    assert_eq!(enemy_health(&engine, 1).current, 1);
    assert_eq!(snap.projectiles.len(), 1);
    let mut query = engine.world().query::<(&Enemy, &Position)>();
    let second = query
        .iter()
        .find(|(_, (enemy, _))| enemy.slot == 1)
        .map(|(_, (_, pos))| *pos);
    assert_eq!(second, Some(far), "second enemy does not move after the player falls");
}

#[test]
fn test_arrow_hits_enemy() {
    let mut engine = started(single());
    equip_bow(&mut engine);

    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 6.0, 0.0, player.z));
    let snap = engine.tick(&attack());
    assert_eq!(snap.player.weapon, WeaponKind::Bow);
    assert_eq!(snap.projectiles.len(), 1);
    assert!((snap.projectiles[0].heading - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

    let (snap, events) = run_idle(&mut engine, 60);
    assert!(events.contains(&GameEvent::RangedHit {
        slot: 0,
        damage: 14,
        remaining_hp: 66,
    }));
    assert!(snap.projectiles.is_empty(), "arrow is absorbed by the hit");
}

#[test]
fn test_arrow_damage_frozen_at_launch() {
    let mut engine = started(single());
    equip_bow(&mut engine);
    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 6.0, 0.0, player.z));
    let snap = engine.tick(&attack());
    assert_eq!(snap.projectiles.len(), 1);

    // Wave and attack level change while the arrow is in flight.
    {
        let state = engine.state_mut();
        state.wave = 5;
        state.upgrades.increment(UpgradeKind::Attack);
    }
    let (_, events) = run_idle(&mut engine, 60);
    assert!(events.contains(&GameEvent::RangedHit {
        slot: 0,
        damage: 14,
        remaining_hp: 66,
    }));
}

#[test]
fn test_arrows_respect_enemy_hit_cooldown() {
    let mut state = SimState::new(5);
    world_setup::spawn_player(&mut state.world, PLAYER_BASE_HP);
    let at = Position::new(4.0, 0.0, 0.0);
    world_setup::spawn_enemy(&mut state.world, 0, EnemyArchetype::Beast, at, 80);
    let torso = at.raised(TORSO_HEIGHT);
    let still = Velocity::new(0.0, 0.0, 0.0);
    world_setup::spawn_projectile(&mut state.world, torso, still, 14);
    world_setup::spawn_projectile(&mut state.world, torso, still, 14);

    projectiles::run(&mut state, DT);
    let ranged_hits = |events: &[GameEvent]| {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::RangedHit { .. }))
            .count()
    };
    let enemy_hp = |world: &World| {
        world
            .query::<(&Enemy, &Health)>()
            .iter()
            .map(|(_, (_, health))| health.current)
            .next()
    };
    let flying = |world: &World| {
        world
            .query::<&Projectile>()
            .iter()
            .filter(|(_, p)| p.lifetime_secs > 0.0)
            .count()
    };
    assert_eq!(ranged_hits(&state.events), 1, "second arrow lands inside the window");
    assert_eq!(enemy_hp(&state.world), Some(66));
    assert_eq!(flying(&state.world), 1, "blocked arrow keeps flying");

    for (_e, enemy) in state.world.query_mut::<&mut Enemy>() {
        enemy.hit_cooldown = 0.0;
    }
    projectiles::run(&mut state, DT);
    assert_eq!(ranged_hits(&state.events), 2);
    assert_eq!(enemy_hp(&state.world), Some(52));
    assert_eq!(flying(&state.world), 0);
}

#[test]
fn test_arrow_retired_out_of_bounds() {
    let mut engine = started(single());
    place_enemy(&mut engine, 0, Position::new(0.0, 0.0, -ENEMY_ARENA_RADIUS));
    {
        let state = engine.state_mut();
        world_setup::spawn_projectile(
            &mut state.world,
            Position::new(PROJECTILE_BOUNDS_RADIUS - 0.1, 1.5, 0.0),
            Velocity::new(ARROW_SPEED, 0.0, 0.0),
            14,
        );
    }
    let snap = engine.tick(&FrameInput::idle(DT));
    assert!(snap.projectiles.is_empty());
}

#[test]
fn test_damage_formulas() {
    let sword = WeaponKind::Sword.stats();
    assert_eq!(combat::scaled_damage(combat::raw_weapon_damage(sword, 1), 1.0), 17);
    assert_eq!(combat::incoming_damage(EnemyArchetype::Beast, 3, 1.0), 13);
    assert_eq!(combat::incoming_damage(EnemyArchetype::Beast, 1, 1.0), 10);
    assert_eq!(combat::incoming_damage(EnemyArchetype::Beast, 0, 0.1), 1);
    assert_eq!(combat::enemy_max_hp(EnemyArchetype::Beast, 1, BattleMode::Single), 80);
    assert_eq!(combat::enemy_max_hp(EnemyArchetype::Beast, 2, BattleMode::Single), 116);
    assert_eq!(combat::enemy_max_hp(EnemyArchetype::Beast, 2, BattleMode::Double), 81);
}

#[test]
fn test_dead_enemy_ignores_damage() {
    let mut enemy = Enemy {
        slot: 0,
        archetype: EnemyArchetype::Beast,
        facing: 0.0,
        hit_cooldown: 0.0,
        alive: true,
    };
    let mut health = Health { current: 5, max: 80 };
    assert_eq!(
        combat::apply_damage(&mut enemy, &mut health, 17.0, 1.0),
        DamageOutcome::Killed { damage: 17 }
    );
    assert_eq!(health.current, 0);
    assert!(!enemy.alive);
    assert_eq!(
        combat::apply_damage(&mut enemy, &mut health, 17.0, 1.0),
        DamageOutcome::Ignored
    );
}

// ---- Kills, slow motion, upgrade gate ----

#[test]
fn test_kill_triggers_slow_motion_and_gate() {
    let mut engine = started(single());
    let snap = kill_with_sword(&mut engine, 0);
    assert!(snap.events.contains(&GameEvent::EnemyDeath { slot: 0, wave: 1 }));
    assert!((snap.time_scale - SLOW_MO_SCALE).abs() < 1e-12);
    assert!(snap.particles.iter().any(|p| p.color == ParticleColor::Ember));
    assert_eq!(snap.target_enemy, None);

    let (snap, events) = run_idle(&mut engine, 45);
    assert_eq!(snap.time_scale, 1.0);
    assert_eq!(snap.phase, GamePhase::UpgradeSelect);
    assert_eq!(count_gate_events(&events), 1);
    let offers = snap.upgrade_offers.expect("offers shown at the gate");
    assert_eq!(offers.len(), UpgradeKind::ALL.len());
    let deaths = events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyDeath { .. }))
        .count();
    assert_eq!(deaths, 0, "death is reported exactly once");
}

#[test]
fn test_slow_motion_uses_wall_clock() {
    let mut engine = started(single());
    kill_with_sword(&mut engine, 0);
    let sim_before = engine.time().elapsed_secs;
    run_idle(&mut engine, 30);
    // Half a wall second under slow motion advances the sim by a fifth of it.
    let advanced = engine.time().elapsed_secs - sim_before;
    assert!((advanced - 30.0 * DT * SLOW_MO_SCALE).abs() < 1e-9, "advanced {advanced}");
    assert_eq!(engine.time_scale(), SLOW_MO_SCALE);
}

#[test]
fn test_choose_upgrade_starts_next_wave() {
    let mut engine = started(single());
    kill_with_sword(&mut engine, 0);
    run_idle(&mut engine, 45);
    assert_eq!(engine.phase(), GamePhase::UpgradeSelect);

    engine.queue_command(PlayerCommand::ChooseUpgrade {
        kind: UpgradeKind::Hp,
    });
    let snap = engine.tick(&FrameInput::idle(DT));
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.wave, 2);
    assert!(snap.upgrade_offers.is_none());
    assert!(snap.events.contains(&GameEvent::UpgradeApplied {
        kind: UpgradeKind::Hp,
        level: 1,
    }));
    assert!(snap.events.contains(&GameEvent::WaveStart {
        wave: 2,
        enemy_max_hp: 116,
    }));
    assert_eq!(snap.upgrades.hp, 1);
    assert_eq!(player_health(&engine), Health { current: 125, max: 125 });
    assert!(enemy_health(&engine, 0).current == 116);
    assert!(snap.enemies[0].alive);
}

#[test]
fn test_wave_heal_caps_at_max() {
    let mut engine = started(single());
    set_player_hp(&mut engine, 40);
    kill_with_sword(&mut engine, 0);
    run_idle(&mut engine, 45);
    engine.queue_command(PlayerCommand::ChooseUpgrade {
        kind: UpgradeKind::Attack,
    });
    engine.tick(&FrameInput::idle(DT));
    assert_eq!(player_health(&engine).current, 65);
    assert!((engine.upgrades().attack_multiplier() - 1.15).abs() < 1e-12);
}

#[test]
fn test_gate_requested_once_in_double() {
    let mut engine = started(double());
    place_enemy(&mut engine, 1, Position::new(0.0, 0.0, ENEMY_ARENA_RADIUS));
    kill_with_sword(&mut engine, 0);

    let (_, events) = run_idle(&mut engine, 60);
    assert_eq!(count_gate_events(&events), 0, "one enemy still alive");
    assert_eq!(engine.phase(), GamePhase::Active);

    let position = player_position(&engine);
    place_enemy(&mut engine, 1, Position::new(position.x + 1.5, 0.0, position.z));
    set_enemy_hp(&mut engine, 1, 1);
    let snap = engine.tick(&attack());
    assert!(snap.events.contains(&GameEvent::EnemyDeath { slot: 1, wave: 1 }));

    let (_, events) = run_idle(&mut engine, 120);
    assert_eq!(count_gate_events(&events), 1);
}

#[test]
fn test_simultaneous_kills_schedule_one_gate() {
    let mut engine = started(double());
    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 1.5, 0.0, player.z + 0.5));
    place_enemy(&mut engine, 1, Position::new(player.x + 1.5, 0.0, player.z - 0.5));
    set_enemy_hp(&mut engine, 0, 1);
    set_enemy_hp(&mut engine, 1, 1);
    let snap = engine.tick(&attack());
    let deaths = snap
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyDeath { .. }))
        .count();
    assert_eq!(deaths, 2);

    let (_, events) = run_idle(&mut engine, 60);
    assert_eq!(count_gate_events(&events), 1);
}

#[test]
fn test_gate_disabled_advances_directly() {
    let mut engine = started(SessionConfig {
        upgrade_gate: false,
        ..Default::default()
    });
    kill_with_sword(&mut engine, 0);
    let (snap, events) = run_idle(&mut engine, 45);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.wave, 2);
    assert_eq!(count_gate_events(&events), 0);
    assert!(events.contains(&GameEvent::WaveStart {
        wave: 2,
        enemy_max_hp: 116,
    }));
}

#[test]
fn test_restart_drops_stale_deferred_events() {
    let mut engine = started(single());
    kill_with_sword(&mut engine, 0);
    assert_eq!(engine.time_scale(), SLOW_MO_SCALE);

    engine.queue_command(PlayerCommand::Restart);
    let (snap, events) = run_idle(&mut engine, 90);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.wave, 1);
    assert_eq!(snap.time_scale, 1.0);
    assert_eq!(count_gate_events(&events), 0);
    assert!(enemy_health(&engine, 0).current > 0);
}

#[test]
fn test_gate_waits_while_paused() {
    let mut engine = started(single());
    kill_with_sword(&mut engine, 0);
    engine.queue_command(PlayerCommand::Pause);
    run_idle(&mut engine, 120);
    assert_eq!(engine.phase(), GamePhase::Paused);

    engine.queue_command(PlayerCommand::Resume);
    let (snap, _) = run_idle(&mut engine, 45);
    assert_eq!(snap.phase, GamePhase::UpgradeSelect);
}

// ---- Snapshot ----

#[test]
fn test_camera_focus_tracks_target() {
    let mut engine = started(single());
    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 8.0, 0.0, player.z + 2.0));
    let snap = engine.tick(&FrameInput::idle(DT));
    assert_eq!(snap.target_enemy, Some(0));
    let enemy = &snap.enemies[0];
    let expected_x = (snap.player.position.x + enemy.position.x) / 2.0 * CAMERA_FOCUS_SCALE;
    let expected_z = (snap.player.position.z + enemy.position.z) / 2.0 * CAMERA_FOCUS_SCALE;
    assert!((snap.camera.focus.x - expected_x).abs() < 1e-12);
    assert!((snap.camera.focus.z - expected_z).abs() < 1e-12);
    assert_eq!(snap.camera.focus.y, CAMERA_FOCUS_HEIGHT);
}

#[test]
fn test_target_is_nearest_living_enemy() {
    let mut engine = started(double());
    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 9.0, 0.0, player.z));
    place_enemy(&mut engine, 1, Position::new(player.x, 0.0, player.z + 7.0));
    let snap = engine.tick(&FrameInput::idle(DT));
    assert_eq!(snap.target_enemy, Some(1));
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = started(double());
    let snap = engine.tick(&attack());
    let json = serde_json::to_string(&snap).unwrap();
    let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.enemies.len(), 2);
    assert_eq!(back.phase, GamePhase::Active);
}

// ---- Particles ----

#[test]
fn test_particle_cap_retires_oldest() {
    let mut state = SimState::new(3);
    for _ in 0..30 {
        world_setup::spawn_burst(
            &mut state.world,
            &mut state.rng,
            &mut state.particle_serial,
            Position::default(),
            ParticleColor::Gold,
            10,
        );
    }
    cleanup::run(&mut state.world, &mut state.despawn_buffer);
    let serials: Vec<u64> = state
        .world
        .query::<&Particle>()
        .iter()
        .map(|(_, p)| p.serial)
        .collect();
    assert_eq!(serials.len(), MAX_PARTICLES);
    assert_eq!(serials.iter().min().copied(), Some(300 - MAX_PARTICLES as u64));
}

#[test]
fn test_particles_fade_and_expire() {
    let mut engine = started(single());
    let player = player_position(&engine);
    place_enemy(&mut engine, 0, Position::new(player.x + 2.0, 0.0, player.z));
    let snap = engine.tick(&attack());
    assert!(!snap.particles.is_empty());
    assert!(snap.particles.iter().all(|p| p.opacity > 0.0 && p.opacity <= 1.0));

    place_enemy(&mut engine, 0, Position::new(0.0, 0.0, ENEMY_ARENA_RADIUS));
    let (snap, _) = run_idle(&mut engine, 60);
    assert!(snap.particles.is_empty());
}

// ---- Scheduler and pulses ----

#[test]
fn test_scheduler_fires_in_wall_time() {
    let mut scheduler = Scheduler::default();
    scheduler.schedule(1.0, 0.6, DeferredKind::UpgradeGate { wave: 1 });
    assert!(scheduler.drain_due(1.5).is_empty());
    assert_eq!(
        scheduler.drain_due(1.7),
        vec![DeferredKind::UpgradeGate { wave: 1 }]
    );
    assert_eq!(scheduler.pending_len(), 0);
}

#[test]
fn test_scheduler_drops_stale_epoch() {
    let mut scheduler = Scheduler::default();
    scheduler.schedule(0.0, 0.6, DeferredKind::SlowMotionRebound { pulse: 1 });
    scheduler.advance_epoch();
    scheduler.schedule(0.0, 0.6, DeferredKind::UpgradeGate { wave: 1 });
    assert_eq!(scheduler.pending_len(), 2);
    assert_eq!(
        scheduler.drain_due(1.0),
        vec![DeferredKind::UpgradeGate { wave: 1 }]
    );
    assert_eq!(scheduler.pending_len(), 0);
}

#[test]
fn test_slow_motion_last_pulse_wins() {
    let mut dilation = TimeDilation::default();
    let first = dilation.begin_slow_motion();
    let second = dilation.begin_slow_motion();
    assert!(!dilation.end_slow_motion(first), "older pulse must not restore");
    assert_eq!(dilation.scale(), SLOW_MO_SCALE);
    assert!(dilation.end_slow_motion(second));
    assert_eq!(dilation.scale(), 1.0);
}

#[test]
fn test_shake_last_wins_and_decays() {
    let mut shake = CameraShake::default();
    shake.trigger(PLAYER_HIT_SHAKE);
    shake.trigger(RANGED_HIT_SHAKE);
    assert_eq!((shake.timer, shake.intensity), RANGED_HIT_SHAKE);
    shake.decay(1.0);
    assert!(!shake.is_active());
    assert_eq!(shake.intensity, 0.0);
}

// ---- Properties ----

fn any_weapon() -> impl Strategy<Value = WeaponKind> {
    prop_oneof![
        Just(WeaponKind::Sword),
        Just(WeaponKind::Spear),
        Just(WeaponKind::Bow),
    ]
}

fn any_archetype() -> impl Strategy<Value = EnemyArchetype> {
    prop_oneof![Just(EnemyArchetype::Beast), Just(EnemyArchetype::Warrior)]
}

proptest! {
    /// Player damage never drops as waves or attack levels rise.
    #[test]
    fn prop_player_damage_monotonic(weapon in any_weapon(), wave in 1u32..60, level in 0u32..12) {
        let stats = weapon.stats();
        let mut levels = UpgradeLevels::default();
        for _ in 0..level {
            levels.increment(UpgradeKind::Attack);
        }
        let now = combat::scaled_damage(combat::raw_weapon_damage(stats, wave), levels.attack_multiplier());
        let later = combat::scaled_damage(combat::raw_weapon_damage(stats, wave + 1), levels.attack_multiplier());
        levels.increment(UpgradeKind::Attack);
        let stronger = combat::scaled_damage(combat::raw_weapon_damage(stats, wave), levels.attack_multiplier());
        prop_assert!(later >= now);
        prop_assert!(stronger >= now);
    }

    /// Incoming damage is at least 1 and never rises with defense.
    #[test]
    fn prop_incoming_damage_floor(archetype in any_archetype(), wave in 0u32..60, level in 0u32..20) {
        let mut levels = UpgradeLevels::default();
        for _ in 0..level {
            levels.increment(UpgradeKind::Defense);
        }
        let damage = combat::incoming_damage(archetype, wave, levels.defense_multiplier());
        prop_assert!(damage >= 1);
        levels.increment(UpgradeKind::Defense);
        prop_assert!(combat::incoming_damage(archetype, wave, levels.defense_multiplier()) <= damage);
    }

    /// Enemy hp never shrinks from one wave to the next.
    #[test]
    fn prop_enemy_hp_non_decreasing(archetype in any_archetype(), wave in 1u32..60, double in any::<bool>()) {
        let mode = if double { BattleMode::Double } else { BattleMode::Single };
        prop_assert!(
            combat::enemy_max_hp(archetype, wave + 1, mode) >= combat::enemy_max_hp(archetype, wave, mode)
        );
    }

    /// However many hits land, death is reported exactly once when hp runs out.
    #[test]
    fn prop_death_reported_once(
        hp in 1u32..200,
        hits in proptest::collection::vec(0.0f64..60.0, 1..20),
    ) {
        let mut enemy = Enemy {
            slot: 0,
            archetype: EnemyArchetype::Beast,
            facing: 0.0,
            hit_cooldown: 0.0,
            alive: true,
        };
        let mut health = Health { current: hp, max: hp };
        let mut deaths = 0;
        for raw in hits {
            if let DamageOutcome::Killed { .. } = combat::apply_damage(&mut enemy, &mut health, raw, 1.0) {
                deaths += 1;
            }
            prop_assert!(health.current <= health.max);
        }
        prop_assert!(deaths <= 1);
        prop_assert_eq!(deaths == 1, health.current == 0);
        prop_assert_eq!(enemy.alive, health.current > 0);
    }

    /// Random input never pushes the player out of the arena or breaks
    /// the hp bounds.
    #[test]
    fn prop_run_invariants(
        seed in any::<u64>(),
        moves in proptest::collection::vec((-1.0f64..1.0, -1.0f64..1.0, any::<bool>(), any::<bool>()), 30..120),
    ) {
        let mut engine = SimulationEngine::new(SimConfig { seed, session: double() });
        engine.queue_command(PlayerCommand::StartGame { session: double() });
        for (mx, mz, atk, jump) in moves {
            let snap = engine.tick(&press(InputSnapshot {
                move_x: mx,
                move_z: mz,
                attack: atk,
                jump,
                ..Default::default()
            }));
            if snap.phase == GamePhase::MainMenu {
                continue;
            }
            prop_assert!(snap.player.position.radius() <= PLAYER_ARENA_RADIUS + 1e-9);
            prop_assert!(snap.player.hp <= snap.player.max_hp);
            prop_assert!(snap.player.position.y >= GROUND_Y);
            for enemy in &snap.enemies {
                prop_assert!(enemy.position.radius() <= ENEMY_ARENA_RADIUS + 1e-9);
                prop_assert!(enemy.hp <= enemy.max_hp);
            }
            prop_assert!(snap.particles.len() <= MAX_PARTICLES);
        }
    }
}
