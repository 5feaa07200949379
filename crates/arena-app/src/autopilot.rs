//! Scripted input source for headless demo runs.
//!
//! Walks toward the targeted enemy, swings when close, switches to the bow
//! when the target is far, picks upgrades in rotation and restarts after a
//! defeat.

use glam::DVec2;

use arena_core::commands::{InputSnapshot, PlayerCommand};
use arena_core::enums::{GamePhase, UpgradeKind, WeaponKind};
use arena_core::state::GameStateSnapshot;

/// Beyond this distance the autopilot prefers the bow.
const BOW_DISTANCE: f64 = 7.0;

/// Stop walking once this close.
const STANDOFF_DISTANCE: f64 = 1.8;

/// Swing the sword inside this distance.
const SWING_DISTANCE: f64 = 2.5;

#[derive(Debug, Default)]
pub struct Autopilot {
    next_upgrade: usize,
    attack_held: bool,
    switch_held: bool,
    /// Phase already answered with a command, so it's sent once.
    answered: Option<(GamePhase, u32)>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide the next frame's input and any flow commands from the
    /// latest snapshot.
    pub fn drive(&mut self, snapshot: &GameStateSnapshot) -> (InputSnapshot, Vec<PlayerCommand>) {
        let mut commands = Vec::new();
        match snapshot.phase {
            GamePhase::UpgradeSelect => {
                if self.answer_once(snapshot) {
                    let kind = UpgradeKind::ALL[self.next_upgrade % UpgradeKind::ALL.len()];
                    self.next_upgrade += 1;
                    commands.push(PlayerCommand::ChooseUpgrade { kind });
                }
                return (InputSnapshot::default(), commands);
            }
            GamePhase::GameOver => {
                if self.answer_once(snapshot) {
                    commands.push(PlayerCommand::Restart);
                }
                return (InputSnapshot::default(), commands);
            }
            GamePhase::Active => self.answered = None,
            GamePhase::MainMenu | GamePhase::Paused => {
                return (InputSnapshot::default(), commands);
            }
        }

        let Some(target) = snapshot
            .target_enemy
            .and_then(|slot| snapshot.enemies.iter().find(|e| e.slot == slot))
        else {
            self.attack_held = false;
            self.switch_held = false;
            return (InputSnapshot::default(), commands);
        };

        let player = &snapshot.player;
        let offset = target.position.horizontal() - player.position.horizontal();
        let distance = offset.length();
        let desired = if distance > BOW_DISTANCE {
            WeaponKind::Bow
        } else {
            WeaponKind::Sword
        };

        // Walk toward the target; a small step keeps facing on it at standoff.
        let dir = offset.normalize_or_zero();
        let step = if distance > STANDOFF_DISTANCE { 1.0 } else { 0.15 };
        let movement: DVec2 = dir * step;

        let weapon_switch = player.weapon != desired && !self.switch_held;
        self.switch_held = weapon_switch;

        let in_reach = match player.weapon {
            WeaponKind::Bow => true,
            _ => distance < SWING_DISTANCE,
        };
        // Release every other frame so each press is a fresh edge.
        let attack = in_reach && !self.attack_held && !player.attacking;
        self.attack_held = attack;

        let input = InputSnapshot {
            move_x: movement.x,
            move_z: movement.y,
            camera_yaw: 0.0,
            attack,
            jump: false,
            weapon_switch,
        };
        (input, commands)
    }

    fn answer_once(&mut self, snapshot: &GameStateSnapshot) -> bool {
        let key = (snapshot.phase, snapshot.wave);
        if self.answered == Some(key) {
            return false;
        }
        self.answered = Some(key);
        true
    }
}
