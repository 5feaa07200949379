//! Simulation constants and tuning parameters.

// --- Frame timing ---

/// Largest simulated step per frame (seconds). Bounds integration error on hitches.
pub const MAX_FRAME_DT: f64 = 0.05;

// --- Arena ---

/// Player horizontal clamp radius.
pub const PLAYER_ARENA_RADIUS: f64 = 12.0;

/// Enemy horizontal clamp radius. Enemies also spawn on this circle.
pub const ENEMY_ARENA_RADIUS: f64 = 14.0;

/// Projectiles further than this from the center are retired.
pub const PROJECTILE_BOUNDS_RADIUS: f64 = 20.0;

/// Ground height.
pub const GROUND_Y: f64 = 0.0;

/// Downward acceleration applied to the player (units/s²).
pub const GRAVITY: f64 = 22.0;

/// Vertical launch velocity of a jump (units/s).
pub const JUMP_VELOCITY: f64 = 9.0;

/// Player counts as grounded within this distance of the ground.
pub const GROUNDED_EPSILON: f64 = 0.05;

// --- Player ---

pub const PLAYER_BASE_HP: u32 = 100;

/// Base movement speed (units/s) before agility upgrades.
pub const PLAYER_BASE_SPEED: f64 = 6.0;

pub const PLAYER_SPAWN_X: f64 = -4.0;

/// Player faces +x at spawn.
pub const PLAYER_SPAWN_FACING: f64 = std::f64::consts::FRAC_PI_2;

/// Refractory window after the player takes a hit (seconds).
pub const PLAYER_HIT_COOLDOWN: f64 = 0.7;

/// Visual duration of an attack swing (seconds).
pub const ATTACK_DURATION: f64 = 0.25;

/// Minimum movement magnitude that turns the player.
pub const FACING_DEADZONE: f64 = 0.1;

/// Torso reference height used for melee range checks.
pub const TORSO_HEIGHT: f64 = 1.2;

/// Player flashes while its hit cooldown is above this.
pub const PLAYER_FLASH_THRESHOLD: f64 = 0.4;

// --- Enemies ---

/// Refractory window after an enemy takes a hit (seconds).
pub const ENEMY_HIT_COOLDOWN: f64 = 0.25;

/// Horizontal distance at which an approaching enemy winds up.
pub const ENGAGEMENT_RANGE: f64 = 5.0;

pub const WINDUP_MIN_SECS: f64 = 0.4;
pub const WINDUP_MAX_SECS: f64 = 0.7;
pub const CHARGE_SECS: f64 = 0.5;
pub const RETREAT_SECS: f64 = 0.8;

/// 3D contact radius for a charging enemy to hit the player.
pub const CHARGE_CONTACT_RADIUS: f64 = 2.0;

/// Reference height for the charge contact test.
pub const CONTACT_HEIGHT: f64 = 1.0;

/// Charge speed grows by this fraction per wave.
pub const CHARGE_SPEED_PER_WAVE: f64 = 0.1;

/// Retreat speed as a fraction of approach speed.
pub const RETREAT_SPEED_FACTOR: f64 = 0.5;

/// Enemy flashes while its hit cooldown is above this.
pub const ENEMY_FLASH_THRESHOLD: f64 = 0.12;

// --- Damage ---

/// Weapon damage gained per wave.
pub const WEAPON_DAMAGE_PER_WAVE: f64 = 2.0;

/// Enemy damage gained per wave.
pub const ENEMY_DAMAGE_PER_WAVE: f64 = 1.5;

// --- Waves ---

/// Enemy hit points gained per wave (applied from wave 2 on).
pub const ENEMY_HP_PER_WAVE: u32 = 18;

/// Per-enemy hit point scale in 1 vs 2 battles.
pub const DOUBLE_MODE_HP_SCALE: f64 = 0.7;

/// Player heal on wave advance.
pub const WAVE_HEAL: u32 = 25;

// --- Upgrades ---

pub const ATTACK_UPGRADE_STEP: f64 = 0.15;
pub const DEFENSE_UPGRADE_STEP: f64 = 0.12;
pub const DEFENSE_MULTIPLIER_FLOOR: f64 = 0.1;
pub const AGILITY_UPGRADE_STEP: f64 = 0.10;

/// Max hit points (and immediate heal) granted by one hp upgrade.
pub const HP_UPGRADE_AMOUNT: u32 = 25;

// --- Projectiles ---

pub const ARROW_SPEED: f64 = 18.0;
pub const ARROW_LIFETIME_SECS: f64 = 2.0;

/// Spawn distance in front of the player.
pub const ARROW_SPAWN_OFFSET: f64 = 0.8;

/// Spawn height above the player's feet.
pub const ARROW_SPAWN_HEIGHT: f64 = 1.5;

/// Arrow hits an enemy torso within this 3D distance.
pub const ARROW_HIT_RADIUS: f64 = 1.5;

// --- Time dilation and camera shake ---

/// Time scale during the post-kill slow-motion pulse.
pub const SLOW_MO_SCALE: f64 = 0.2;

/// Wall-clock duration of the slow-motion pulse.
pub const SLOW_MO_DURATION_SECS: f64 = 0.6;

/// Wall-clock delay between the last kill and the upgrade gate.
pub const UPGRADE_GATE_DELAY_SECS: f64 = 0.6;

/// (timer, intensity) shake windows.
pub const MELEE_HIT_SHAKE: (f64, f64) = (0.12, 0.08);
pub const RANGED_HIT_SHAKE: (f64, f64) = (0.10, 0.06);
pub const PLAYER_HIT_SHAKE: (f64, f64) = (0.20, 0.15);

// --- Camera ---

/// Horizontal scale applied to the player/target midpoint.
pub const CAMERA_FOCUS_SCALE: f64 = 0.4;
pub const CAMERA_FOCUS_HEIGHT: f64 = 1.5;

// --- Particles ---

pub const MAX_PARTICLES: usize = 256;
pub const PARTICLE_GRAVITY: f64 = 12.0;
pub const PARTICLE_BASE_LIFETIME: f64 = 0.4;
pub const PARTICLE_LIFETIME_JITTER: f64 = 0.3;

/// Remaining lifetime at which a particle is still fully opaque.
pub const PARTICLE_FADE_SECS: f64 = 0.5;

/// Max horizontal burst speed on each axis.
pub const PARTICLE_SPREAD: f64 = 2.5;
pub const PARTICLE_MIN_RISE: f64 = 1.0;
pub const PARTICLE_MAX_RISE: f64 = 5.0;

/// Burst sizes.
pub const MELEE_HIT_BURST: u32 = 10;
pub const RANGED_HIT_BURST: u32 = 8;
pub const DEATH_BURST: u32 = 20;
pub const SWING_BURST: u32 = 4;
pub const PLAYER_HIT_BURST: u32 = 12;
pub const SWITCH_BURST: u32 = 6;

/// Height above an entity's feet where bursts appear.
pub const BURST_HEIGHT: f64 = 1.5;
