//! Fundamental geometric and simulation types.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_FRAME_DT;

/// 3D position in arena space (world units).
/// x and z span the ground plane, y is height above the ground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in arena space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Simulation time tracking.
///
/// `elapsed_secs` is simulated time (clamped and time-scaled), while
/// `wall_secs` follows the raw frame clock and drives deferred events.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each simulated frame).
    pub tick: u64,
    /// Elapsed simulated time in seconds.
    pub elapsed_secs: f64,
    /// Elapsed wall-clock time in seconds.
    pub wall_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Ground-plane projection (x, z).
    pub fn horizontal(&self) -> DVec2 {
        DVec2::new(self.x, self.z)
    }

    /// The same point raised by `height` (torso / weapon reference points).
    pub fn raised(&self, height: f64) -> Position {
        Position::new(self.x, self.y + height, self.z)
    }

    /// 3D distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.as_dvec3().distance(other.as_dvec3())
    }

    /// Distance on the ground plane (ignoring height).
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        self.horizontal().distance(other.horizontal())
    }

    /// Horizontal distance from the arena center.
    pub fn radius(&self) -> f64 {
        self.horizontal().length()
    }

    /// Facing angle that looks from this position toward `other`.
    pub fn facing_to(&self, other: &Position) -> f64 {
        let d = other.horizontal() - self.horizontal();
        d.x.atan2(d.y)
    }

    /// Project back onto the circle of `radius` along the ray from the arena
    /// center if the point lies outside it. Height is left untouched.
    pub fn clamp_to_radius(&mut self, radius: f64) {
        let flat = self.horizontal();
        let len = flat.length();
        if len > radius && len > f64::EPSILON {
            let clamped = flat * (radius / len);
            self.x = clamped.x;
            self.z = clamped.y;
        }
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f64 {
        self.as_dvec3().length()
    }
}

/// Unit ground-plane direction for a facing angle (0 = +z, PI/2 = +x).
pub fn facing_direction(facing: f64) -> DVec2 {
    DVec2::new(facing.sin(), facing.cos())
}

impl SimTime {
    /// Advance by one frame. Returns the simulated dt: the raw frame delta
    /// scaled by `time_scale` and clamped to `MAX_FRAME_DT`.
    pub fn advance(&mut self, raw_dt: f64, time_scale: f64) -> f64 {
        let raw_dt = raw_dt.max(0.0);
        let dt = (raw_dt * time_scale).min(MAX_FRAME_DT);
        self.tick += 1;
        self.elapsed_secs += dt;
        self.wall_secs += raw_dt;
        dt
    }
}
