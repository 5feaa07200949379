//! Time dilation and camera shake.
//!
//! Both follow "last wins": a new pulse replaces whatever is running
//! instead of stacking on top of it.

use arena_core::constants::SLOW_MO_SCALE;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraShake {
    /// Remaining wall-clock seconds.
    pub timer: f64,
    pub intensity: f64,
}

impl CameraShake {
    /// Replace the running shake with a new `(timer, intensity)` window.
    pub fn trigger(&mut self, window: (f64, f64)) {
        self.timer = window.0;
        self.intensity = window.1;
    }

    pub fn decay(&mut self, wall_dt: f64) {
        self.timer = (self.timer - wall_dt.max(0.0)).max(0.0);
        if self.timer == 0.0 {
            self.intensity = 0.0;
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }
}

/// Global simulation clock scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDilation {
    scale: f64,
    /// Id of the most recent slow-motion pulse.
    pulse: u64,
}

impl Default for TimeDilation {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pulse: 0,
        }
    }
}

impl TimeDilation {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Enter slow motion. Returns the pulse id the rebound must present.
    pub fn begin_slow_motion(&mut self) -> u64 {
        self.pulse += 1;
        self.scale = SLOW_MO_SCALE;
        self.pulse
    }

    /// Restore normal speed if `pulse` is still the latest one.
    /// Returns whether the scale changed.
    pub fn end_slow_motion(&mut self, pulse: u64) -> bool {
        if pulse != self.pulse || self.scale == 1.0 {
            return false;
        }
        self.scale = 1.0;
        true
    }
}

/// Presentation-facing pulses that ride on top of the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pulses {
    pub shake: CameraShake,
    pub dilation: TimeDilation,
}

impl Pulses {
    pub fn time_scale(&self) -> f64 {
        self.dilation.scale()
    }
}
