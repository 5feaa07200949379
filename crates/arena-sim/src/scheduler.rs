//! Wall-clock deferred events.
//!
//! Events fire after a fixed wall-clock delay regardless of the simulated
//! time scale. Each carries the epoch it was scheduled in; a reset moves to
//! a new epoch and stale events are dropped when they come due instead of
//! being cancelled up front.

use log::debug;

/// What to do when a deferred event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredKind {
    /// End the slow-motion pulse with this id.
    SlowMotionRebound { pulse: u64 },
    /// Open the upgrade gate after `wave` was cleared.
    UpgradeGate { wave: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeferredEvent {
    pub fire_at_wall_secs: f64,
    pub epoch: u64,
    pub kind: DeferredKind,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    epoch: u64,
    pending: Vec<DeferredEvent>,
}

impl Scheduler {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of events waiting to fire, stale ones included.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, now_wall_secs: f64, delay_secs: f64, kind: DeferredKind) {
        debug!("scheduled {kind:?} in {delay_secs:.2}s (epoch {})", self.epoch);
        self.pending.push(DeferredEvent {
            fire_at_wall_secs: now_wall_secs + delay_secs,
            epoch: self.epoch,
            kind,
        });
    }

    /// Invalidate everything scheduled so far.
    pub fn advance_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Remove every event due at `now_wall_secs` and return the ones that
    /// still belong to the current epoch, in scheduling order.
    pub fn drain_due(&mut self, now_wall_secs: f64) -> Vec<DeferredKind> {
        let epoch = self.epoch;
        let mut fired = Vec::new();
        self.pending.retain(|event| {
            if event.fire_at_wall_secs > now_wall_secs {
                return true;
            }
            if event.epoch == epoch {
                fired.push(event.kind);
            } else {
                debug!("dropped stale {:?} from epoch {}", event.kind, event.epoch);
            }
            false
        });
        fired
    }
}
