//! Tick-driven round timers
//!
//! The round countdown and the post-basket ball reset both run on simulation
//! ticks rather than wall-clock callbacks, so a round plays out identically
//! regardless of display refresh rate.

use crate::consts::SIM_HZ;

/// Whole-second countdown for a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u32,
    /// Ticks elapsed inside the current second
    sub_ticks: u32,
    running: bool,
}

impl Countdown {
    /// A countdown that shows `secs` but is not ticking yet
    pub fn stopped(secs: u32) -> Self {
        Self {
            remaining_secs: secs,
            sub_ticks: 0,
            running: false,
        }
    }

    /// (Re)start from `secs`
    pub fn start(&mut self, secs: u32) {
        self.remaining_secs = secs;
        self.sub_ticks = 0;
        self.running = secs > 0;
    }

    /// Stop ticking, keeping the displayed value
    pub fn cancel(&mut self) {
        self.running = false;
        self.sub_ticks = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Advance one tick. Returns true on the single tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.sub_ticks += 1;
        if self.sub_ticks < SIM_HZ {
            return false;
        }
        self.sub_ticks = 0;
        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.running = false;
            return true;
        }
        false
    }
}

/// A ball reset queued after a basket
///
/// Carries the ball epoch it was scheduled for. When it fires it only applies
/// if that ball is still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReset {
    pub epoch: u32,
    pub ticks_left: u32,
}

impl PendingReset {
    pub fn new(epoch: u32, delay_ticks: u32) -> Self {
        Self {
            epoch,
            ticks_left: delay_ticks,
        }
    }
}

/// Advance every pending reset by one tick, removing and returning the epochs
/// of those that are due.
pub fn advance_pending(pending: &mut Vec<PendingReset>) -> Vec<u32> {
    let mut due = Vec::new();
    pending.retain_mut(|reset| {
        reset.ticks_left = reset.ticks_left.saturating_sub(1);
        if reset.ticks_left == 0 {
            due.push(reset.epoch);
            false
        } else {
            true
        }
    });
    due
}
