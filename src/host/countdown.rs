//! The single authoritative countdown.
//!
//! One countdown exists per mounted puzzle. Ticks, penalties and extensions
//! all go through it so there is nothing to drift against.

use serde::{Deserialize, Serialize};

/// Result of one countdown tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownTick {
    /// Not running; nothing changed.
    Idle,
    /// Decremented; carries the new remaining value.
    Ticked(i64),
    /// Reached zero on this tick. Reported exactly once.
    Expired,
}

/// A 1 Hz countdown with a penalty floor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: i64,
    floor: u32,
    running: bool,
    expired: bool,
}

impl Countdown {
    /// Create a stopped countdown.
    ///
    /// `floor` is the lowest value a penalty can push the clock to. A floor
    /// of 0 is raised to 1 so penalties never expire the puzzle directly.
    #[must_use]
    pub fn new(budget: u32, floor: u32) -> Self {
        Self {
            remaining: i64::from(budget),
            floor: floor.max(1),
            running: false,
            expired: false,
        }
    }

    /// Seconds left. Never negative.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Seconds left as displayed: `max(0, remaining)`.
    #[must_use]
    pub fn display(&self) -> u32 {
        u32::try_from(self.remaining.max(0)).unwrap_or(u32::MAX)
    }

    /// The penalty floor.
    #[must_use]
    pub fn floor(&self) -> u32 {
        self.floor
    }

    /// Whether the countdown is ticking.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the countdown has reached zero.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Start ticking. No effect once expired.
    pub fn start(&mut self) {
        if !self.expired {
            self.running = true;
        }
    }

    /// Stop ticking.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance one second.
    pub fn tick(&mut self) -> CountdownTick {
        if !self.running || self.expired {
            return CountdownTick::Idle;
        }
        self.remaining = (self.remaining - 1).max(0);
        if self.remaining == 0 {
            self.expired = true;
            self.running = false;
            CountdownTick::Expired
        } else {
            CountdownTick::Ticked(self.remaining)
        }
    }

    /// Deduct a penalty, clamped at the floor. Returns the seconds actually
    /// deducted.
    ///
    /// A clock already below the floor is left alone: a penalty never adds
    /// time.
    pub fn reduce(&mut self, seconds: u32) -> u32 {
        if self.expired {
            return 0;
        }
        let floor = i64::from(self.floor).min(self.remaining);
        let next = (self.remaining - i64::from(seconds)).max(floor);
        let applied = self.remaining - next;
        self.remaining = next;
        u32::try_from(applied).unwrap_or(0)
    }

    /// Add time. No effect once expired.
    pub fn extend(&mut self, seconds: u32) {
        if !self.expired {
            self.remaining += i64::from(seconds);
        }
    }

    /// Whether a timer sync announcement is due at the current value.
    ///
    /// Every 15 seconds normally, every 5 seconds from 30 down, and every
    /// second from 10 down.
    #[must_use]
    pub fn announce_due(&self) -> bool {
        let t = self.remaining;
        t % 15 == 0 || (t <= 30 && t % 5 == 0) || t <= 10
    }
}
