//! Host callback surface.
//!
//! Puzzles never touch presentation, timers or the network directly. They
//! call outward through `Host`, which the controller supplies:
//!
//! - banner messages and the success notification
//! - the submit control
//! - the single authoritative countdown (start, stop, penalties)
//! - transient timers on the shared logical clock
//! - fire-and-forget team broadcasts
//!
//! `HostContext` is the concrete implementation. It records every call as a
//! `HostEvent` so the embedding UI (and tests) can observe what the puzzle
//! asked for.

mod context;
mod countdown;
mod timers;

pub use context::{Banner, HostContext, HostEvent};
pub use countdown::{Countdown, CountdownTick};
pub use timers::TimerQueue;

use serde::{Deserialize, Serialize};

use crate::core::MessageKind;
use crate::team::TeamUpdate;

/// Handle for a timer scheduled on the host clock.
///
/// Handles are never reused within one host, so a cancelled handle can
/// never fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

impl std::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// The calls a puzzle instance may make outward.
pub trait Host {
    /// Show a banner message.
    fn show_message(&mut self, text: &str, kind: MessageKind);

    /// Signal the puzzle is won. Idempotent: stops the countdown and locks
    /// the submit control.
    fn show_success(&mut self);

    /// Make the submit control non-interactive.
    fn disable_submit(&mut self);

    /// Start the authoritative 1 Hz countdown. Expiry is delivered to the
    /// puzzle's `on_time_expired` exactly once.
    fn start_countdown(&mut self);

    /// Halt the countdown (terminal transitions).
    fn stop_countdown(&mut self);

    /// Deduct a penalty from the countdown, clamped at the kind's floor.
    fn reduce_time(&mut self, seconds: u32);

    /// Seconds left on the countdown.
    fn remaining_time(&self) -> i64;

    /// Schedule a one-shot timer `delay_secs` from now.
    fn schedule(&mut self, delay_secs: u32) -> TimerHandle;

    /// Cancel a timer. Cancelling a fired or unknown handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);

    /// Broadcast the team state to every teammate.
    fn send_team_update(&mut self, update: TeamUpdate);
}
