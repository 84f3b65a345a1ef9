//! Lifecycle bookkeeping shared by every puzzle kind.
//!
//! `Lifecycle` owns the status, the attempt counter and the active handicap,
//! and performs the uniform terminal actions:
//!
//! - **Win**: `Succeeded`, cancel timers, stop the countdown, `show_success`
//! - **Lose**: `Failed`, cancel timers, stop the countdown, error message,
//!   `disable_submit`
//! - **Wrong answer**: count the attempt, deduct the penalty, then either
//!   lose (attempts exhausted) or show an error message
//!
//! Every transition out of `Active` goes through here, so the terminal
//! actions happen exactly once.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::InputOutcome;
use crate::core::{MessageKind, PuzzleKind, PuzzleStatus};
use crate::events::{Handicap, RandomEvent};
use crate::host::{Host, TimerHandle};
use crate::view::PuzzleHeader;

/// Failure text when the countdown runs out.
pub const TIME_UP_TEXT: &str = "Time's up! The alarm has been triggered.";

/// Attempt limit and time penalty for a puzzle kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptPolicy {
    /// Wrong answers allowed before failing. 0 means unlimited.
    pub max_attempts: u32,

    /// Seconds deducted per wrong answer.
    pub penalty_seconds: u32,
}

impl AttemptPolicy {
    /// Create a policy.
    #[must_use]
    pub const fn new(max_attempts: u32, penalty_seconds: u32) -> Self {
        Self {
            max_attempts,
            penalty_seconds,
        }
    }
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self::new(3, 10)
    }
}

#[derive(Clone, Debug)]
struct ActiveHandicap {
    event: RandomEvent,
    handicap: Handicap,
    handle: TimerHandle,
}

/// Status, attempts and handicap of one puzzle instance.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    kind: PuzzleKind,
    status: PuzzleStatus,
    attempts: u32,
    policy: AttemptPolicy,
    failure_text: &'static str,
    handicap: Option<ActiveHandicap>,
}

impl Lifecycle {
    /// Create a pending lifecycle.
    ///
    /// `failure_text` is shown when attempts run out.
    #[must_use]
    pub fn new(kind: PuzzleKind, policy: AttemptPolicy, failure_text: &'static str) -> Self {
        Self {
            kind,
            status: PuzzleStatus::Pending,
            attempts: 0,
            policy,
            failure_text,
            handicap: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PuzzleKind {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> PuzzleStatus {
        self.status
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn policy(&self) -> AttemptPolicy {
        self.policy
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether a transient event is locking input.
    #[must_use]
    pub fn input_locked(&self) -> bool {
        matches!(&self.handicap, Some(h) if h.handicap == Handicap::LockInput)
    }

    /// Whether a transient event is hiding hints.
    #[must_use]
    pub fn hints_obscured(&self) -> bool {
        matches!(&self.handicap, Some(h) if h.handicap == Handicap::ObscureHints)
    }

    /// The transient event in effect, if any.
    #[must_use]
    pub fn active_event(&self) -> Option<&RandomEvent> {
        self.handicap.as_ref().map(|h| &h.event)
    }

    /// Common view header.
    #[must_use]
    pub fn header(&self) -> PuzzleHeader {
        PuzzleHeader {
            kind: self.kind,
            status: self.status,
            attempts: self.attempts,
            max_attempts: self.policy.max_attempts,
            event: self.active_event().cloned(),
            input_locked: self.input_locked(),
            hints_obscured: self.hints_obscured(),
        }
    }

    /// `Pending → Active`, starting the countdown.
    pub fn activate(&mut self, host: &mut dyn Host) {
        if self.status != PuzzleStatus::Pending {
            return;
        }
        self.status = PuzzleStatus::Active;
        host.start_countdown();
        info!("{} puzzle active", self.kind);
    }

    /// Gate an input: `Err` carries the outcome to return unchanged.
    pub fn admit(&self, host: &mut dyn Host) -> Result<(), InputOutcome> {
        if !self.status.is_active() {
            return Err(InputOutcome::Ignored);
        }
        if let Some(active) = self.handicap.as_ref().filter(|h| h.handicap == Handicap::LockInput) {
            host.show_message(
                &format!("{} in progress. Hold still!", active.event.display_name()),
                MessageKind::Warning,
            );
            return Err(InputOutcome::Blocked);
        }
        Ok(())
    }

    /// Count a wrong answer: deduct the penalty, then fail if attempts are
    /// exhausted or show `text` otherwise.
    pub fn wrong_answer(&mut self, text: &str, host: &mut dyn Host) -> InputOutcome {
        if !self.status.is_active() {
            return InputOutcome::Ignored;
        }
        self.attempts += 1;
        host.reduce_time(self.policy.penalty_seconds);
        debug!(
            "{} wrong answer {}/{}",
            self.kind, self.attempts, self.policy.max_attempts
        );

        if self.policy.max_attempts > 0 && self.attempts >= self.policy.max_attempts {
            self.fail(self.failure_text, host);
            InputOutcome::Failed
        } else {
            host.show_message(text, MessageKind::Error);
            InputOutcome::Penalized
        }
    }

    /// `Active → Succeeded`.
    pub fn succeed(&mut self, host: &mut dyn Host) -> InputOutcome {
        if !self.status.is_active() {
            return InputOutcome::Ignored;
        }
        self.status = PuzzleStatus::Succeeded;
        self.release(host);
        host.stop_countdown();
        host.show_success();
        info!("{} puzzle solved after {} wrong answers", self.kind, self.attempts);
        InputOutcome::Solved
    }

    /// Move to `Failed` with `text`. No effect once terminal.
    pub fn fail(&mut self, text: &str, host: &mut dyn Host) {
        if self.status.is_terminal() {
            return;
        }
        self.status = PuzzleStatus::Failed;
        self.release(host);
        host.stop_countdown();
        host.show_message(text, MessageKind::Error);
        host.disable_submit();
        info!("{} puzzle failed: {}", self.kind, text);
    }

    /// The countdown ran out.
    pub fn expire(&mut self, host: &mut dyn Host) {
        if self.status.is_active() {
            self.fail(TIME_UP_TEXT, host);
        }
    }

    /// Apply a transient event for `duration` seconds.
    ///
    /// A new event replaces the one in effect. Unknown events and events
    /// arriving after the puzzle ended are ignored.
    pub fn apply_event(&mut self, event: &RandomEvent, duration: u32, host: &mut dyn Host) {
        if !self.status.is_active() {
            debug!("{} ignoring {} after completion", self.kind, event.id());
            return;
        }
        let Some(handicap) = event.handicap() else {
            debug!("{} ignoring unknown event {}", self.kind, event.id());
            return;
        };

        self.release(host);
        let handle = host.schedule(duration);
        self.handicap = Some(ActiveHandicap {
            event: event.clone(),
            handicap,
            handle,
        });
        host.show_message(
            &format!("{} in progress!", event.display_name()),
            MessageKind::Warning,
        );
    }

    /// Handle a fired timer. Returns whether it belonged to the lifecycle.
    pub fn on_timer(&mut self, handle: TimerHandle, host: &mut dyn Host) -> bool {
        match &self.handicap {
            Some(active) if active.handle == handle => {
                let name = active.event.display_name();
                self.handicap = None;
                if self.status.is_active() {
                    host.show_message(&format!("{name} has passed."), MessageKind::Info);
                }
                true
            }
            _ => false,
        }
    }

    /// Cancel every timer the lifecycle owns.
    pub fn cleanup(&mut self, host: &mut dyn Host) {
        self.release(host);
    }

    fn release(&mut self, host: &mut dyn Host) {
        if let Some(active) = self.handicap.take() {
            host.cancel(active.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostContext, HostEvent};

    fn active(policy: AttemptPolicy) -> (Lifecycle, HostContext) {
        let mut host = HostContext::new(60, 5);
        let mut lifecycle = Lifecycle::new(PuzzleKind::Wires, policy, "Boom.");
        lifecycle.activate(&mut host);
        (lifecycle, host)
    }

    #[test]
    fn test_activate_starts_countdown_once() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        lifecycle.activate(&mut host);

        assert!(lifecycle.is_active());
        assert!(host.countdown().is_running());
        let starts = host
            .events()
            .iter()
            .filter(|e| matches!(e, HostEvent::CountdownStarted))
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_pending_rejects_input() {
        let mut host = HostContext::new(60, 5);
        let lifecycle = Lifecycle::new(PuzzleKind::Wires, AttemptPolicy::default(), "Boom.");
        assert_eq!(lifecycle.admit(&mut host), Err(InputOutcome::Ignored));
    }

    #[test]
    fn test_wrong_answers_exhaust_attempts() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::new(3, 10));

        assert_eq!(lifecycle.wrong_answer("Nope.", &mut host), InputOutcome::Penalized);
        assert_eq!(lifecycle.wrong_answer("Nope.", &mut host), InputOutcome::Penalized);
        assert!(lifecycle.is_active());
        assert_eq!(lifecycle.wrong_answer("Nope.", &mut host), InputOutcome::Failed);

        assert_eq!(lifecycle.status(), PuzzleStatus::Failed);
        assert_eq!(lifecycle.attempts(), 3);
        assert_eq!(host.reduce_time_calls(), 3);
        assert!(!host.submit_enabled());
        assert_eq!(host.banner().unwrap().text, "Boom.");
    }

    #[test]
    fn test_unlimited_attempts() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::new(0, 1));
        for _ in 0..20 {
            lifecycle.wrong_answer("Nope.", &mut host);
        }
        assert!(lifecycle.is_active());
    }

    #[test]
    fn test_succeed_once() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        assert_eq!(lifecycle.succeed(&mut host), InputOutcome::Solved);
        assert_eq!(lifecycle.succeed(&mut host), InputOutcome::Ignored);
        assert_eq!(host.success_calls(), 1);
        assert!(!host.countdown().is_running());
    }

    #[test]
    fn test_terminal_ignores_wrong_answers() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        lifecycle.succeed(&mut host);
        assert_eq!(lifecycle.wrong_answer("Nope.", &mut host), InputOutcome::Ignored);
        assert_eq!(lifecycle.attempts(), 0);
    }

    #[test]
    fn test_expire_fails_with_time_up() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        lifecycle.expire(&mut host);
        assert_eq!(lifecycle.status(), PuzzleStatus::Failed);
        assert_eq!(host.banner().unwrap().text, TIME_UP_TEXT);
    }

    #[test]
    fn test_event_locks_then_reverts() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        lifecycle.apply_event(&RandomEvent::SecurityPatrol, 5, &mut host);

        assert!(lifecycle.input_locked());
        assert_eq!(lifecycle.admit(&mut host), Err(InputOutcome::Blocked));

        let handle = match host.events().iter().rev().find_map(|e| match e {
            HostEvent::TimerScheduled(h) => Some(*h),
            _ => None,
        }) {
            Some(h) => h,
            None => panic!("no timer scheduled"),
        };
        assert!(lifecycle.on_timer(handle, &mut host));
        assert!(!lifecycle.input_locked());
        assert!(lifecycle.admit(&mut host).is_ok());
    }

    #[test]
    fn test_camera_sweep_obscures_without_locking() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        lifecycle.apply_event(&RandomEvent::CameraSweep, 5, &mut host);
        assert!(lifecycle.hints_obscured());
        assert!(!lifecycle.input_locked());
        assert!(lifecycle.admit(&mut host).is_ok());
    }

    #[test]
    fn test_new_event_replaces_old_timer() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        lifecycle.apply_event(&RandomEvent::SecurityPatrol, 5, &mut host);
        lifecycle.apply_event(&RandomEvent::CameraSweep, 5, &mut host);
        assert_eq!(host.timers().len(), 1);
        assert!(lifecycle.hints_obscured());
    }

    #[test]
    fn test_unknown_event_and_terminal_event_ignored() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        lifecycle.apply_event(&RandomEvent::parse("fog"), 5, &mut host);
        assert!(lifecycle.active_event().is_none());

        lifecycle.succeed(&mut host);
        lifecycle.apply_event(&RandomEvent::SecurityPatrol, 5, &mut host);
        assert!(lifecycle.active_event().is_none());
        assert!(host.timers().is_empty());
    }

    #[test]
    fn test_cleanup_cancels_handicap_timer() {
        let (mut lifecycle, mut host) = active(AttemptPolicy::default());
        lifecycle.apply_event(&RandomEvent::SystemCheck, 10, &mut host);
        lifecycle.cleanup(&mut host);
        assert!(host.timers().is_empty());
    }
}
