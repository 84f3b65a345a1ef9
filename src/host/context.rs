//! Concrete host: chrome state, countdown, timers and team outbox.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{Countdown, Host, TimerHandle, TimerQueue};
use crate::core::MessageKind;
use crate::team::TeamUpdate;

/// A banner message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub kind: MessageKind,
}

/// A host call, recorded in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    Message(Banner),
    Success,
    SubmitDisabled,
    SubmitEnabled,
    CountdownStarted,
    CountdownStopped,
    TimeReduced { requested: u32, applied: u32 },
    TimeExtended(u32),
    TimerScheduled(TimerHandle),
    TimerCancelled(TimerHandle),
    TeamUpdateSent,
}

/// Host state owned by the controller for one mounted puzzle.
///
/// Holds the chrome (banner, submit control, success flag), the single
/// countdown, the transient timer queue and the outgoing team updates.
#[derive(Clone, Debug)]
pub struct HostContext {
    countdown: Countdown,
    timers: TimerQueue,
    banner: Option<Banner>,
    submit_enabled: bool,
    success: bool,
    events: Vec<HostEvent>,
    outbox: Vec<TeamUpdate>,
}

impl HostContext {
    /// Create a host with a stopped countdown of `budget` seconds.
    #[must_use]
    pub fn new(budget: u32, floor: u32) -> Self {
        Self {
            countdown: Countdown::new(budget, floor),
            timers: TimerQueue::new(),
            banner: None,
            submit_enabled: true,
            success: false,
            events: Vec::new(),
            outbox: Vec::new(),
        }
    }

    /// The countdown.
    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub(crate) fn countdown_mut(&mut self) -> &mut Countdown {
        &mut self.countdown
    }

    pub(crate) fn timers_mut(&mut self) -> &mut TimerQueue {
        &mut self.timers
    }

    /// The transient timer queue.
    #[must_use]
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// The latest banner message.
    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Whether the submit control is interactive.
    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    /// Whether `show_success` has been called.
    #[must_use]
    pub fn success_shown(&self) -> bool {
        self.success
    }

    /// Re-enable the submit control. Never re-enables after success.
    pub fn enable_submit(&mut self) {
        if !self.success && !self.submit_enabled {
            self.submit_enabled = true;
            self.events.push(HostEvent::SubmitEnabled);
        }
    }

    /// Add time to the countdown.
    pub fn extend_time(&mut self, seconds: u32) {
        self.countdown.extend(seconds);
        self.events.push(HostEvent::TimeExtended(seconds));
    }

    /// Every host call so far, in order.
    #[must_use]
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Drain the recorded host calls.
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Banner messages shown so far.
    pub fn messages(&self) -> impl Iterator<Item = &Banner> {
        self.events.iter().filter_map(|e| match e {
            HostEvent::Message(banner) => Some(banner),
            _ => None,
        })
    }

    /// Number of `show_success` calls.
    #[must_use]
    pub fn success_calls(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, HostEvent::Success)).count()
    }

    /// Number of `reduce_time` calls.
    #[must_use]
    pub fn reduce_time_calls(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, HostEvent::TimeReduced { .. }))
            .count()
    }

    /// Drain team updates waiting for the relay.
    pub fn take_outbox(&mut self) -> Vec<TeamUpdate> {
        std::mem::take(&mut self.outbox)
    }

    /// Team updates waiting for the relay.
    #[must_use]
    pub fn outbox(&self) -> &[TeamUpdate] {
        &self.outbox
    }
}

impl Host for HostContext {
    fn show_message(&mut self, text: &str, kind: MessageKind) {
        let banner = Banner {
            text: text.to_string(),
            kind,
        };
        self.banner = Some(banner.clone());
        self.events.push(HostEvent::Message(banner));
    }

    fn show_success(&mut self) {
        self.events.push(HostEvent::Success);
        if self.success {
            return;
        }
        self.success = true;
        self.countdown.stop();
        self.submit_enabled = false;
    }

    fn disable_submit(&mut self) {
        self.submit_enabled = false;
        self.events.push(HostEvent::SubmitDisabled);
    }

    fn start_countdown(&mut self) {
        self.countdown.start();
        self.events.push(HostEvent::CountdownStarted);
    }

    fn stop_countdown(&mut self) {
        self.countdown.stop();
        self.events.push(HostEvent::CountdownStopped);
    }

    fn reduce_time(&mut self, seconds: u32) {
        let applied = self.countdown.reduce(seconds);
        debug!("time penalty: requested {seconds}s, applied {applied}s");
        self.events.push(HostEvent::TimeReduced {
            requested: seconds,
            applied,
        });
    }

    fn remaining_time(&self) -> i64 {
        self.countdown.remaining()
    }

    fn schedule(&mut self, delay_secs: u32) -> TimerHandle {
        let handle = self.timers.schedule(delay_secs);
        self.events.push(HostEvent::TimerScheduled(handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.timers.cancel(handle) {
            self.events.push(HostEvent::TimerCancelled(handle));
        }
    }

    fn send_team_update(&mut self, update: TeamUpdate) {
        self.outbox.push(update);
        self.events.push(HostEvent::TeamUpdateSent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_host() {
        let host = HostContext::new(90, 5);
        assert_eq!(host.remaining_time(), 90);
        assert!(host.submit_enabled());
        assert!(!host.success_shown());
        assert!(host.banner().is_none());
        assert!(!host.countdown().is_running());
    }

    #[test]
    fn test_show_message_sets_banner() {
        let mut host = HostContext::new(90, 5);
        host.show_message("Wrong wire!", MessageKind::Error);

        let banner = host.banner().unwrap();
        assert_eq!(banner.text, "Wrong wire!");
        assert_eq!(banner.kind, MessageKind::Error);
        assert_eq!(host.messages().count(), 1);
    }

    #[test]
    fn test_show_success_is_idempotent() {
        let mut host = HostContext::new(90, 5);
        host.start_countdown();
        host.show_success();
        host.show_success();

        assert!(host.success_shown());
        assert!(!host.countdown().is_running());
        assert!(!host.submit_enabled());
        assert_eq!(host.success_calls(), 2);

        host.enable_submit();
        assert!(!host.submit_enabled());
    }

    #[test]
    fn test_reduce_time_records_applied() {
        let mut host = HostContext::new(12, 5);
        host.reduce_time(10);

        assert_eq!(host.remaining_time(), 5);
        assert_eq!(
            host.events().last(),
            Some(&HostEvent::TimeReduced {
                requested: 10,
                applied: 7
            })
        );
        assert_eq!(host.reduce_time_calls(), 1);
    }

    #[test]
    fn test_submit_toggle() {
        let mut host = HostContext::new(30, 1);
        host.disable_submit();
        assert!(!host.submit_enabled());
        host.enable_submit();
        assert!(host.submit_enabled());
    }

    #[test]
    fn test_cancel_records_only_pending() {
        let mut host = HostContext::new(30, 1);
        let handle = host.schedule(3);
        host.cancel(handle);
        host.cancel(handle);

        let cancels = host
            .events()
            .iter()
            .filter(|e| matches!(e, HostEvent::TimerCancelled(_)))
            .count();
        assert_eq!(cancels, 1);
        assert!(host.timers().is_empty());
    }

    #[test]
    fn test_team_outbox() {
        let mut host = HostContext::new(30, 1);
        host.send_team_update(TeamUpdate::default());
        assert_eq!(host.outbox().len(), 1);
        assert_eq!(host.take_outbox().len(), 1);
        assert!(host.outbox().is_empty());
    }
}
