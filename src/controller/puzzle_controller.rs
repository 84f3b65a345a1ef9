//! The puzzle controller.
//!
//! Owns the mounted instance and its `HostContext`, drives the logical clock
//! and brokers submission, random events, crew powers and team updates.
//!
//! ## Crew Powers
//!
//! - **Hacker**: slows the security clock, adding time without raising the
//!   alert level
//! - **Safe Cracker**: clears the next lock of the mounted puzzle
//! - **Lookout**: early warning of random events for a limited time
//! - **Demolitions**: no power at the puzzle layer

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{PuzzleRegistry, SolutionChecker};
use crate::core::{MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng, PuzzleStatus, Role};
use crate::error::{ConfigError, SubmitError, SyncError, TransportError};
use crate::events::{EventConfig, EventDirector, RandomEvent};
use crate::host::{CountdownTick, Host, HostContext, TimerHandle};
use crate::puzzles::{InputOutcome, Puzzle, PuzzleInput, Submission};
use crate::team::TeamUpdate;
use crate::view::{ChromeView, PuzzleView};

/// Banner shown when the solution check cannot be reached.
pub const TRANSPORT_ERROR_TEXT: &str = "Could not reach the crew's uplink. Try again.";

/// Controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerPhase {
    Unmounted,
    Active,
    Succeeded,
    Failed,
}

/// Controller tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Seconds taken off the countdown per difficulty level above 1.
    pub per_level_deduction: u32,

    /// Shortest countdown any puzzle gets.
    pub min_budget: u32,

    /// Seconds added by `extend_time` when no amount is given.
    pub extension_seconds: u32,

    /// Random event tuning. `None` disables random events.
    pub events: Option<EventConfig>,

    /// Seconds the Hacker's power adds to the countdown.
    #[serde(default = "default_slowdown")]
    pub slowdown_seconds: u32,

    /// Seconds the Lookout's early warning lasts.
    #[serde(default = "default_lookout")]
    pub lookout_seconds: u32,
}

fn default_slowdown() -> u32 {
    30
}

fn default_lookout() -> u32 {
    60
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            per_level_deduction: 10,
            min_budget: 30,
            extension_seconds: 60,
            events: None,
            slowdown_seconds: default_slowdown(),
            lookout_seconds: default_lookout(),
        }
    }
}

impl ControllerConfig {
    /// Set the per-level deduction and minimum budget.
    #[must_use]
    pub fn with_budget(mut self, per_level_deduction: u32, min_budget: u32) -> Self {
        self.per_level_deduction = per_level_deduction;
        self.min_budget = min_budget;
        self
    }

    /// Enable random events.
    #[must_use]
    pub fn with_events(mut self, events: EventConfig) -> Self {
        self.events = Some(events);
        self
    }
}

#[derive(Clone, Debug)]
struct PendingEvent {
    handle: TimerHandle,
    event: RandomEvent,
    duration: u32,
}

struct Mounted {
    puzzle: Box<dyn Puzzle>,
    host: HostContext,
    role: Role,
    director: Option<EventDirector>,
    pending_events: Vec<PendingEvent>,
    lookout_expiry: Option<TimerHandle>,
    submit_in_flight: bool,
}

impl Mounted {
    fn deliver(&mut self, event: &RandomEvent, duration: u32) {
        debug!("delivering {} for {duration}s", event.id());
        self.puzzle.handle_random_event(event, duration, &mut self.host);
    }

    fn fire(&mut self, handle: TimerHandle) {
        match self.pending_events.iter().position(|p| p.handle == handle) {
            Some(index) => {
                let pending = self.pending_events.swap_remove(index);
                self.deliver(&pending.event, pending.duration);
            }
            None => self.puzzle.on_timer(handle, &mut self.host),
        }
    }
}

/// Mounts one puzzle at a time and supplies its host.
///
/// ## Example
///
/// ```
/// use heist_puzzles::controller::{ControllerPhase, PuzzleController};
/// use heist_puzzles::core::{PuzzleConfig, PuzzleKind};
/// use heist_puzzles::puzzles::{PuzzleInput, SeedData};
///
/// let mut controller = PuzzleController::default();
/// let config = PuzzleConfig::new(PuzzleKind::Keypad).with_seed_data(SeedData::keypad("42"));
/// controller.mount(config).unwrap();
///
/// controller.handle_input(&PuzzleInput::PressDigit(4));
/// controller.handle_input(&PuzzleInput::PressDigit(2));
/// controller.handle_input(&PuzzleInput::Enter);
///
/// assert_eq!(controller.phase(), ControllerPhase::Succeeded);
/// ```
pub struct PuzzleController {
    registry: PuzzleRegistry,
    config: ControllerConfig,
    mounted: Option<Mounted>,
    alert_level: u32,
    lookout_warning: bool,
}

impl Default for PuzzleController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl PuzzleController {
    /// Create a controller over the standard registry.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_registry(PuzzleRegistry::standard(), config)
    }

    #[must_use]
    pub fn with_registry(registry: PuzzleRegistry, config: ControllerConfig) -> Self {
        Self {
            registry,
            config,
            mounted: None,
            alert_level: 0,
            lookout_warning: false,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &PuzzleRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // === Mounting ===

    /// Mount a puzzle, replacing any mounted one.
    ///
    /// Computes the countdown budget from the kind's tuning and calls
    /// `initialize`.
    /// A kind missing from the registry falls back to the registry default.
    pub fn mount(&mut self, config: PuzzleConfig) -> Result<(), ConfigError> {
        let config = self.registry.fallback(config)?;
        config.validate()?;
        let (mut puzzle, spec) = self.registry.build(&config)?;
        self.unmount();

        let budget = spec.budget(
            config.difficulty,
            self.config.per_level_deduction,
            self.config.min_budget,
        );
        let mut host = HostContext::new(budget, spec.floor_seconds);
        let director = self.config.events.clone().map(|events| {
            EventDirector::new(events, PuzzleRng::new(config.rng_seed).for_context("events"))
        });

        puzzle.initialize(&mut host);
        info!(
            "mounted {} (difficulty {}, {budget}s, role {})",
            config.kind,
            config.difficulty,
            config.role_or_default()
        );

        self.mounted = Some(Mounted {
            puzzle,
            host,
            role: config.role_or_default(),
            director,
            pending_events: Vec::new(),
            lookout_expiry: None,
            submit_in_flight: false,
        });
        Ok(())
    }

    /// Mount by textual kind. Unknown names fall back to the seed data's
    /// kind when there is one, otherwise to the registry default.
    pub fn mount_named(&mut self, name: &str, mut config: PuzzleConfig) -> Result<(), ConfigError> {
        config.kind = match (
            PuzzleKind::parse(name).filter(|k| self.registry.contains(*k)),
            &config.seed_data,
        ) {
            (Some(kind), _) => kind,
            (None, Some(seed)) if self.registry.contains(seed.kind()) => {
                warn!("unknown puzzle kind {name:?}, using seed kind {}", seed.kind());
                seed.kind()
            }
            (None, _) => self.registry.resolve(name),
        };
        self.mount(config)
    }

    /// Tear down the mounted puzzle. Returns its final status.
    ///
    /// After this no timer the puzzle scheduled can fire.
    pub fn unmount(&mut self) -> Option<PuzzleStatus> {
        let mut mounted = self.mounted.take()?;
        if mounted.lookout_expiry.is_some() {
            self.lookout_warning = false;
        }
        mounted.puzzle.cleanup(&mut mounted.host);
        mounted.host.timers_mut().clear();
        mounted.host.countdown_mut().stop();
        let status = mounted.puzzle.status();
        info!("unmounted {} ({:?})", mounted.puzzle.kind(), status);
        Some(status)
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> ControllerPhase {
        match self.mounted.as_ref().map(|m| m.puzzle.status()) {
            None => ControllerPhase::Unmounted,
            Some(PuzzleStatus::Pending | PuzzleStatus::Active) => ControllerPhase::Active,
            Some(PuzzleStatus::Succeeded) => ControllerPhase::Succeeded,
            Some(PuzzleStatus::Failed) => ControllerPhase::Failed,
        }
    }

    /// The mounted puzzle.
    #[must_use]
    pub fn puzzle(&self) -> Option<&dyn Puzzle> {
        self.mounted.as_ref().map(|m| m.puzzle.as_ref())
    }

    /// The mounted puzzle's host.
    #[must_use]
    pub fn host(&self) -> Option<&HostContext> {
        self.mounted.as_ref().map(|m| &m.host)
    }

    /// The local crew role of the mounted puzzle.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.mounted.as_ref().map(|m| m.role)
    }

    #[must_use]
    pub fn remaining_time(&self) -> Option<i64> {
        self.host().map(|h| h.remaining_time())
    }

    // === Input ===

    /// Forward a player input. Ignored unless the controller is `Active`.
    pub fn handle_input(&mut self, input: &PuzzleInput) -> InputOutcome {
        if self.phase() != ControllerPhase::Active {
            return InputOutcome::Ignored;
        }
        let outcome = match self.mounted.as_mut() {
            Some(m) => m.puzzle.handle_input(input, &mut m.host),
            None => InputOutcome::Ignored,
        };
        self.settle();
        outcome
    }

    /// Once the puzzle has ended, cancel the timers the controller holds
    /// for it. A running Lookout warning ends with it.
    fn settle(&mut self) {
        let Some(m) = self.mounted.as_mut() else {
            return;
        };
        if !m.puzzle.status().is_terminal() {
            return;
        }
        for pending in m.pending_events.drain(..) {
            debug!("dropping {} warned for a finished puzzle", pending.event.id());
            m.host.cancel(pending.handle);
        }
        if let Some(handle) = m.lookout_expiry.take() {
            m.host.cancel(handle);
            self.lookout_warning = false;
        }
    }

    // === Clock ===

    /// Advance the logical clock by `seconds`.
    pub fn advance(&mut self, seconds: u32) {
        for _ in 0..seconds {
            self.tick();
        }
    }

    /// Advance the logical clock one second: tick the countdown, roll for a
    /// random event, then fire due timers in handle order.
    pub fn tick(&mut self) {
        let alert_level = self.alert_level;
        let lookout_warning = self.lookout_warning;
        let Some(m) = self.mounted.as_mut() else {
            return;
        };

        match m.host.countdown_mut().tick() {
            CountdownTick::Expired => {
                info!("{} countdown expired", m.puzzle.kind());
                m.puzzle.on_time_expired(&mut m.host);
            }
            CountdownTick::Ticked(remaining) => {
                if m.host.countdown().announce_due() {
                    debug!("timer sync: {remaining}s");
                }
                let rolled = match m.director.as_mut() {
                    Some(director) if director.is_due(remaining) => director.roll(alert_level),
                    _ => None,
                };
                if let Some(rolled) = rolled {
                    if lookout_warning {
                        let lead = m
                            .director
                            .as_ref()
                            .map_or(0, |d| d.config().warning_lead);
                        m.host.show_message(
                            &format!(
                                "Lookout detects {} approaching in {lead} seconds!",
                                rolled.event.display_name()
                            ),
                            MessageKind::Warning,
                        );
                        let handle = m.host.schedule(lead);
                        m.pending_events.push(PendingEvent {
                            handle,
                            event: rolled.event,
                            duration: rolled.duration,
                        });
                    } else {
                        m.deliver(&rolled.event, rolled.duration);
                    }
                }
            }
            CountdownTick::Idle => {}
        }

        m.host.timers_mut().advance();
        while let Some(handle) = m.host.timers_mut().pop_due() {
            if m.lookout_expiry == Some(handle) {
                m.lookout_expiry = None;
                self.lookout_warning = false;
                m.host.show_message("The Lookout lost sight of security.", MessageKind::Info);
                info!("lookout warning expired");
            } else {
                m.fire(handle);
            }
        }
        self.settle();
    }

    /// Add time to the countdown and raise the alert level.
    ///
    /// Returns false when nothing is mounted or the puzzle has ended.
    pub fn extend_time(&mut self, seconds: u32) -> bool {
        if self.phase() != ControllerPhase::Active {
            return false;
        }
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };
        m.host.extend_time(seconds);
        m.host.show_message(
            &format!("Timer extended by {seconds} seconds. Security is on alert."),
            MessageKind::Info,
        );
        self.alert_level += 1;
        info!("timer extended by {seconds}s, alert level {}", self.alert_level);
        true
    }

    /// Extend by the configured default amount.
    pub fn extend_time_default(&mut self) -> bool {
        self.extend_time(self.config.extension_seconds)
    }

    #[must_use]
    pub fn alert_level(&self) -> u32 {
        self.alert_level
    }

    pub fn set_alert_level(&mut self, level: u32) {
        self.alert_level = level;
    }

    /// Use a crew role's power on the mounted puzzle.
    ///
    /// Returns false when nothing happened: no active puzzle, a role
    /// without a puzzle-layer power, no lock to clear, or a Lookout warning
    /// already running.
    pub fn use_power(&mut self, role: Role) -> bool {
        if self.phase() != ControllerPhase::Active {
            return false;
        }
        let slowdown = self.config.slowdown_seconds;
        let lookout_seconds = self.config.lookout_seconds;
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };

        let used = match role {
            Role::Hacker => {
                m.host.extend_time(slowdown);
                m.host.show_message(
                    &format!("Hacker slowed the security clock by {slowdown} seconds."),
                    MessageKind::Info,
                );
                true
            }
            Role::SafeCracker => m.puzzle.skip_lock(&mut m.host),
            Role::Lookout if m.lookout_expiry.is_none() => {
                m.lookout_expiry = Some(m.host.schedule(lookout_seconds));
                self.lookout_warning = true;
                m.host.show_message("The Lookout is watching the security feeds.", MessageKind::Info);
                true
            }
            Role::Lookout | Role::Demolitions => false,
        };
        if used {
            info!("{role} used their power");
        }
        self.settle();
        used
    }

    /// Give the crew early warning of random events.
    pub fn set_lookout_warning(&mut self, enabled: bool) {
        self.lookout_warning = enabled;
    }

    #[must_use]
    pub fn lookout_warning(&self) -> bool {
        self.lookout_warning
    }

    /// Deliver a random event now, bypassing the director.
    pub fn inject_event(&mut self, event: &RandomEvent, duration: u32) {
        if let Some(m) = self.mounted.as_mut() {
            m.deliver(event, duration);
        }
    }

    // === Submission ===

    /// Snapshot the answer and lock the submit control until
    /// `resolve_submit`.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitError> {
        let in_phase = self.phase();
        let m = self.mounted.as_mut().ok_or(SubmitError::NotMounted)?;
        if in_phase != ControllerPhase::Active {
            return Err(SubmitError::NotActive);
        }
        if m.submit_in_flight {
            return Err(SubmitError::InFlight);
        }
        if !m.host.submit_enabled() {
            return Err(SubmitError::Disabled);
        }
        m.host.disable_submit();
        m.submit_in_flight = true;
        Ok(m.puzzle.submission_data())
    }

    /// Route the check result back into the puzzle.
    ///
    /// A transport failure shows a retryable error and leaves the puzzle
    /// untouched. The submit control comes back unless the puzzle ended.
    pub fn resolve_submit(&mut self, result: Result<bool, TransportError>) -> Result<(), SubmitError> {
        let m = self.mounted.as_mut().ok_or(SubmitError::NotMounted)?;
        if !m.submit_in_flight {
            return Err(SubmitError::NothingPending);
        }
        m.submit_in_flight = false;

        match result {
            Ok(accepted) => m.puzzle.on_verdict(accepted, &mut m.host),
            Err(err) if m.puzzle.status().is_active() => {
                warn!("{} submission failed: {err}", m.puzzle.kind());
                m.host.show_message(TRANSPORT_ERROR_TEXT, MessageKind::Error);
            }
            Err(err) => debug!("{} submission failed after it ended: {err}", m.puzzle.kind()),
        }
        if !m.puzzle.status().is_terminal() {
            m.host.enable_submit();
        }
        self.settle();
        Ok(())
    }

    /// Run both submit phases against `checker`. Returns the resulting
    /// status.
    pub fn submit_with<C>(&mut self, checker: &mut C) -> Result<PuzzleStatus, SubmitError>
    where
        C: SolutionChecker + ?Sized,
    {
        let submission = self.begin_submit()?;
        let kind = submission.kind();
        let result = checker.check(kind, &submission);
        self.resolve_submit(result)?;
        self.puzzle()
            .map(|p| p.status())
            .ok_or(SubmitError::NotMounted)
    }

    // === Team sync ===

    /// Apply a teammate's update to the mounted puzzle.
    pub fn receive_team_update(&mut self, update: &TeamUpdate) {
        if let Some(m) = self.mounted.as_mut() {
            m.puzzle.handle_team_update(update, &mut m.host);
        }
        self.settle();
    }

    /// Decode and apply a relay payload.
    pub fn receive_team_payload(&mut self, bytes: &[u8]) -> Result<(), SyncError> {
        let update = TeamUpdate::decode(bytes)?;
        self.receive_team_update(&update);
        Ok(())
    }

    /// Take the updates the puzzle broadcast since the last call.
    pub fn drain_team_updates(&mut self) -> Vec<TeamUpdate> {
        self.mounted
            .as_mut()
            .map(|m| m.host.take_outbox())
            .unwrap_or_default()
    }

    // === Presentation ===

    /// Render the mounted puzzle.
    #[must_use]
    pub fn view(&self) -> Option<PuzzleView> {
        self.puzzle().map(|p| p.view())
    }

    /// Render the chrome.
    #[must_use]
    pub fn chrome(&self) -> ChromeView {
        let phase = self.phase();
        match &self.mounted {
            Some(m) => {
                let display = m.host.countdown().display();
                ChromeView {
                    timer_display: display,
                    urgent: display <= ChromeView::URGENT_SECONDS,
                    banner: m.host.banner().map(|b| (b.text.clone(), b.kind)),
                    submit_enabled: m.host.submit_enabled()
                        && !m.submit_in_flight
                        && phase == ControllerPhase::Active,
                    phase,
                }
            }
            None => ChromeView {
                timer_display: 0,
                urgent: false,
                banner: None,
                submit_enabled: false,
                phase,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzles::{SeedData, WireColor, TIME_UP_TEXT};

    fn keypad(code: &str) -> PuzzleController {
        let mut controller = PuzzleController::default();
        controller
            .mount(PuzzleConfig::new(PuzzleKind::Keypad).with_seed_data(SeedData::keypad(code)))
            .unwrap();
        controller
    }

    #[test]
    fn test_mount_starts_countdown() {
        let controller = keypad("4821");
        assert_eq!(controller.phase(), ControllerPhase::Active);
        assert_eq!(controller.remaining_time(), Some(90));
        assert!(controller.host().unwrap().countdown().is_running());
    }

    #[test]
    fn test_budget_shrinks_with_difficulty() {
        let mut controller = PuzzleController::default();
        controller
            .mount(PuzzleConfig::new(PuzzleKind::Wires).with_difficulty(3))
            .unwrap();
        assert_eq!(controller.remaining_time(), Some(40));

        controller
            .mount(PuzzleConfig::new(PuzzleKind::Wires).with_difficulty(10))
            .unwrap();
        assert_eq!(controller.remaining_time(), Some(30));
    }

    #[test]
    fn test_mount_rejects_bad_config() {
        let mut controller = PuzzleController::default();
        let err = controller.mount(PuzzleConfig::new(PuzzleKind::Keypad).with_difficulty(0));
        assert_eq!(err, Err(ConfigError::ZeroDifficulty));
        assert_eq!(controller.phase(), ControllerPhase::Unmounted);

        let err = controller.mount(PuzzleConfig::new(PuzzleKind::Breach));
        assert_eq!(err, Err(ConfigError::MissingRole(PuzzleKind::Breach)));
    }

    #[test]
    fn test_mount_named_fallbacks() {
        let mut controller = PuzzleController::default();
        controller
            .mount_named("laser_grid", PuzzleConfig::new(PuzzleKind::Keypad))
            .unwrap();
        assert_eq!(controller.puzzle().unwrap().kind(), PuzzleKind::Wires);

        let seeded = PuzzleConfig::new(PuzzleKind::Wires).with_seed_data(SeedData::keypad("12"));
        controller.mount_named("laser_grid", seeded).unwrap();
        assert_eq!(controller.puzzle().unwrap().kind(), PuzzleKind::Keypad);
    }

    #[test]
    fn test_expiry_fails_once() {
        let mut controller = keypad("4821");
        controller.advance(200);

        assert_eq!(controller.phase(), ControllerPhase::Failed);
        let host = controller.host().unwrap();
        assert_eq!(host.banner().unwrap().text, TIME_UP_TEXT);
        assert_eq!(host.remaining_time(), 0);
        let time_up = host.messages().filter(|b| b.text == TIME_UP_TEXT).count();
        assert_eq!(time_up, 1);
    }

    #[test]
    fn test_input_ignored_when_terminal() {
        let mut controller = keypad("1");
        controller.handle_input(&PuzzleInput::PressDigit(1));
        controller.handle_input(&PuzzleInput::Enter);
        assert_eq!(controller.phase(), ControllerPhase::Succeeded);
        assert_eq!(controller.handle_input(&PuzzleInput::PressDigit(1)), InputOutcome::Ignored);
    }

    #[test]
    fn test_transport_error_is_retryable() {
        let mut controller = keypad("4821");
        let before = controller.puzzle().unwrap().attempts();

        controller.begin_submit().unwrap();
        assert!(!controller.chrome().submit_enabled);
        assert_eq!(controller.begin_submit(), Err(SubmitError::InFlight));

        controller.resolve_submit(Err(TransportError::Timeout)).unwrap();
        let chrome = controller.chrome();
        assert!(chrome.submit_enabled);
        assert_eq!(chrome.banner.unwrap().0, TRANSPORT_ERROR_TEXT);
        assert_eq!(controller.puzzle().unwrap().attempts(), before);
        assert_eq!(controller.phase(), ControllerPhase::Active);
    }

    #[test]
    fn test_rejected_verdict_counts_attempt() {
        let mut controller = keypad("4821");
        let status = controller
            .submit_with(&mut |_: PuzzleKind, _: &Submission| -> Result<bool, TransportError> { Ok(false) })
            .unwrap();
        assert_eq!(status, PuzzleStatus::Active);
        assert_eq!(controller.puzzle().unwrap().attempts(), 1);
        assert!(controller.chrome().submit_enabled);
    }

    #[test]
    fn test_resolve_without_begin() {
        let mut controller = keypad("4821");
        assert_eq!(controller.resolve_submit(Ok(true)), Err(SubmitError::NothingPending));
        let mut empty = PuzzleController::default();
        assert_eq!(empty.begin_submit(), Err(SubmitError::NotMounted));
    }

    #[test]
    fn test_extend_time_raises_alert() {
        let mut controller = keypad("4821");
        assert!(controller.extend_time_default());
        assert_eq!(controller.remaining_time(), Some(150));
        assert_eq!(controller.alert_level(), 1);
    }

    #[test]
    fn test_unmount_clears_timers() {
        let mut controller = keypad("4821");
        controller.inject_event(&RandomEvent::SecurityPatrol, 10);
        assert_eq!(controller.host().unwrap().timers().len(), 1);

        assert_eq!(controller.unmount(), Some(PuzzleStatus::Active));
        assert!(!controller.is_mounted());
        assert_eq!(controller.unmount(), None);
    }

    #[test]
    fn test_injected_event_reverts_on_clock() {
        let mut controller = keypad("4821");
        controller.inject_event(&RandomEvent::SystemCheck, 3);
        assert_eq!(controller.handle_input(&PuzzleInput::PressDigit(4)), InputOutcome::Blocked);

        controller.advance(3);
        assert_eq!(controller.handle_input(&PuzzleInput::PressDigit(4)), InputOutcome::Accepted);
    }

    #[test]
    fn test_lookout_warning_delays_event() {
        let events = EventConfig::default().with_chance(1.0, 0.0);
        let mut controller = PuzzleController::new(ControllerConfig::default().with_events(events));
        controller.set_lookout_warning(true);
        controller
            .mount(PuzzleConfig::new(PuzzleKind::Wires).with_seed_data(SeedData::wires(
                vec![WireColor::Red; 3],
                &[0],
            )))
            .unwrap();

        // 60s budget: the roll happens when the countdown reaches 30.
        controller.advance(30);
        let banner = controller.chrome().banner.unwrap().0;
        assert!(banner.starts_with("Lookout detects"), "{banner}");
        assert!(controller.puzzle().unwrap().lifecycle().active_event().is_none());

        controller.advance(5);
        assert!(controller.puzzle().unwrap().lifecycle().active_event().is_some());
    }

    #[test]
    fn test_chrome_when_unmounted() {
        let chrome = PuzzleController::default().chrome();
        assert_eq!(chrome.phase, ControllerPhase::Unmounted);
        assert!(!chrome.submit_enabled);
        assert_eq!(chrome.timer_text(), "00:00");
    }
}
