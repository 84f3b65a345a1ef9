//! Random event director.
//!
//! Rolls for a security event at fixed countdown intervals. The chance grows
//! with the mission's alert level.

use serde::{Deserialize, Serialize};

use super::RandomEvent;
use crate::core::PuzzleRng;

/// Random event tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Roll whenever the countdown is a positive multiple of this.
    pub interval_seconds: u32,

    /// Chance of an event at alert level 0.
    pub base_chance: f64,

    /// Extra chance per alert level.
    pub chance_per_alert: f64,

    /// Shortest event duration in seconds.
    pub min_duration: u32,

    /// Longest event duration in seconds.
    pub max_duration: u32,

    /// Seconds of notice given when the Lookout's early warning is active.
    pub warning_lead: u32,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 30,
            base_chance: 0.2,
            chance_per_alert: 0.1,
            min_duration: 5,
            max_duration: 15,
            warning_lead: 5,
        }
    }
}

impl EventConfig {
    /// Set the roll chance parameters.
    #[must_use]
    pub fn with_chance(mut self, base: f64, per_alert: f64) -> Self {
        self.base_chance = base;
        self.chance_per_alert = per_alert;
        self
    }

    /// Set the duration range (inclusive).
    #[must_use]
    pub fn with_duration(mut self, min: u32, max: u32) -> Self {
        self.min_duration = min;
        self.max_duration = max.max(min);
        self
    }
}

/// An event the director decided to fire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RolledEvent {
    pub event: RandomEvent,
    pub duration: u32,
}

/// Decides when random events fire.
#[derive(Clone, Debug)]
pub struct EventDirector {
    config: EventConfig,
    rng: PuzzleRng,
}

impl EventDirector {
    /// Create a director with its own RNG stream.
    #[must_use]
    pub fn new(config: EventConfig, rng: PuzzleRng) -> Self {
        Self { config, rng }
    }

    /// The tuning in use.
    #[must_use]
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// Whether a roll happens at this countdown value.
    #[must_use]
    pub fn is_due(&self, remaining: i64) -> bool {
        let interval = i64::from(self.config.interval_seconds);
        interval > 0 && remaining > 0 && remaining % interval == 0
    }

    /// Probability of an event at `alert_level`, clamped to 1.0.
    #[must_use]
    pub fn chance(&self, alert_level: u32) -> f64 {
        (self.config.base_chance + self.config.chance_per_alert * f64::from(alert_level)).clamp(0.0, 1.0)
    }

    /// Roll for an event.
    pub fn roll(&mut self, alert_level: u32) -> Option<RolledEvent> {
        if !self.rng.gen_bool(self.chance(alert_level)) {
            return None;
        }
        let event = self.rng.choose(&RandomEvent::STANDARD)?.clone();
        let duration = self
            .rng
            .gen_range_inclusive(self.config.min_duration..=self.config.max_duration.max(self.config.min_duration));
        Some(RolledEvent { event, duration })
    }
}
