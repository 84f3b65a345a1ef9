//! Random events: transient, auto-reverting interruptions.
//!
//! Events are injected from outside the puzzle (the mission's security
//! system). Each puzzle interprets an event as a `Handicap` for a fixed
//! duration, then reverts it automatically.
//!
//! ## Event Kinds
//!
//! - `SecurityPatrol`: locks input while the guard walks past
//! - `CameraSweep`: obscures hints while the camera pans over
//! - `SystemCheck`: locks input while the terminal reboots
//! - `Other`: open-ended; puzzles ignore kinds they do not know

mod director;

pub use director::{EventConfig, EventDirector, RolledEvent};

use serde::{Deserialize, Serialize};

/// A random event delivered to a puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RandomEvent {
    SecurityPatrol,
    CameraSweep,
    SystemCheck,
    /// An event kind this crate does not interpret.
    Other(String),
}

/// The interaction handicap a puzzle applies for an event's duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handicap {
    /// Input is rejected until the event passes.
    LockInput,
    /// Hints are hidden from the view until the event passes.
    ObscureHints,
}

impl RandomEvent {
    /// The kinds the director rolls from.
    pub const STANDARD: [RandomEvent; 3] = [
        RandomEvent::SecurityPatrol,
        RandomEvent::CameraSweep,
        RandomEvent::SystemCheck,
    ];

    /// Parse a wire identifier such as `"camera_sweep"`.
    ///
    /// Unknown identifiers become `Other`.
    #[must_use]
    pub fn parse(id: &str) -> RandomEvent {
        match id.trim() {
            "security_patrol" => RandomEvent::SecurityPatrol,
            "camera_sweep" => RandomEvent::CameraSweep,
            "system_check" => RandomEvent::SystemCheck,
            other => RandomEvent::Other(other.to_string()),
        }
    }

    /// Wire identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            RandomEvent::SecurityPatrol => "security_patrol",
            RandomEvent::CameraSweep => "camera_sweep",
            RandomEvent::SystemCheck => "system_check",
            RandomEvent::Other(id) => id,
        }
    }

    /// Title-cased name shown to players, e.g. `"Camera Sweep"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.id()
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// How puzzles interpret this event. `None` means ignore it.
    #[must_use]
    pub fn handicap(&self) -> Option<Handicap> {
        match self {
            RandomEvent::SecurityPatrol | RandomEvent::SystemCheck => Some(Handicap::LockInput),
            RandomEvent::CameraSweep => Some(Handicap::ObscureHints),
            RandomEvent::Other(_) => None,
        }
    }
}

impl std::fmt::Display for RandomEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_name())
    }
}
