//! Dispatch table from puzzle kind to constructor and tuning.
//!
//! The `PuzzleRegistry` maps each `PuzzleKind` to a factory plus the kind's
//! countdown base, attempt limit, penalty and penalty floor. The controller
//! looks kinds up here instead of switching on them.

use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{PuzzleConfig, PuzzleKind};
use crate::error::ConfigError;
use crate::puzzles::{
    AttemptPolicy, BreachPuzzle, CircuitPuzzle, DetonatorPuzzle, KeypadPuzzle, Puzzle,
    SafeDialPuzzle, VaultLockPuzzle, WirePuzzle,
};

/// Builds a puzzle instance for a config.
pub type PuzzleFactory = fn(&PuzzleConfig, AttemptPolicy) -> Box<dyn Puzzle>;

/// Per-kind tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSpec {
    /// Countdown at difficulty 1, in seconds.
    pub base_seconds: u32,

    /// Attempt limit and penalty.
    pub policy: AttemptPolicy,

    /// Lowest value a penalty can push the countdown to.
    pub floor_seconds: u32,
}

impl KindSpec {
    #[must_use]
    pub const fn new(base_seconds: u32, max_attempts: u32, penalty_seconds: u32, floor_seconds: u32) -> Self {
        Self {
            base_seconds,
            policy: AttemptPolicy::new(max_attempts, penalty_seconds),
            floor_seconds,
        }
    }

    /// Countdown budget: `max(min_budget, base - per_level × (difficulty - 1))`.
    #[must_use]
    pub fn budget(&self, difficulty: u32, per_level: u32, min_budget: u32) -> u32 {
        let deduction = per_level.saturating_mul(difficulty.saturating_sub(1));
        self.base_seconds.saturating_sub(deduction).max(min_budget)
    }
}

/// A registered kind.
#[derive(Clone, Copy, Debug)]
pub struct RegistryEntry {
    pub spec: KindSpec,
    pub factory: PuzzleFactory,
}

fn wires(config: &PuzzleConfig, policy: AttemptPolicy) -> Box<dyn Puzzle> {
    Box::new(WirePuzzle::new(config, policy))
}

fn keypad(config: &PuzzleConfig, policy: AttemptPolicy) -> Box<dyn Puzzle> {
    Box::new(KeypadPuzzle::new(config, policy))
}

fn circuit(config: &PuzzleConfig, policy: AttemptPolicy) -> Box<dyn Puzzle> {
    Box::new(CircuitPuzzle::new(config, policy))
}

fn safe_dial(config: &PuzzleConfig, policy: AttemptPolicy) -> Box<dyn Puzzle> {
    Box::new(SafeDialPuzzle::new(config, policy))
}

fn detonator(config: &PuzzleConfig, policy: AttemptPolicy) -> Box<dyn Puzzle> {
    Box::new(DetonatorPuzzle::new(config, policy))
}

fn vault_lock(config: &PuzzleConfig, policy: AttemptPolicy) -> Box<dyn Puzzle> {
    Box::new(VaultLockPuzzle::new(config, policy))
}

fn breach(config: &PuzzleConfig, policy: AttemptPolicy) -> Box<dyn Puzzle> {
    Box::new(BreachPuzzle::new(config, policy))
}

/// Registry of puzzle kinds.
///
/// ## Example
///
/// ```
/// use heist_puzzles::controller::PuzzleRegistry;
/// use heist_puzzles::core::PuzzleKind;
///
/// let registry = PuzzleRegistry::standard();
///
/// assert_eq!(registry.resolve("keypad"), PuzzleKind::Keypad);
/// // Unknown names fall back to the default kind.
/// assert_eq!(registry.resolve("laser_grid"), PuzzleKind::Wires);
///
/// let spec = registry.spec(PuzzleKind::Keypad).unwrap();
/// assert_eq!(spec.budget(3, 10, 30), 70);
/// ```
#[derive(Clone, Debug)]
pub struct PuzzleRegistry {
    entries: FxHashMap<PuzzleKind, RegistryEntry>,
    default_kind: PuzzleKind,
}

impl Default for PuzzleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PuzzleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(default_kind: PuzzleKind) -> Self {
        Self {
            entries: FxHashMap::default(),
            default_kind,
        }
    }

    /// Every built-in kind with its stock tuning. Defaults to `Wires`.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new(PuzzleKind::Wires);
        registry.register(PuzzleKind::Wires, KindSpec::new(60, 2, 10, 1), wires);
        registry.register(PuzzleKind::Keypad, KindSpec::new(90, 3, 15, 5), keypad);
        registry.register(PuzzleKind::Circuit, KindSpec::new(120, 3, 10, 5), circuit);
        registry.register(PuzzleKind::SafeDial, KindSpec::new(90, 3, 5, 1), safe_dial);
        registry.register(PuzzleKind::Detonator, KindSpec::new(75, 3, 20, 10), detonator);
        registry.register(PuzzleKind::VaultLock, KindSpec::new(180, 4, 15, 10), vault_lock);
        registry.register(PuzzleKind::Breach, KindSpec::new(150, 3, 10, 10), breach);
        registry
    }

    /// Register a kind.
    ///
    /// Panics if the kind is already registered.
    pub fn register(&mut self, kind: PuzzleKind, spec: KindSpec, factory: PuzzleFactory) {
        if self.entries.contains_key(&kind) {
            panic!("Puzzle kind {kind} already registered");
        }
        self.entries.insert(kind, RegistryEntry { spec, factory });
    }

    /// Replace a registered kind's tuning. Returns false if unregistered.
    pub fn set_spec(&mut self, kind: PuzzleKind, spec: KindSpec) -> bool {
        match self.entries.get_mut(&kind) {
            Some(entry) => {
                entry.spec = spec;
                true
            }
            None => false,
        }
    }

    /// Change the fallback kind (builder pattern).
    #[must_use]
    pub fn with_default_kind(mut self, kind: PuzzleKind) -> Self {
        self.default_kind = kind;
        self
    }

    #[must_use]
    pub fn default_kind(&self) -> PuzzleKind {
        self.default_kind
    }

    #[must_use]
    pub fn get(&self, kind: PuzzleKind) -> Option<&RegistryEntry> {
        self.entries.get(&kind)
    }

    #[must_use]
    pub fn spec(&self, kind: PuzzleKind) -> Option<KindSpec> {
        self.entries.get(&kind).map(|e| e.spec)
    }

    #[must_use]
    pub fn contains(&self, kind: PuzzleKind) -> bool {
        self.entries.contains_key(&kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered kinds, in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = PuzzleKind> + '_ {
        PuzzleKind::ALL.into_iter().filter(|k| self.entries.contains_key(k))
    }

    /// Map a textual kind to a registered kind, falling back to the default.
    pub fn resolve(&self, name: &str) -> PuzzleKind {
        match PuzzleKind::parse(name) {
            Some(kind) if self.contains(kind) => kind,
            _ => {
                warn!("unknown puzzle kind {name:?}, falling back to {}", self.default_kind);
                self.default_kind
            }
        }
    }

    /// Point `config` at a registered kind.
    ///
    /// An unregistered kind falls back to the seed data's kind when that is
    /// registered, otherwise to the default kind; seed data for any other
    /// kind is dropped. Fails only when the default is unregistered too.
    pub fn fallback(&self, mut config: PuzzleConfig) -> Result<PuzzleConfig, ConfigError> {
        if self.contains(config.kind) {
            return Ok(config);
        }
        let target = match &config.seed_data {
            Some(seed) if self.contains(seed.kind()) => seed.kind(),
            _ if self.contains(self.default_kind) => self.default_kind,
            _ => return Err(ConfigError::Unregistered(config.kind)),
        };
        warn!("puzzle kind {} is not registered, falling back to {target}", config.kind);
        config.kind = target;
        if config.seed_data.as_ref().is_some_and(|seed| seed.kind() != target) {
            config.seed_data = None;
        }
        Ok(config)
    }

    /// Build an uninitialized instance for `config`.
    pub fn build(&self, config: &PuzzleConfig) -> Result<(Box<dyn Puzzle>, KindSpec), ConfigError> {
        let entry = self
            .get(config.kind)
            .ok_or(ConfigError::Unregistered(config.kind))?;
        Ok(((entry.factory)(config, entry.spec.policy), entry.spec))
    }
}
