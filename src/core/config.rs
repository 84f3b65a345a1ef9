//! Puzzle configuration types.
//!
//! Every mounted puzzle is described by a `PuzzleConfig`:
//! - `PuzzleKind`: which variant to run
//! - `difficulty`: scales secret length, time budget and tolerance
//! - `seed_data`: optional pre-generated content, used verbatim
//! - `rng_seed`: seed for generated content (shared across a crew)
//! - `role`: the local crew member, required for team puzzles
//! - `required_roles`: the crew a team puzzle waits on (all four by default)
//!
//! The config is immutable for the instance's life.

use serde::{Deserialize, Serialize};

use super::Role;
use crate::error::ConfigError;
use crate::puzzles::SeedData;

/// Puzzle variant identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PuzzleKind {
    /// Cut the right wires (Demolitions).
    Wires,
    /// Enter the disarm code (Safe Cracker).
    Keypad,
    /// Trace the circuit path (Hacker).
    Circuit,
    /// Crack the combination dial (Safe Cracker).
    SafeDial,
    /// Place charges in firing order (Demolitions).
    Detonator,
    /// Team: turn-ordered vault dial, one step per role.
    VaultLock,
    /// Team: share key fragments, then everyone signals ready.
    Breach,
}

impl PuzzleKind {
    /// Every kind, in registry order.
    pub const ALL: [PuzzleKind; 7] = [
        PuzzleKind::Wires,
        PuzzleKind::Keypad,
        PuzzleKind::Circuit,
        PuzzleKind::SafeDial,
        PuzzleKind::Detonator,
        PuzzleKind::VaultLock,
        PuzzleKind::Breach,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PuzzleKind::Wires => "wires",
            PuzzleKind::Keypad => "keypad",
            PuzzleKind::Circuit => "circuit",
            PuzzleKind::SafeDial => "safe_dial",
            PuzzleKind::Detonator => "detonator",
            PuzzleKind::VaultLock => "vault_lock",
            PuzzleKind::Breach => "breach",
        }
    }

    /// Parse a kind from its canonical name or a known alias.
    ///
    /// Returns `None` for unrecognized names; callers that must not fail
    /// (the controller) fall back to their default kind.
    ///
    /// ```
    /// use heist_puzzles::core::PuzzleKind;
    ///
    /// assert_eq!(PuzzleKind::parse("wire_cutting"), Some(PuzzleKind::Wires));
    /// assert_eq!(PuzzleKind::parse("Safe-Dial"), Some(PuzzleKind::SafeDial));
    /// assert_eq!(PuzzleKind::parse("laser_grid"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<PuzzleKind> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "wires" | "wire" | "wire_cutting" | "bomb_wires" => Some(PuzzleKind::Wires),
            "keypad" | "code" | "disarm_code" | "password_crack" => Some(PuzzleKind::Keypad),
            "circuit" | "circuit_board" => Some(PuzzleKind::Circuit),
            "safe_dial" | "dial" | "combination" | "safe" => Some(PuzzleKind::SafeDial),
            "detonator" | "explosive_sequence" | "sequence" => Some(PuzzleKind::Detonator),
            "vault_lock" | "vault" | "team_vault" => Some(PuzzleKind::VaultLock),
            "breach" | "team_breach" | "key_share" => Some(PuzzleKind::Breach),
            _ => None,
        }
    }

    /// True for puzzles synchronized across the crew.
    #[must_use]
    pub const fn is_team(self) -> bool {
        matches!(self, PuzzleKind::VaultLock | PuzzleKind::Breach)
    }
}

impl std::fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration of one puzzle instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Which puzzle variant to run.
    pub kind: PuzzleKind,

    /// Difficulty level, starting at 1.
    pub difficulty: u32,

    /// Pre-generated content. When present it replaces random generation.
    pub seed_data: Option<SeedData>,

    /// Seed for generated content.
    ///
    /// Team puzzles rely on every crew member using the same seed so that
    /// their independently generated secrets agree.
    pub rng_seed: u64,

    /// The local crew member. Required for team puzzles.
    pub role: Option<Role>,

    /// Roles a team puzzle needs. `None` means the whole crew.
    #[serde(default)]
    pub required_roles: Option<Vec<Role>>,
}

impl PuzzleConfig {
    /// Create a difficulty-1 config with no seed data.
    pub fn new(kind: PuzzleKind) -> Self {
        Self {
            kind,
            difficulty: 1,
            seed_data: None,
            rng_seed: 0,
            role: None,
            required_roles: None,
        }
    }

    /// Set the difficulty level.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Supply pre-generated content.
    #[must_use]
    pub fn with_seed_data(mut self, seed: SeedData) -> Self {
        self.seed_data = Some(seed);
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Set the local crew role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Restrict a team puzzle to a subset of the crew.
    #[must_use]
    pub fn with_required_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles = Some(roles.into_iter().collect());
        self
    }

    /// Roles a team puzzle waits on, in crew order and without repeats.
    #[must_use]
    pub fn crew(&self) -> Vec<Role> {
        match &self.required_roles {
            Some(roles) => Role::all().filter(|r| roles.contains(r)).collect(),
            None => Role::ALL.to_vec(),
        }
    }

    /// Local role, defaulting to the Hacker for solo puzzles mounted
    /// without one.
    #[must_use]
    pub fn role_or_default(&self) -> Role {
        self.role.unwrap_or(Role::Hacker)
    }

    /// Check the config can configure a puzzle of `self.kind`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty == 0 {
            return Err(ConfigError::ZeroDifficulty);
        }
        if self.kind.is_team() && self.role.is_none() {
            return Err(ConfigError::MissingRole(self.kind));
        }
        if self.required_roles.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::EmptyCrew);
        }
        if let Some(seed) = &self.seed_data {
            if seed.kind() != self.kind {
                return Err(ConfigError::SeedKindMismatch {
                    kind: self.kind,
                    seed: seed.kind(),
                });
            }
            seed.validate()?;
            if let (Some(_), SeedData::VaultLock { steps }) = (&self.required_roles, seed) {
                let mut named: Vec<Role> = steps.iter().map(|s| s.role).collect();
                named.sort_by_key(|r| r.index());
                if named != self.crew() {
                    return Err(ConfigError::InvalidSeed(
                        "vault turn order must name every required role".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}
