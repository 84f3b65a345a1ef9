//! Detonator sequencing.
//!
//! Charges must be placed in firing order. A charge out of order is a
//! misfire: every placed charge is pulled and an attempt is spent. After a
//! misfire the next charge in the sequence is revealed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AttemptPolicy, InputOutcome, Lifecycle, Puzzle, PuzzleInput, SeedData, Submission};
use crate::core::{MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng};
use crate::error::ConfigError;
use crate::host::Host;
use crate::view::{DetonatorView, PuzzleView};

/// Most charges a generated sequence has.
pub const MAX_CHARGES: usize = 7;

/// A charge slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChargeId(pub u8);

impl fmt::Display for ChargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0 + 1)
    }
}

/// Generate a firing order over `3 + difficulty` charges.
pub fn generate_order(rng: &mut PuzzleRng, difficulty: u32) -> Vec<ChargeId> {
    let count = (3 + difficulty as usize).min(MAX_CHARGES);
    let mut order: Vec<ChargeId> = (0..count as u8).map(ChargeId).collect();
    rng.shuffle(&mut order);
    order
}

/// A firing order must use each of `0..len` exactly once.
pub fn validate_order(order: &[ChargeId]) -> Result<(), ConfigError> {
    if order.is_empty() {
        return Err(ConfigError::InvalidSeed("firing order is empty".into()));
    }
    let mut sorted = order.to_vec();
    sorted.sort_unstable();
    if sorted.iter().enumerate().any(|(i, c)| usize::from(c.0) != i) {
        return Err(ConfigError::InvalidSeed(
            "firing order must use each charge exactly once".into(),
        ));
    }
    Ok(())
}

/// Detonator puzzle.
#[derive(Clone, Debug)]
pub struct DetonatorPuzzle {
    lifecycle: Lifecycle,
    difficulty: u32,
    rng: PuzzleRng,
    seed: Option<Vec<ChargeId>>,
    order: Vec<ChargeId>,
    placed: Vec<ChargeId>,
}

impl DetonatorPuzzle {
    #[must_use]
    pub fn new(config: &PuzzleConfig, policy: AttemptPolicy) -> Self {
        let seed = match &config.seed_data {
            Some(SeedData::Detonator { order }) => Some(order.clone()),
            _ => None,
        };
        Self {
            lifecycle: Lifecycle::new(
                PuzzleKind::Detonator,
                policy,
                "The charges went off early. The crew has to run.",
            ),
            difficulty: config.difficulty,
            rng: PuzzleRng::new(config.rng_seed).for_context("detonator"),
            seed,
            order: Vec::new(),
            placed: Vec::new(),
        }
    }

    /// Charges placed so far, in order.
    #[must_use]
    pub fn placed(&self) -> &[ChargeId] {
        &self.placed
    }

    fn place(&mut self, charge: ChargeId, host: &mut dyn Host) -> InputOutcome {
        if usize::from(charge.0) >= self.order.len() || self.placed.contains(&charge) {
            return InputOutcome::Rejected;
        }

        let step = self.placed.len();
        if self.order[step] != charge {
            self.placed.clear();
            return self
                .lifecycle
                .wrong_answer(&format!("Misfire on {charge}! All charges pulled."), host);
        }

        self.placed.push(charge);
        if self.placed.len() == self.order.len() {
            return self.lifecycle.succeed(host);
        }
        host.show_message(&format!("{charge} armed."), MessageKind::Info);
        InputOutcome::Accepted
    }
}

impl Puzzle for DetonatorPuzzle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn initialize(&mut self, host: &mut dyn Host) {
        self.order = match self.seed.take() {
            Some(order) => order,
            None => generate_order(&mut self.rng, self.difficulty),
        };
        self.lifecycle.activate(host);
    }

    fn handle_input(&mut self, input: &PuzzleInput, host: &mut dyn Host) -> InputOutcome {
        if !matches!(input, PuzzleInput::PlaceCharge(_) | PuzzleInput::ResetCharges) {
            return InputOutcome::Ignored;
        }
        if let Err(outcome) = self.lifecycle.admit(host) {
            return outcome;
        }
        match *input {
            PuzzleInput::PlaceCharge(charge) => self.place(charge, host),
            _ => {
                self.placed.clear();
                InputOutcome::Accepted
            }
        }
    }

    fn submission_data(&self) -> Submission {
        Submission::Detonator {
            placed: self.placed.clone(),
        }
    }

    fn solution(&self) -> Option<SeedData> {
        (!self.order.is_empty()).then(|| SeedData::Detonator {
            order: self.order.clone(),
        })
    }

    fn view(&self) -> PuzzleView {
        let header = self.lifecycle.header();
        let revealed = header.attempts > 0 && !header.hints_obscured;
        let mut charges = self.order.clone();
        charges.sort_unstable();
        PuzzleView::Detonator(DetonatorView {
            charges,
            placed: self.placed.clone(),
            next_hint: self
                .order
                .get(self.placed.len())
                .copied()
                .filter(|_| revealed && header.status.is_active()),
            header,
        })
    }
}
