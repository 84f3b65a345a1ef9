//! Safe dial.
//!
//! A combination dial numbered 0-99. The player turns the dial and confirms
//! each tumbler in order; a confirmed value counts when it is within the
//! tolerance of the tumbler's target. A miss resets every tumbler.

use serde::{Deserialize, Serialize};

use super::{AttemptPolicy, InputOutcome, Lifecycle, Puzzle, PuzzleInput, SeedData, Submission};
use crate::core::{MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng};
use crate::error::ConfigError;
use crate::host::Host;
use crate::view::{PuzzleView, SafeDialView};

/// Positions on the dial.
pub const DIAL_SIZE: u32 = 100;

/// Most tumblers a generated combination has.
pub const MAX_TUMBLERS: usize = 5;

/// Circular distance between two dial positions.
#[must_use]
pub fn dial_distance(a: u32, b: u32) -> u32 {
    let d = a.abs_diff(b) % DIAL_SIZE;
    d.min(DIAL_SIZE - d)
}

/// Tumbler targets and the slack allowed on each.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialCombination {
    pub targets: Vec<u32>,
    pub tolerance: u32,
}

impl DialCombination {
    /// Generate `2 + difficulty / 2` targets with a tolerance that shrinks
    /// from 2 to 0 as difficulty rises.
    pub fn generate(rng: &mut PuzzleRng, difficulty: u32) -> Self {
        let count = (2 + difficulty as usize / 2).min(MAX_TUMBLERS);
        Self {
            targets: (0..count).map(|_| rng.gen_range(0..DIAL_SIZE)).collect(),
            tolerance: 3u32.saturating_sub(difficulty),
        }
    }

    /// Whether `value` opens tumbler `step`.
    #[must_use]
    pub fn accepts(&self, step: usize, value: u32) -> bool {
        self.targets
            .get(step)
            .is_some_and(|&target| dial_distance(target, value) <= self.tolerance)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::InvalidSeed("dial combination is empty".into()));
        }
        if self.targets.iter().any(|&t| t >= DIAL_SIZE) {
            return Err(ConfigError::InvalidSeed(format!(
                "dial targets must be below {DIAL_SIZE}"
            )));
        }
        if self.tolerance >= DIAL_SIZE / 2 {
            return Err(ConfigError::InvalidSeed("dial tolerance accepts everything".into()));
        }
        Ok(())
    }
}

/// Safe dial puzzle.
#[derive(Clone, Debug)]
pub struct SafeDialPuzzle {
    lifecycle: Lifecycle,
    difficulty: u32,
    rng: PuzzleRng,
    seed: Option<DialCombination>,
    combination: Option<DialCombination>,
    dial: u32,
    confirmed: Vec<u32>,
}

impl SafeDialPuzzle {
    #[must_use]
    pub fn new(config: &PuzzleConfig, policy: AttemptPolicy) -> Self {
        let seed = match &config.seed_data {
            Some(SeedData::SafeDial(combination)) => Some(combination.clone()),
            _ => None,
        };
        Self {
            lifecycle: Lifecycle::new(
                PuzzleKind::SafeDial,
                policy,
                "The safe's relocker fired. It won't open now.",
            ),
            difficulty: config.difficulty,
            rng: PuzzleRng::new(config.rng_seed).for_context("safe_dial"),
            seed,
            combination: None,
            dial: 0,
            confirmed: Vec::new(),
        }
    }

    /// Current dial position.
    #[must_use]
    pub fn dial(&self) -> u32 {
        self.dial
    }

    fn turn(&mut self, clicks: i32, host: &mut dyn Host) -> InputOutcome {
        let position = (i64::from(self.dial) + i64::from(clicks)).rem_euclid(i64::from(DIAL_SIZE));
        self.dial = position as u32;

        let near = self
            .combination
            .as_ref()
            .is_some_and(|c| c.accepts(self.confirmed.len(), self.dial));
        if near && !self.lifecycle.hints_obscured() {
            host.show_message("You feel the tumbler catch.", MessageKind::Info);
        }
        InputOutcome::Accepted
    }

    fn confirm(&mut self, host: &mut dyn Host) -> InputOutcome {
        let Some(combination) = &self.combination else {
            return InputOutcome::Ignored;
        };
        let step = self.confirmed.len();
        if !combination.accepts(step, self.dial) {
            self.confirmed.clear();
            return self
                .lifecycle
                .wrong_answer("The tumblers slip back. Start over.", host);
        }

        self.confirmed.push(self.dial);
        let left = combination.targets.len() - self.confirmed.len();
        if left == 0 {
            return self.lifecycle.succeed(host);
        }
        host.show_message(
            &format!("Tumbler {} set. {left} remaining.", step + 1),
            MessageKind::Info,
        );
        InputOutcome::Accepted
    }
}

impl Puzzle for SafeDialPuzzle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn initialize(&mut self, host: &mut dyn Host) {
        let combination = match self.seed.take() {
            Some(combination) => combination,
            None => DialCombination::generate(&mut self.rng, self.difficulty),
        };
        self.combination = Some(combination);
        self.lifecycle.activate(host);
    }

    fn handle_input(&mut self, input: &PuzzleInput, host: &mut dyn Host) -> InputOutcome {
        if !matches!(input, PuzzleInput::TurnDial(_) | PuzzleInput::ConfirmDial) {
            return InputOutcome::Ignored;
        }
        if let Err(outcome) = self.lifecycle.admit(host) {
            return outcome;
        }
        match *input {
            PuzzleInput::TurnDial(clicks) => self.turn(clicks, host),
            _ => self.confirm(host),
        }
    }

    /// Sets the next tumbler to its target and confirms it.
    fn skip_lock(&mut self, host: &mut dyn Host) -> bool {
        if !self.lifecycle.is_active() {
            return false;
        }
        let step = self.confirmed.len();
        let Some(target) = self.combination.as_ref().and_then(|c| c.targets.get(step).copied()) else {
            return false;
        };
        self.dial = target;
        self.confirm(host).changed_state()
    }

    fn submission_data(&self) -> Submission {
        Submission::SafeDial {
            confirmed: self.confirmed.clone(),
        }
    }

    fn solution(&self) -> Option<SeedData> {
        self.combination.clone().map(SeedData::SafeDial)
    }

    fn view(&self) -> PuzzleView {
        let header = self.lifecycle.header();
        PuzzleView::SafeDial(SafeDialView {
            dial: self.dial,
            tumblers: self.combination.as_ref().map_or(0, |c| c.targets.len()),
            unlocked: self.confirmed.len(),
            tolerance: self
                .combination
                .as_ref()
                .filter(|_| !header.hints_obscured)
                .map(|c| c.tolerance),
            header,
        })
    }
}
