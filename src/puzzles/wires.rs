//! Wire cutting.
//!
//! A bank of colored wires, some of which must be cut. Cutting every correct
//! wire disarms the device; cutting any other wire costs an attempt and
//! time.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{AttemptPolicy, InputOutcome, Lifecycle, Puzzle, PuzzleInput, SeedData, Submission};
use crate::core::{MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng};
use crate::error::ConfigError;
use crate::host::Host;
use crate::view::{PuzzleView, WireView, WiresView};

/// Most wires a generated layout has.
pub const MAX_WIRES: usize = 8;

/// Wire insulation color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireColor {
    Red,
    Blue,
    Yellow,
    Green,
    White,
    Black,
}

impl WireColor {
    pub const ALL: [WireColor; 6] = [
        WireColor::Red,
        WireColor::Blue,
        WireColor::Yellow,
        WireColor::Green,
        WireColor::White,
        WireColor::Black,
    ];
}

/// A wire bank and the wires that must be cut.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLayout {
    pub colors: Vec<WireColor>,
    /// Indices to cut, ascending.
    pub correct: SmallVec<[usize; 4]>,
}

impl WireLayout {
    /// Create a layout. `correct` is sorted and deduplicated.
    #[must_use]
    pub fn new(colors: Vec<WireColor>, correct: &[usize]) -> Self {
        let mut correct: SmallVec<[usize; 4]> = correct.iter().copied().collect();
        correct.sort_unstable();
        correct.dedup();
        Self { colors, correct }
    }

    /// Generate a layout: `3 + difficulty` wires (at most `MAX_WIRES`), of
    /// which `1 + difficulty / 2` must be cut, always leaving one intact.
    pub fn generate(rng: &mut PuzzleRng, difficulty: u32) -> Self {
        let count = (3 + difficulty as usize).min(MAX_WIRES);
        let colors = (0..count)
            .map(|_| rng.choose(&WireColor::ALL).copied().unwrap_or(WireColor::Red))
            .collect();
        let to_cut = (1 + difficulty as usize / 2).min(count - 1);
        let correct = rng.sample_indices(count, to_cut).into_iter().collect();
        Self { colors, correct }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        self.correct.contains(&index)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::InvalidSeed("wire layout has no wires".into()));
        }
        if self.correct.is_empty() {
            return Err(ConfigError::InvalidSeed("wire layout has nothing to cut".into()));
        }
        if let Some(&bad) = self.correct.iter().find(|&&i| i >= self.colors.len()) {
            return Err(ConfigError::InvalidSeed(format!(
                "wire {bad} is out of range for {} wires",
                self.colors.len()
            )));
        }
        if self.correct.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::InvalidSeed(
                "wire indices must be ascending and distinct".into(),
            ));
        }
        Ok(())
    }
}

/// Wire cutting puzzle.
#[derive(Clone, Debug)]
pub struct WirePuzzle {
    lifecycle: Lifecycle,
    difficulty: u32,
    rng: PuzzleRng,
    seed: Option<WireLayout>,
    layout: Option<WireLayout>,
    cut: Vec<bool>,
    cut_order: Vec<usize>,
}

impl WirePuzzle {
    /// Create from a config. Foreign seed data is ignored.
    #[must_use]
    pub fn new(config: &PuzzleConfig, policy: AttemptPolicy) -> Self {
        let seed = match &config.seed_data {
            Some(SeedData::Wires(layout)) => Some(layout.clone()),
            _ => None,
        };
        Self {
            lifecycle: Lifecycle::new(
                PuzzleKind::Wires,
                policy,
                "Too many wrong cuts. The device detonated.",
            ),
            difficulty: config.difficulty,
            rng: PuzzleRng::new(config.rng_seed).for_context("wires"),
            seed,
            layout: None,
            cut: Vec::new(),
            cut_order: Vec::new(),
        }
    }

    /// The layout, once initialized.
    #[must_use]
    pub fn layout(&self) -> Option<&WireLayout> {
        self.layout.as_ref()
    }

    fn remaining(&self, layout: &WireLayout) -> usize {
        layout.correct.iter().filter(|&&i| !self.cut[i]).count()
    }
}

impl Puzzle for WirePuzzle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn initialize(&mut self, host: &mut dyn Host) {
        let layout = match self.seed.take() {
            Some(layout) => layout,
            None => WireLayout::generate(&mut self.rng, self.difficulty),
        };
        self.cut = vec![false; layout.len()];
        self.layout = Some(layout);
        self.lifecycle.activate(host);
    }

    fn handle_input(&mut self, input: &PuzzleInput, host: &mut dyn Host) -> InputOutcome {
        let PuzzleInput::CutWire(index) = *input else {
            return InputOutcome::Ignored;
        };
        if let Err(outcome) = self.lifecycle.admit(host) {
            return outcome;
        }
        let Some(layout) = self.layout.clone() else {
            return InputOutcome::Ignored;
        };

        if index >= layout.len() {
            host.show_message(&format!("There is no wire {}.", index + 1), MessageKind::Warning);
            return InputOutcome::Rejected;
        }
        if self.cut[index] {
            host.show_message("That wire is already cut.", MessageKind::Warning);
            return InputOutcome::Rejected;
        }

        self.cut[index] = true;
        self.cut_order.push(index);

        if !layout.is_correct(index) {
            return self
                .lifecycle
                .wrong_answer("Wrong wire! The timer lurches forward.", host);
        }
        match self.remaining(&layout) {
            0 => self.lifecycle.succeed(host),
            left => {
                host.show_message(&format!("Clean cut. {left} to go."), MessageKind::Info);
                InputOutcome::Accepted
            }
        }
    }

    fn submission_data(&self) -> Submission {
        Submission::Wires {
            cut: self.cut_order.clone(),
        }
    }

    fn solution(&self) -> Option<SeedData> {
        self.layout.clone().map(SeedData::Wires)
    }

    fn view(&self) -> PuzzleView {
        let header = self.lifecycle.header();
        let (wires, remaining) = match &self.layout {
            Some(layout) => (
                layout
                    .colors
                    .iter()
                    .zip(&self.cut)
                    .map(|(&color, &cut)| WireView { color, cut })
                    .collect(),
                Some(self.remaining(layout)),
            ),
            None => (Vec::new(), None),
        };
        PuzzleView::Wires(WiresView {
            remaining_to_cut: remaining.filter(|_| !header.hints_obscured),
            header,
            wires,
        })
    }
}
