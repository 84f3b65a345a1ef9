//! Puzzle instances and the lifecycle contract.
//!
//! Every puzzle kind implements `Puzzle`. The controller depends only on the
//! trait, never on a concrete kind.
//!
//! ## Lifecycle
//!
//! `initialize → handle_input* → {Succeeded | Failed} → cleanup`
//!
//! - `initialize` generates the secret (or adopts seed data) and starts the
//!   countdown through the host.
//! - Input handlers validate against the current status, mutate state, give
//!   feedback and re-check win/lose before returning.
//! - `cleanup` cancels every timer the instance scheduled.
//!
//! Shared bookkeeping (status, attempts, penalties, handicaps) lives in
//! `Lifecycle`; the trait's default methods delegate to it.

pub mod breach;
pub mod circuit;
pub mod detonator;
pub mod keypad;
pub mod lifecycle;
pub mod safe_dial;
pub mod vault;
pub mod wires;

pub use breach::BreachPuzzle;
pub use circuit::{Cell, CircuitLayout, CircuitPuzzle};
pub use detonator::{ChargeId, DetonatorPuzzle};
pub use keypad::KeypadPuzzle;
pub use lifecycle::{AttemptPolicy, Lifecycle, TIME_UP_TEXT};
pub use safe_dial::{DialCombination, SafeDialPuzzle};
pub use vault::{VaultLockPuzzle, VaultStep};
pub use wires::{WireColor, WireLayout, WirePuzzle};

use serde::{Deserialize, Serialize};

use crate::core::{PuzzleKind, PuzzleStatus, Role, RoleMap};
use crate::error::ConfigError;
use crate::events::RandomEvent;
use crate::host::{Host, TimerHandle};
use crate::team::{TeamState, TeamUpdate};
use crate::view::PuzzleView;

/// A player input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleInput {
    /// Cut wire at index.
    CutWire(usize),
    /// Press a keypad digit (0-9).
    PressDigit(u8),
    /// Delete the last keypad digit.
    Backspace,
    /// Clear the keypad entry.
    ClearEntry,
    /// Submit the keypad entry.
    Enter,
    /// Turn a dial by a number of clicks (negative is counter-clockwise).
    TurnDial(i32),
    /// Confirm the dial's current value.
    ConfirmDial,
    /// Click a circuit cell.
    ClickCell(Cell),
    /// Start the circuit path over.
    ResetPath,
    /// Place a charge.
    PlaceCharge(ChargeId),
    /// Remove all placed charges.
    ResetCharges,
    /// Share this role's key fragment with the crew.
    ShareKey,
    /// Toggle this role's ready flag.
    ToggleReady,
}

/// What an input did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputOutcome {
    /// Puzzle not active, or the input does not apply to this kind.
    Ignored,
    /// A transient event is locking input.
    Blocked,
    /// Invalid move; state unchanged.
    Rejected,
    /// Progress made.
    Accepted,
    /// Wrong answer; attempt counted and time deducted.
    Penalized,
    /// The puzzle was solved by this input.
    Solved,
    /// The puzzle was lost by this input.
    Failed,
}

impl InputOutcome {
    /// Whether the input changed puzzle state.
    #[must_use]
    pub const fn changed_state(self) -> bool {
        matches!(
            self,
            InputOutcome::Accepted | InputOutcome::Penalized | InputOutcome::Solved | InputOutcome::Failed
        )
    }
}

/// Snapshot of the player's current answer, for external validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    Wires { cut: Vec<usize> },
    Keypad { entry: String },
    Circuit { path: Vec<Cell> },
    SafeDial { confirmed: Vec<u32> },
    Detonator { placed: Vec<ChargeId> },
    VaultLock { entered: Vec<VaultStep> },
    Breach { shared: Vec<(Role, String)>, ready: Vec<Role> },
}

impl Submission {
    /// The puzzle kind this answer is for.
    #[must_use]
    pub fn kind(&self) -> PuzzleKind {
        match self {
            Submission::Wires { .. } => PuzzleKind::Wires,
            Submission::Keypad { .. } => PuzzleKind::Keypad,
            Submission::Circuit { .. } => PuzzleKind::Circuit,
            Submission::SafeDial { .. } => PuzzleKind::SafeDial,
            Submission::Detonator { .. } => PuzzleKind::Detonator,
            Submission::VaultLock { .. } => PuzzleKind::VaultLock,
            Submission::Breach { .. } => PuzzleKind::Breach,
        }
    }
}

/// Pre-generated puzzle content, used verbatim instead of random generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedData {
    Wires(WireLayout),
    Keypad { code: String },
    Circuit(CircuitLayout),
    SafeDial(DialCombination),
    Detonator { order: Vec<ChargeId> },
    VaultLock { steps: Vec<VaultStep> },
    Breach { fragments: RoleMap<String> },
}

impl SeedData {
    /// Seed a wire layout.
    #[must_use]
    pub fn wires(colors: Vec<WireColor>, correct: &[usize]) -> Self {
        SeedData::Wires(WireLayout::new(colors, correct))
    }

    /// Seed a disarm code.
    #[must_use]
    pub fn keypad(code: impl Into<String>) -> Self {
        SeedData::Keypad { code: code.into() }
    }

    /// Seed a vault dial sequence.
    #[must_use]
    pub fn vault(steps: &[(Role, u32)]) -> Self {
        SeedData::VaultLock {
            steps: steps.iter().map(|&(role, value)| VaultStep { role, value }).collect(),
        }
    }

    /// The puzzle kind this seed configures.
    #[must_use]
    pub fn kind(&self) -> PuzzleKind {
        match self {
            SeedData::Wires(_) => PuzzleKind::Wires,
            SeedData::Keypad { .. } => PuzzleKind::Keypad,
            SeedData::Circuit(_) => PuzzleKind::Circuit,
            SeedData::SafeDial(_) => PuzzleKind::SafeDial,
            SeedData::Detonator { .. } => PuzzleKind::Detonator,
            SeedData::VaultLock { .. } => PuzzleKind::VaultLock,
            SeedData::Breach { .. } => PuzzleKind::Breach,
        }
    }

    /// Check the content is structurally usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            SeedData::Wires(layout) => layout.validate(),
            SeedData::Keypad { code } => keypad::parse_code(code).map(|_| ()),
            SeedData::Circuit(layout) => layout.validate(),
            SeedData::SafeDial(combination) => combination.validate(),
            SeedData::Detonator { order } => detonator::validate_order(order),
            SeedData::VaultLock { steps } => vault::validate_steps(steps),
            SeedData::Breach { fragments } => breach::validate_fragments(fragments),
        }
    }
}

/// The puzzle lifecycle contract.
pub trait Puzzle {
    /// Shared lifecycle bookkeeping.
    fn lifecycle(&self) -> &Lifecycle;

    /// Shared lifecycle bookkeeping, mutable.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Generate or adopt the secret and start the countdown.
    ///
    /// Call once per instance.
    fn initialize(&mut self, host: &mut dyn Host);

    /// Apply a player input.
    fn handle_input(&mut self, input: &PuzzleInput, host: &mut dyn Host) -> InputOutcome;

    /// Snapshot of the current answer. Partial or empty before completion.
    fn submission_data(&self) -> Submission;

    /// The secret in seed form, once generated.
    fn solution(&self) -> Option<SeedData>;

    /// Render the current state.
    fn view(&self) -> PuzzleView;

    // === Provided Methods ===

    /// The puzzle kind.
    fn kind(&self) -> PuzzleKind {
        self.lifecycle().kind()
    }

    /// Current status.
    fn status(&self) -> PuzzleStatus {
        self.lifecycle().status()
    }

    /// Wrong answers so far.
    fn attempts(&self) -> u32 {
        self.lifecycle().attempts()
    }

    /// Apply a transient handicap for `duration` seconds.
    fn handle_random_event(&mut self, event: &RandomEvent, duration: u32, host: &mut dyn Host) {
        self.lifecycle_mut().apply_event(event, duration, host);
    }

    /// A timer this instance scheduled has fired.
    fn on_timer(&mut self, handle: TimerHandle, host: &mut dyn Host) {
        self.lifecycle_mut().on_timer(handle, host);
    }

    /// The countdown reached zero.
    fn on_time_expired(&mut self, host: &mut dyn Host) {
        self.lifecycle_mut().expire(host);
    }

    /// The external solution check answered.
    fn on_verdict(&mut self, accepted: bool, host: &mut dyn Host) {
        if !self.status().is_active() {
            return;
        }
        if accepted {
            self.lifecycle_mut().succeed(host);
        } else {
            self.lifecycle_mut()
                .wrong_answer("The crew's uplink rejected that answer.", host);
        }
    }

    /// Clear the next lock as if it had been solved. Returns false when the
    /// puzzle has no lock left to clear.
    fn skip_lock(&mut self, _host: &mut dyn Host) -> bool {
        false
    }

    /// A teammate's update arrived. Solo puzzles ignore it.
    fn handle_team_update(&mut self, _update: &TeamUpdate, _host: &mut dyn Host) {}

    /// This instance's copy of the team state, for team puzzles.
    fn team_state(&self) -> Option<&TeamState> {
        None
    }

    /// Cancel every timer this instance owns.
    fn cleanup(&mut self, host: &mut dyn Host) {
        self.lifecycle_mut().cleanup(host);
    }
}
