//! Render models.
//!
//! Views are plain data: the host renders them however it likes. Hints are
//! left out (`None` or empty) while a camera sweep is obscuring them.

use serde::{Deserialize, Serialize};

use crate::controller::ControllerPhase;
use crate::core::{MessageKind, PuzzleKind, PuzzleStatus, Role, RoleMap};
use crate::events::RandomEvent;
use crate::puzzles::{Cell, ChargeId, WireColor};
use crate::team::TeamPhase;

/// Fields every puzzle view shares.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleHeader {
    pub kind: PuzzleKind,
    pub status: PuzzleStatus,
    pub attempts: u32,
    pub max_attempts: u32,
    pub event: Option<RandomEvent>,
    pub input_locked: bool,
    pub hints_obscured: bool,
}

impl PuzzleHeader {
    /// Attempts left before failing, if limited.
    #[must_use]
    pub fn attempts_left(&self) -> Option<u32> {
        (self.max_attempts > 0).then(|| self.max_attempts.saturating_sub(self.attempts))
    }
}

/// One wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireView {
    pub color: WireColor,
    pub cut: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WiresView {
    pub header: PuzzleHeader,
    pub wires: Vec<WireView>,
    /// Correct wires still uncut.
    pub remaining_to_cut: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeypadView {
    pub header: PuzzleHeader,
    pub code_length: usize,
    pub entry: String,
    /// Digits in the right place on the last wrong code.
    pub last_match: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircuitView {
    pub header: PuzzleHeader,
    pub grid_size: u8,
    pub start: Cell,
    pub end: Cell,
    pub barriers: Vec<Cell>,
    /// Cells the route must pass through.
    pub switches: Vec<Cell>,
    pub path: Vec<Cell>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafeDialView {
    pub header: PuzzleHeader,
    pub dial: u32,
    pub tumblers: usize,
    pub unlocked: usize,
    /// How close the dial must be to count.
    pub tolerance: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetonatorView {
    pub header: PuzzleHeader,
    pub charges: Vec<ChargeId>,
    pub placed: Vec<ChargeId>,
    /// The next charge, revealed after a misfire.
    pub next_hint: Option<ChargeId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VaultLockView {
    pub header: PuzzleHeader,
    pub role: Role,
    pub dial: u32,
    pub steps_total: usize,
    pub steps_done: usize,
    /// Whose turn it is; `None` once every step is entered.
    pub turn: Option<Role>,
    pub phase: TeamPhase,
}

impl VaultLockView {
    /// Whether the local crew member may enter a value.
    #[must_use]
    pub fn my_turn(&self) -> bool {
        self.turn == Some(self.role)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreachView {
    pub header: PuzzleHeader,
    pub role: Role,
    pub fragment: Option<String>,
    pub shared: RoleMap<bool>,
    pub ready: RoleMap<bool>,
    pub phase: TeamPhase,
}

/// A rendered puzzle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PuzzleView {
    Wires(WiresView),
    Keypad(KeypadView),
    Circuit(CircuitView),
    SafeDial(SafeDialView),
    Detonator(DetonatorView),
    VaultLock(VaultLockView),
    Breach(BreachView),
}

impl PuzzleView {
    /// The shared header.
    #[must_use]
    pub fn header(&self) -> &PuzzleHeader {
        match self {
            PuzzleView::Wires(v) => &v.header,
            PuzzleView::Keypad(v) => &v.header,
            PuzzleView::Circuit(v) => &v.header,
            PuzzleView::SafeDial(v) => &v.header,
            PuzzleView::Detonator(v) => &v.header,
            PuzzleView::VaultLock(v) => &v.header,
            PuzzleView::Breach(v) => &v.header,
        }
    }
}

/// Chrome around the mounted puzzle: timer, banner and submit control.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChromeView {
    /// Seconds shown, never negative.
    pub timer_display: u32,
    /// Ten seconds or less remain.
    pub urgent: bool,
    pub banner: Option<(String, MessageKind)>,
    pub submit_enabled: bool,
    pub phase: ControllerPhase,
}

impl ChromeView {
    /// Threshold for the urgent timer style.
    pub const URGENT_SECONDS: u32 = 10;

    /// The timer as `MM:SS`.
    #[must_use]
    pub fn timer_text(&self) -> String {
        format!("{:02}:{:02}", self.timer_display / 60, self.timer_display % 60)
    }
}
