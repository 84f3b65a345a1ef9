//! Puzzle status and message severity.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a puzzle instance.
///
/// Transitions are monotonic: `Pending → Active → {Succeeded | Failed}`.
/// The two terminal states accept no further gameplay mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PuzzleStatus {
    /// Constructed but not yet initialized.
    #[default]
    Pending,
    /// Accepting input.
    Active,
    /// Solved.
    Succeeded,
    /// Out of attempts or out of time.
    Failed,
}

impl PuzzleStatus {
    /// True for `Succeeded` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, PuzzleStatus::Succeeded | PuzzleStatus::Failed)
    }

    /// True only for `Active`.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, PuzzleStatus::Active)
    }
}

/// Severity class of a banner message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}
