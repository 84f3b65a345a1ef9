//! Puzzle controller.
//!
//! The controller mounts one puzzle instance at a time and supplies the host
//! it calls outward through.
//!
//! ## State Machine
//!
//! `Unmounted → Active → {Succeeded | Failed} → Unmounted`
//!
//! Input is forwarded only while `Active`.
//!
//! ## Logical Clock
//!
//! The controller owns the only clock. `advance(seconds)` ticks the
//! countdown, rolls for random events on 30-second marks, then fires due
//! transient timers in handle order. Nothing else keeps time.
//!
//! ## Submission
//!
//! Two-phase: `begin_submit` snapshots the answer and locks the submit
//! control; `resolve_submit` routes the checker's verdict back into the
//! puzzle. `submit_with` runs both against a `SolutionChecker`.

mod puzzle_controller;
mod registry;
mod submit;

pub use puzzle_controller::{ControllerConfig, ControllerPhase, PuzzleController, TRANSPORT_ERROR_TEXT};
pub use registry::{KindSpec, PuzzleFactory, PuzzleRegistry, RegistryEntry};
pub use submit::{validate_submission, vault_entries, SeedChecker, SolutionChecker};
