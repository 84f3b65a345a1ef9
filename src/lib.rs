//! # heist-puzzles
//!
//! Puzzle lifecycle and team-sync engine for a cooperative heist party game.
//!
//! ## Design Principles
//!
//! 1. **Headless**: Puzzles never render or keep time. They expose a view
//!    model and call outward through the `Host` surface.
//!
//! 2. **One Clock**: The controller owns the only countdown and the only
//!    transient timer queue. Tests drive it with `advance(seconds)`.
//!
//! 3. **Seeded or Generated**: Every puzzle accepts its answer from seed data
//!    or generates one from a deterministic RNG stream.
//!
//! ## Architecture
//!
//! - **Lifecycle Contract**: `initialize → interact → validate →
//!   complete/fail → cleanup`, shared by every kind through `Lifecycle`.
//!
//! - **Team Sync**: Cooperative puzzles keep independent `TeamState` copies
//!   backed by `im-rs`, reconciled by an idempotent shallow merge.
//!
//! ## Modules
//!
//! - `core`: Roles, status, configuration, RNG
//! - `error`: Error types
//! - `events`: Random events and the event director
//! - `host`: Host callback surface, countdown, timers
//! - `puzzles`: The `Puzzle` trait and every puzzle kind
//! - `team`: Team state, merge reducer, loopback relay
//! - `controller`: Mounting, the logical clock, submission
//! - `view`: Render-ready view models

pub mod controller;
pub mod core;
pub mod error;
pub mod events;
pub mod host;
pub mod puzzles;
pub mod team;
pub mod view;

// Re-export commonly used types
pub use crate::core::{
    MessageKind, PuzzleConfig, PuzzleKind, PuzzleRng, PuzzleStatus, Role,
    RoleMap,
};

pub use crate::error::{ConfigError, SubmitError, SyncError, TransportError};

pub use crate::events::{EventConfig, EventDirector, Handicap, RandomEvent};

pub use crate::host::{Host, HostContext, HostEvent, TimerHandle};

pub use crate::puzzles::{
    AttemptPolicy, InputOutcome, Lifecycle, Puzzle, PuzzleInput, SeedData, Submission,
};

pub use crate::team::{merge, Contribution, LoopbackRelay, TeamPhase, TeamState, TeamUpdate};

pub use crate::controller::{
    ControllerConfig, ControllerPhase, PuzzleController, PuzzleRegistry, SeedChecker,
    SolutionChecker,
};

pub use crate::view::{ChromeView, PuzzleHeader, PuzzleView};
