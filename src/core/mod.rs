//! Core puzzle types: roles, status, configuration, RNG.
//!
//! These building blocks are shared by every puzzle kind, the host surface
//! and the controller.

pub mod config;
pub mod rng;
pub mod role;
pub mod status;

pub use config::{PuzzleConfig, PuzzleKind};
pub use rng::PuzzleRng;
pub use role::{Role, RoleMap};
pub use status::{MessageKind, PuzzleStatus};
