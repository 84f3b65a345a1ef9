//! Team sync for cooperative puzzles.
//!
//! Every crew member runs an independent puzzle instance holding its own
//! copy of `TeamState`. A local change is broadcast as the sender's own
//! contribution plus the phase. Remote updates are shallow-merged, and
//! completion is re-derived as an AND over all roles after every merge.
//!
//! This is not a CRDT: updates are unordered and the last merge wins per
//! role. The merge is idempotent, so duplicate delivery is harmless.

mod relay;
mod state;

pub use relay::{LoopbackRelay, RelayStats};
pub use state::{merge, Contribution, TeamPhase, TeamState, TeamUpdate};
