//! In-process relay for local play and tests.
//!
//! Fans each controller's outgoing team updates out to every other
//! controller through the wire codec. It can deliver every payload twice and
//! shuffle delivery order, since the real relay promises neither dedup nor
//! ordering.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::controller::PuzzleController;
use crate::core::PuzzleRng;
use crate::error::SyncError;

/// Rounds `settle` runs before giving up.
pub const MAX_SETTLE_ROUNDS: usize = 16;

/// Relay counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayStats {
    /// Updates drained from outboxes.
    pub sent: usize,
    /// Payloads handed to receivers, duplicates included.
    pub delivered: usize,
    /// Extra copies delivered.
    pub duplicated: usize,
    /// Bytes encoded.
    pub bytes: usize,
}

/// Loopback relay between controllers in one process.
#[derive(Clone, Debug)]
pub struct LoopbackRelay {
    duplicate: bool,
    shuffle: Option<PuzzleRng>,
    stats: RelayStats,
}

impl Default for LoopbackRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackRelay {
    /// In-order, exactly-once delivery.
    #[must_use]
    pub fn new() -> Self {
        Self {
            duplicate: false,
            shuffle: None,
            stats: RelayStats::default(),
        }
    }

    /// Deliver every payload twice (builder pattern).
    #[must_use]
    pub fn with_duplicates(mut self, duplicate: bool) -> Self {
        self.duplicate = duplicate;
        self
    }

    /// Shuffle delivery order with a seeded RNG (builder pattern).
    #[must_use]
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = Some(PuzzleRng::new(seed).for_context("relay"));
        self
    }

    #[must_use]
    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// One round: drain every outbox and deliver to every other controller.
    ///
    /// Returns the number of payloads delivered.
    pub fn pump(&mut self, controllers: &mut [PuzzleController]) -> Result<usize, SyncError> {
        let mut deliveries: Vec<(usize, Vec<u8>)> = Vec::new();

        for (sender, controller) in controllers.iter_mut().enumerate() {
            for update in controller.drain_team_updates() {
                self.stats.sent += 1;
                let bytes = update.encode()?;
                self.stats.bytes += bytes.len();
                deliveries.push((sender, bytes));
            }
        }

        let count = controllers.len();
        let mut fanned: Vec<(usize, Vec<u8>)> = Vec::new();
        for (sender, bytes) in deliveries {
            for target in (0..count).filter(|&t| t != sender) {
                if self.duplicate {
                    fanned.push((target, bytes.clone()));
                    self.stats.duplicated += 1;
                }
                fanned.push((target, bytes.clone()));
            }
        }
        if let Some(rng) = self.shuffle.as_mut() {
            rng.shuffle(&mut fanned);
        }

        let delivered = fanned.len();
        for (target, bytes) in fanned {
            controllers[target].receive_team_payload(&bytes)?;
        }
        self.stats.delivered += delivered;
        if delivered > 0 {
            debug!("relay delivered {delivered} payloads");
        }
        Ok(delivered)
    }

    /// Pump until no controller has anything left to send.
    ///
    /// Returns the total delivered.
    pub fn settle(&mut self, controllers: &mut [PuzzleController]) -> Result<usize, SyncError> {
        let mut total = 0;
        for _ in 0..MAX_SETTLE_ROUNDS {
            let delivered = self.pump(controllers)?;
            if delivered == 0 {
                break;
            }
            total += delivered;
        }
        Ok(total)
    }
}
