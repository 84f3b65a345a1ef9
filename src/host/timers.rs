//! One-shot timers on the host's logical clock.
//!
//! Timers are kept in a pending queue keyed by handle. Cancelling removes the
//! entry, so a cancelled timer cannot fire however far the clock advances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TimerHandle;

/// Pending one-shot timers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    /// Current logical time in seconds.
    now: u64,
    /// Next handle to allocate.
    next_id: u64,
    /// Due time per pending handle.
    pending: BTreeMap<TimerHandle, u64>,
}

impl TimerQueue {
    /// Create an empty queue at time 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule a timer `delay_secs` from now.
    pub fn schedule(&mut self, delay_secs: u32) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.insert(handle, self.now + u64::from(delay_secs));
        handle
    }

    /// Cancel a timer. Returns whether it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    /// Whether a timer is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance the clock by one second.
    pub fn advance(&mut self) {
        self.now += 1;
    }

    /// Remove and return the earliest timer due at or before now.
    ///
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self) -> Option<TimerHandle> {
        let (&handle, _) = self
            .pending
            .iter()
            .filter(|(_, &due)| due <= self.now)
            .min_by_key(|(&handle, &due)| (due, handle))?;
        self.pending.remove(&handle);
        Some(handle)
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_fire() {
        let mut q = TimerQueue::new();
        let a = q.schedule(2);
        let b = q.schedule(1);

        assert_eq!(q.pop_due(), None);
        q.advance();
        assert_eq!(q.pop_due(), Some(b));
        assert_eq!(q.pop_due(), None);
        q.advance();
        assert_eq!(q.pop_due(), Some(a));
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut q = TimerQueue::new();
        let a = q.schedule(1);
        let b = q.schedule(1);
        q.advance();
        assert_eq!(q.pop_due(), Some(a));
        assert_eq!(q.pop_due(), Some(b));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let a = q.schedule(1);
        assert!(q.cancel(a));
        assert!(!q.cancel(a));

        for _ in 0..10 {
            q.advance();
            assert_eq!(q.pop_due(), None);
        }
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut q = TimerQueue::new();
        let a = q.schedule(0);
        q.cancel(a);
        let b = q.schedule(0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_delay_is_due_immediately() {
        let mut q = TimerQueue::new();
        let a = q.schedule(0);
        assert_eq!(q.pop_due(), Some(a));
    }

    #[test]
    fn test_clear() {
        let mut q = TimerQueue::new();
        q.schedule(1);
        q.schedule(5);
        assert_eq!(q.len(), 2);
        q.clear();
        assert!(q.is_empty());
    }
}
