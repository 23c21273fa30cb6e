//! Stale-response guard for filter-driven fetches.
//!
//! Each fetch started because the filter changed takes a new ticket. When
//! its response arrives it is applied only if no newer ticket has been
//! issued since, so a slow early response cannot overwrite a fast later
//! one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct FetchSequence {
    latest: Arc<AtomicU64>,
}

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, invalidating every earlier ticket.
    pub fn next(&self) -> FetchTicket {
        FetchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// A ticket for the current generation. Load-more requests use this so
    /// they are dropped if the filter changes while they are in flight.
    pub fn current(&self) -> FetchTicket {
        FetchTicket(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_invalidates_older() {
        let seq = FetchSequence::new();
        let first = seq.next();
        let second = seq.next();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }

    #[test]
    fn test_current_shares_generation() {
        let seq = FetchSequence::new();
        let filter_fetch = seq.next();
        let more = seq.current();
        assert_eq!(filter_fetch, more);
        assert!(seq.is_latest(more));

        seq.next();
        assert!(!seq.is_latest(more));
    }

    #[test]
    fn test_clones_share_state() {
        let seq = FetchSequence::new();
        let clone = seq.clone();
        let ticket = seq.next();
        assert!(clone.is_latest(ticket));
        clone.next();
        assert!(!seq.is_latest(ticket));
    }
}
