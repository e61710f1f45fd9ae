use crate::ImageId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Identifies one attitude sample submitted for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleTicket {
    pub image: ImageId,
    /// Increases by one with every sample issued for `image`, starting at `1`.
    pub sequence: u64,
}

/// Keeps track of the newest attitude sample issued for every image.
///
/// When several samples arrive for the same image, the warps they produce may finish in any
/// order. Only the result of the most recently issued sample may be committed, so a slow warp
/// of an old sample can never overwrite the result of a newer one.
#[derive(Debug, Default)]
pub struct SampleTracker {
    latest: Mutex<HashMap<ImageId, u64>>,
}

impl SampleTracker {
    pub fn new() -> Self {
        Default::default()
    }

    /// Issues a ticket for a new sample of `image`, superseding every earlier ticket.
    pub fn issue(&self, image: ImageId) -> SampleTicket {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        let sequence = latest.entry(image).or_insert(0);
        *sequence += 1;
        SampleTicket {
            image,
            sequence: *sequence,
        }
    }

    pub fn is_latest(&self, ticket: SampleTicket) -> bool {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.get(&ticket.image) == Some(&ticket.sequence)
    }

    /// Runs `commit` only if `ticket` is still the newest sample of its image.
    ///
    /// No ticket can be issued while `commit` runs, so whatever it stores is guaranteed to
    /// come from the newest sample at the time it is stored.
    pub fn commit<T>(&self, ticket: SampleTicket, commit: impl FnOnce() -> T) -> Option<T> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if latest.get(&ticket.image) == Some(&ticket.sequence) {
            Some(commit())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_wins() {
        let tracker = SampleTracker::new();
        let first = tracker.issue(ImageId(1));
        let second = tracker.issue(ImageId(1));
        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);

        assert!(!tracker.is_latest(first));
        assert_eq!(tracker.commit(first, || "first"), None);
        assert_eq!(tracker.commit(second, || "second"), Some("second"));
    }

    #[test]
    fn images_are_independent() {
        let tracker = SampleTracker::new();
        let a = tracker.issue(ImageId(1));
        let b = tracker.issue(ImageId(2));
        assert_eq!(b.sequence, 1);
        assert!(tracker.is_latest(a));
        assert!(tracker.is_latest(b));
    }
}
