//! Candidates currently being probed.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use super::entities::CandidateId;

/// Set of candidate ids with a probe in progress.
///
/// `try_begin` is the only synchronization point between concurrent runs
/// sharing the tracker: it checks and inserts under one lock.
#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    inner: Arc<Mutex<HashSet<CandidateId>>>,
}

impl InFlightTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as in flight.
    ///
    /// Returns `false` without mutation if it already is.
    pub fn try_begin(&self, id: &CandidateId) -> bool {
        let mut set = self.inner.lock();
        if set.contains(id) {
            return false;
        }
        set.insert(id.clone())
    }

    /// Clear the in-flight mark. Idempotent, no-op for unknown ids.
    pub fn end(&self, id: &CandidateId) {
        self.inner.lock().remove(id);
    }

    /// Whether `id` is being probed.
    pub fn contains(&self, id: &CandidateId) -> bool {
        self.inner.lock().contains(id)
    }

    /// Like `try_begin`, but the mark is cleared when the guard drops.
    ///
    /// The guard also covers a run future dropped mid-probe.
    pub fn guard(&self, id: &CandidateId) -> Option<InFlightGuard> {
        if self.try_begin(id) {
            Some(InFlightGuard {
                tracker: self.clone(),
                id: id.clone(),
            })
        } else {
            None
        }
    }

    /// Number of candidates in flight.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of the current in-flight ids.
    pub fn snapshot(&self) -> HashSet<CandidateId> {
        self.inner.lock().clone()
    }
}

/// Clears an in-flight mark on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    tracker: InFlightTracker,
    id: CandidateId,
}

impl InFlightGuard {
    /// The guarded candidate.
    pub fn id(&self) -> &CandidateId {
        &self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tracker.end(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_begin_rejects_duplicate() {
        let tracker = InFlightTracker::new();
        let id = CandidateId::new("a");

        assert!(tracker.try_begin(&id));
        assert!(!tracker.try_begin(&id));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_end_is_idempotent_and_safe_for_unknown_ids() {
        let tracker = InFlightTracker::new();
        let id = CandidateId::new("a");

        tracker.end(&id);
        assert!(tracker.try_begin(&id));
        tracker.end(&id);
        tracker.end(&id);

        assert!(!tracker.contains(&id));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_guard_clears_on_drop() {
        let tracker = InFlightTracker::new();
        let id = CandidateId::new("a");

        {
            let guard = tracker.guard(&id).unwrap();
            assert_eq!(guard.id(), &id);
            assert!(tracker.contains(&id));
            assert!(tracker.guard(&id).is_none());
        }

        assert!(!tracker.contains(&id));
    }

    #[test]
    fn test_concurrent_try_begin_admits_exactly_one() {
        let tracker = InFlightTracker::new();
        let id = CandidateId::new("contended");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                let id = id.clone();
                std::thread::spawn(move || tracker.try_begin(&id))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(admitted, 1);
    }
}
