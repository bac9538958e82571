//! Most recent probe result per candidate.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::entities::{CandidateId, ProbeResult};

/// Shared mapping from candidate id to its most recent probe result.
///
/// Cloning yields another handle to the same store. Writes are atomic per
/// key and last-write-wins. The store outlives individual runs and feeds the
/// ranking of later auto-connect runs.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    inner: Arc<RwLock<HashMap<CandidateId, ProbeResult>>>,
}

impl ResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the result for `id`.
    pub fn set(&self, id: CandidateId, result: ProbeResult) {
        self.inner.write().insert(id, result);
    }

    /// Most recent result for `id`.
    pub fn get(&self, id: &CandidateId) -> Option<ProbeResult> {
        self.inner.read().get(id).cloned()
    }

    /// Drop a single entry, returning it.
    pub fn remove(&self, id: &CandidateId) -> Option<ProbeResult> {
        self.inner.write().remove(id)
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Owned snapshot; later writes are not visible through it.
    pub fn all(&self) -> HashMap<CandidateId, ProbeResult> {
        self.inner.read().clone()
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the store holds no results.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
