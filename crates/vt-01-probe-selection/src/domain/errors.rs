//! Domain Errors for Probe Selection
//!
//! Only call rejections live here. Per-candidate probe and connect failures
//! are absorbed into results and reports, never returned as errors.

use std::fmt;

use thiserror::Error;

use super::entities::CandidateId;

/// Which workflow a rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    /// Probe-all run
    Batch,
    /// Probe-then-connect run
    AutoConnect,
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch => write!(f, "batch probe"),
            Self::AutoConnect => write!(f, "auto-connect"),
        }
    }
}

/// Errors surfaced as immediate call rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A run was requested while one is active on the same orchestrator.
    /// Rejected before any state is touched.
    #[error("{workflow} run already in progress")]
    AlreadyRunning {
        /// Rejected workflow
        workflow: WorkflowKind,
    },

    /// A run was requested with no candidates.
    #[error("{workflow} requested with no candidates")]
    EmptyCandidateSet {
        /// Rejected workflow
        workflow: WorkflowKind,
    },

    /// The candidate is currently being probed by another caller.
    #[error("candidate {0} is already being probed")]
    CandidateInFlight(CandidateId),

    /// No candidate with this id is known.
    #[error("unknown candidate: {0}")]
    UnknownCandidate(CandidateId),
}
