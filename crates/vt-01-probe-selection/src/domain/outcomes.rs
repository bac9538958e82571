//! Structured results of batch and auto-connect runs.
//!
//! These replace user-facing messages: a presentation layer renders them.

use serde::Serialize;

use super::acceptance::RejectionReason;
use super::entities::{Candidate, CandidateId};

/// Result of a batch probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchSummary {
    /// Candidates actually probed
    pub attempted: usize,
    /// Probes that reported success
    pub succeeded: usize,
    /// Candidates skipped because another caller was probing them
    pub skipped: usize,
    /// Stopped early by cancellation
    pub cancelled: bool,
}

impl BatchSummary {
    /// Probed candidates that did not succeed.
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// What happened to one candidate during auto-connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum AttemptVerdict {
    /// Accepted and connected
    Connected {
        /// Probe latency
        latency_ms: u64,
    },
    /// Accepted, but the connection gateway refused
    ConnectFailed {
        /// Probe latency
        latency_ms: u64,
        /// Gateway error
        reason: String,
    },
    /// Probed and rejected by the acceptance policy
    Rejected {
        /// Classification
        reason: RejectionReason,
        /// Recorded latency, if any
        latency_ms: Option<u64>,
    },
    /// Not probed: another run had it in flight
    SkippedInFlight,
}

/// One candidate's line in an auto-connect report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// Candidate concerned
    pub candidate_id: CandidateId,
    /// What happened
    pub verdict: AttemptVerdict,
}

/// Terminal outcome of an auto-connect run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum AutoConnectOutcome {
    /// Connected to `candidate`
    Connected {
        /// Selected candidate
        candidate: Candidate,
        /// Its probe latency
        latency_ms: u64,
        /// Candidates probed, including the selected one
        attempted: usize,
    },
    /// Every candidate was tried without a connection
    Exhausted {
        /// Candidates probed
        attempted: usize,
    },
    /// Stopped by cancellation
    Cancelled {
        /// Candidates probed before stopping
        attempted: usize,
    },
}

impl AutoConnectOutcome {
    /// Candidates probed during the run.
    pub fn attempted(&self) -> usize {
        match self {
            Self::Connected { attempted, .. }
            | Self::Exhausted { attempted }
            | Self::Cancelled { attempted } => *attempted,
        }
    }

    /// The connected candidate, if any.
    pub fn connected(&self) -> Option<&Candidate> {
        match self {
            Self::Connected { candidate, .. } => Some(candidate),
            _ => None,
        }
    }
}

/// Outcome plus the per-candidate trail of an auto-connect run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoConnectReport {
    /// Terminal outcome
    pub outcome: AutoConnectOutcome,
    /// Attempts in ranked order
    pub attempts: Vec<AttemptRecord>,
}

impl AutoConnectReport {
    /// Number of connect calls made during the run.
    pub fn connect_calls(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| {
                matches!(
                    a.verdict,
                    AttemptVerdict::Connected { .. } | AttemptVerdict::ConnectFailed { .. }
                )
            })
            .count()
    }
}
