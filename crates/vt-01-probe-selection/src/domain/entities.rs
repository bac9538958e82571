//! Core entities: candidates, probe results and probe parameters.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Unique identifier of a candidate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    /// Create a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A connectable remote endpoint eligible for probing.
///
/// Candidates are owned by the caller and only borrowed by the orchestrators
/// for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique identifier
    pub id: CandidateId,
    /// Human readable name
    pub name: String,
    /// Host name or IP literal
    pub host: String,
    /// Port to probe and connect to
    pub port: u16,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(
        id: impl Into<CandidateId>,
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    /// `host:port` form used for logging and socket resolution.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Outcome of one probe step against one candidate.
///
/// `latency_ms` is present only when a round-trip completed. Gateways are
/// expected to return `success == true` only together with a latency; the
/// core tolerates the inconsistent combination and never accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Aggregated round-trip latency in milliseconds
    pub latency_ms: Option<u64>,
    /// Whether the probe succeeded
    pub success: bool,
    /// Failure description (may be empty for unknown causes)
    pub error: Option<String>,
}

impl ProbeResult {
    /// Successful probe with a measured latency.
    pub fn success(latency_ms: u64) -> Self {
        Self {
            latency_ms: Some(latency_ms),
            success: true,
            error: None,
        }
    }

    /// Failed probe with no completed round-trip.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            latency_ms: None,
            success: false,
            error: Some(error.into()),
        }
    }

    /// Failed probe whose round-trip completed but was deemed unsuccessful.
    pub fn failure_with_latency(latency_ms: u64, error: impl Into<String>) -> Self {
        Self {
            latency_ms: Some(latency_ms),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Latency only when the probe succeeded.
    pub fn successful_latency(&self) -> Option<u64> {
        if self.success {
            self.latency_ms
        } else {
            None
        }
    }

    /// `success` implies a latency, failure implies an error.
    pub fn is_consistent(&self) -> bool {
        if self.success {
            self.latency_ms.is_some()
        } else {
            self.error.is_some()
        }
    }
}

/// Probe parameters handed to the gateway for every candidate of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeParams {
    /// Number of attempts aggregated into one latency figure
    pub count: u32,
    /// Per-attempt timeout (seconds)
    pub timeout_secs: u64,
}

impl ProbeParams {
    /// Create probe parameters.
    pub const fn new(count: u32, timeout_secs: u64) -> Self {
        Self {
            count,
            timeout_secs,
        }
    }

    /// Thorough parameters for a manual batch run (3 attempts, 5s).
    pub const fn batch() -> Self {
        Self::new(3, 5)
    }

    /// Faster parameters for auto-connect (2 attempts, 3s).
    pub const fn auto_connect() -> Self {
        Self::new(2, 3)
    }

    /// Single attempt reachability check.
    pub const fn connectivity(timeout_secs: u64) -> Self {
        Self::new(1, timeout_secs)
    }

    /// Per-attempt timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeParams {
    fn default() -> Self {
        Self::batch()
    }
}
