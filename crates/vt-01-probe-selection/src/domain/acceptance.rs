//! Acceptance policy for auto-connect.

use std::fmt;

use serde::Serialize;

use super::entities::ProbeResult;

/// Reference acceptance threshold (milliseconds).
pub const DEFAULT_ACCEPTANCE_THRESHOLD_MS: u64 = 3000;

/// Why a probed candidate was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    /// Probe failed
    Unreachable,
    /// Probe reported success without a measurement
    Timeout,
    /// Latency at or above the threshold
    LatencyTooHigh,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "unreachable"),
            Self::Timeout => write!(f, "timeout"),
            Self::LatencyTooHigh => write!(f, "latency too high"),
        }
    }
}

/// Verdict of the acceptance policy on one probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Worth connecting to
    Accepted {
        /// Measured latency, strictly below the threshold
        latency_ms: u64,
    },
    /// Not worth connecting to
    Rejected(RejectionReason),
}

impl Acceptance {
    /// Whether the verdict is `Accepted`.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Accept iff the probe succeeded with a latency strictly below `threshold_ms`.
pub fn evaluate(result: &ProbeResult, threshold_ms: u64) -> Acceptance {
    if !result.success {
        return Acceptance::Rejected(RejectionReason::Unreachable);
    }

    match result.latency_ms {
        None => Acceptance::Rejected(RejectionReason::Timeout),
        Some(latency_ms) if latency_ms < threshold_ms => Acceptance::Accepted { latency_ms },
        Some(_) => Acceptance::Rejected(RejectionReason::LatencyTooHigh),
    }
}
