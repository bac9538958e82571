//! # Selection Configuration
//!
//! Probe parameters for both workflows and the auto-connect acceptance
//! threshold.

use serde::{Deserialize, Serialize};

use crate::domain::{ProbeParams, DEFAULT_ACCEPTANCE_THRESHOLD_MS};

/// Tuning for the selection engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Parameters for batch and single-candidate probes.
    pub batch: ProbeParams,

    /// Faster parameters used while auto-connecting.
    pub auto_connect: ProbeParams,

    /// Latency (ms) a candidate must stay strictly below to be accepted.
    pub acceptance_threshold_ms: u64,

    /// Upper bound for establishing a connection (seconds).
    pub connect_timeout_secs: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            batch: ProbeParams::batch(),
            auto_connect: ProbeParams::auto_connect(),
            acceptance_threshold_ms: DEFAULT_ACCEPTANCE_THRESHOLD_MS,
            connect_timeout_secs: 10,
        }
    }
}

impl SelectionConfig {
    /// Create a config for testing (single attempts, short timeouts).
    pub fn for_testing() -> Self {
        Self {
            batch: ProbeParams::new(1, 1),
            auto_connect: ProbeParams::new(1, 1),
            acceptance_threshold_ms: 500,
            connect_timeout_secs: 1,
        }
    }
}
