//! # Driven Ports (Outbound SPI)
//!
//! Interfaces this subsystem **requires** from the host: the latency probe,
//! connection establishment and configuration loading.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SelectionConfig;
use crate::domain::{Candidate, ProbeResult};

/// Executes latency probes against a single endpoint.
///
/// # Contract
///
/// - Runs `count` attempts, each bounded by roughly `timeout_secs`
/// - Aggregates the attempts into one `ProbeResult` (policy is up to the
///   implementation, e.g. mean or minimum of successful attempts)
/// - An `Err` is recorded by the caller as a failed probe and never aborts a run
#[async_trait]
pub trait ProbeGateway: Send + Sync {
    /// Probe `host:port`.
    async fn probe(
        &self,
        host: &str,
        port: u16,
        count: u32,
        timeout_secs: u64,
    ) -> Result<ProbeResult, ProbeError>;
}

/// Errors a probe gateway may raise instead of returning a failed result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Host could not be resolved or parsed
    #[error("invalid address {0}")]
    InvalidAddress(String),
    /// The gateway gave up waiting
    #[error("probe timed out after {0}s")]
    Timeout(u64),
    /// Transport-level failure
    #[error("probe transport error: {0}")]
    Transport(String),
}

/// Establishes and tears down the connection to a selected candidate.
///
/// Failures are reported as `ConnectError` values so that the auto-connect
/// fallback can move on to the next candidate.
#[async_trait]
pub trait ConnectionGateway: Send + Sync {
    /// Connect to `candidate`.
    async fn connect(&self, candidate: &Candidate) -> Result<(), ConnectError>;

    /// Tear down the active connection.
    async fn disconnect(&self) -> Result<(), ConnectError>;
}

/// Errors from connection establishment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Remote side refused or the transport failed
    #[error("connection to {candidate} failed: {reason}")]
    Failed {
        /// Candidate id
        candidate: String,
        /// Underlying reason
        reason: String,
    },
    /// Establishment did not finish in time
    #[error("connection to {candidate} timed out after {secs}s")]
    Timeout {
        /// Candidate id
        candidate: String,
        /// Timeout that elapsed
        secs: u64,
    },
    /// `disconnect` without an active connection
    #[error("no active connection")]
    NotConnected,
}

/// Source of candidates and tuning parameters.
pub trait ConfigProvider: Send + Sync {
    /// Candidates in configured order.
    fn candidates(&self) -> Vec<Candidate>;

    /// Probe parameters and acceptance threshold.
    fn selection_config(&self) -> SelectionConfig;
}
