//! # Driving Ports (Inbound API)
//!
//! The API this subsystem exposes to a presentation layer or CLI.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{
    AutoConnectReport, BatchSummary, Candidate, CandidateId, ProbeResult, SelectionError,
};
use crate::ports::outbound::ConnectError;

/// Primary API for probing and selecting candidates.
///
/// # Example
///
/// ```rust,ignore
/// use vt_01_probe_selection::ports::ProbeSelectionApi;
///
/// async fn pick<T: ProbeSelectionApi>(api: &T, candidates: &[Candidate]) {
///     let report = api.auto_connect(candidates).await?;
///     println!("{:?}", report.outcome);
/// }
/// ```
#[async_trait]
pub trait ProbeSelectionApi: Send + Sync {
    /// Probe every candidate in order with the batch parameters.
    ///
    /// # Errors
    ///
    /// - `AlreadyRunning` if a batch run is active on this instance
    async fn probe_all(&self, candidates: &[Candidate]) -> Result<BatchSummary, SelectionError>;

    /// Probe one candidate with the batch parameters.
    ///
    /// # Errors
    ///
    /// - `CandidateInFlight` if someone else is probing it
    async fn probe_one(&self, candidate: &Candidate) -> Result<ProbeResult, SelectionError>;

    /// Rank, probe and connect to the first acceptable candidate.
    ///
    /// # Errors
    ///
    /// - `EmptyCandidateSet` for an empty slice
    /// - `AlreadyRunning` if an auto-connect run is active on this instance
    async fn auto_connect(
        &self,
        candidates: &[Candidate],
    ) -> Result<AutoConnectReport, SelectionError>;

    /// Tear down the connection established by auto-connect.
    async fn disconnect(&self) -> Result<(), ConnectError>;

    /// Cancel the active batch run. Returns whether one was active.
    fn cancel_batch(&self) -> bool;

    /// Cancel the active auto-connect run. Returns whether one was active.
    fn cancel_auto_connect(&self) -> bool;

    /// Whether `id` is being probed right now.
    fn is_in_flight(&self, id: &CandidateId) -> bool;

    /// Most recent probe result for `id`.
    fn get_result(&self, id: &CandidateId) -> Option<ProbeResult>;

    /// Snapshot of every stored result.
    fn all_results(&self) -> HashMap<CandidateId, ProbeResult>;

    /// Forget every stored result.
    fn clear_results(&self);
}
