use std::sync::Arc;

use tracing::{debug, info};

use super::probe::probe_step;
use crate::domain::{
    BatchSummary, Candidate, InFlightTracker, ProbeParams, ResultStore, SelectionError,
    WorkflowControl, WorkflowKind, WorkflowState,
};
use crate::ports::ProbeGateway;

// =============================================================================
// BATCH PROBE ORCHESTRATOR (Application Service)
// =============================================================================

/// Probes a list of candidates one after another.
///
/// Ties together:
/// - `ProbeGateway` (network adapter)
/// - `ResultStore` / `InFlightTracker` (shared with other orchestrators)
/// - `WorkflowControl` (single-flight + cancellation)
pub struct BatchProbeOrchestrator<P: ProbeGateway + ?Sized> {
    gateway: Arc<P>,
    results: ResultStore,
    in_flight: InFlightTracker,
    control: WorkflowControl,
}

impl<P: ProbeGateway + ?Sized> BatchProbeOrchestrator<P> {
    /// Create an orchestrator over shared state.
    pub fn new(gateway: Arc<P>, results: ResultStore, in_flight: InFlightTracker) -> Self {
        Self {
            gateway,
            results,
            in_flight,
            control: WorkflowControl::new(WorkflowKind::Batch),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkflowState {
        self.control.state()
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Ask the active run to stop before its next candidate.
    ///
    /// No-op when idle. Returns whether a run was active.
    pub fn cancel(&self) -> bool {
        let signalled = self.control.cancel();
        if signalled {
            info!("[vt-01] batch probe cancellation requested");
        }
        signalled
    }

    /// Probe `candidates` in input order.
    ///
    /// Candidates already in flight elsewhere are skipped and not counted as
    /// attempted. Probe failures are stored as failed results; they never
    /// abort the run. Cancellation is honored only between candidates.
    ///
    /// # Errors
    ///
    /// `AlreadyRunning` if this instance is already running a batch.
    pub async fn run_batch(
        &self,
        candidates: &[Candidate],
        params: ProbeParams,
    ) -> Result<BatchSummary, SelectionError> {
        let run = self.control.begin()?;
        let mut summary = BatchSummary::default();

        if candidates.is_empty() {
            debug!("[vt-01] batch probe requested with no candidates");
            return Ok(summary);
        }

        info!(
            candidates = candidates.len(),
            count = params.count,
            timeout_secs = params.timeout_secs,
            "[vt-01] batch probe started"
        );

        for candidate in candidates {
            if run.observe_cancellation() {
                summary.cancelled = true;
                break;
            }

            let Some(_in_flight) = self.in_flight.guard(&candidate.id) else {
                debug!(candidate = %candidate.id, "[vt-01] already being probed, skipping");
                summary.skipped += 1;
                continue;
            };

            let result = probe_step(self.gateway.as_ref(), candidate, params).await;
            if result.success {
                summary.succeeded += 1;
            }
            self.results.set(candidate.id.clone(), result);
            summary.attempted += 1;
        }

        if summary.cancelled {
            info!(
                attempted = summary.attempted,
                total = candidates.len(),
                "[vt-01] batch probe cancelled"
            );
        } else {
            info!(
                succeeded = summary.succeeded,
                attempted = summary.attempted,
                skipped = summary.skipped,
                "[vt-01] batch probe finished"
            );
        }

        Ok(summary)
    }
}
