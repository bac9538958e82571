use std::sync::Arc;

use tracing::{debug, info, warn};

use super::probe::probe_step;
use crate::domain::{
    evaluate, rank_candidates, Acceptance, AttemptRecord, AttemptVerdict, AutoConnectOutcome,
    AutoConnectReport, Candidate, InFlightTracker, ProbeParams, ResultStore, SelectionError,
    WorkflowControl, WorkflowKind, WorkflowState,
};
use crate::ports::{ConnectionGateway, ProbeGateway};

// =============================================================================
// AUTO-CONNECT ORCHESTRATOR (Application Service)
// =============================================================================

/// Probes ranked candidates and connects to the first acceptable one.
///
/// ## Algorithm
///
/// 1. Rank candidates from the current result store snapshot
/// 2. Probe them one by one with the fast parameter set
/// 3. Connect to the first candidate under the latency threshold
/// 4. On connect failure fall back to the next ranked candidate
/// 5. Stop on connection, exhaustion or cancellation
pub struct AutoConnectOrchestrator<P, C>
where
    P: ProbeGateway + ?Sized,
    C: ConnectionGateway + ?Sized,
{
    prober: Arc<P>,
    connector: Arc<C>,
    results: ResultStore,
    in_flight: InFlightTracker,
    control: WorkflowControl,
}

impl<P, C> AutoConnectOrchestrator<P, C>
where
    P: ProbeGateway + ?Sized,
    C: ConnectionGateway + ?Sized,
{
    /// Create an orchestrator over shared state.
    pub fn new(
        prober: Arc<P>,
        connector: Arc<C>,
        results: ResultStore,
        in_flight: InFlightTracker,
    ) -> Self {
        Self {
            prober,
            connector,
            results,
            in_flight,
            control: WorkflowControl::new(WorkflowKind::AutoConnect),
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
    /// A probe in flight still completes, and if it is accepted the candidate
    /// is connected. Returns whether a run was active.
    pub fn cancel(&self) -> bool {
        let signalled = self.control.cancel();
        if signalled {
            info!("[vt-01] auto-connect cancellation requested");
        }
        signalled
    }

    /// Run the probe-then-connect workflow.
    ///
    /// # Errors
    ///
    /// - `EmptyCandidateSet` if `candidates` is empty
    /// - `AlreadyRunning` if this instance is already auto-connecting
    pub async fn run_auto_connect(
        &self,
        candidates: &[Candidate],
        params: ProbeParams,
        threshold_ms: u64,
    ) -> Result<AutoConnectReport, SelectionError> {
        if candidates.is_empty() {
            return Err(SelectionError::EmptyCandidateSet {
                workflow: WorkflowKind::AutoConnect,
            });
        }
        let run = self.control.begin()?;

        let history = self.results.all();
        let ranked = rank_candidates(candidates, &history);
        let total = ranked.len();

        info!(
            candidates = total,
            threshold_ms,
            "[vt-01] auto-connect started"
        );

        let mut attempts = Vec::with_capacity(total);
        let mut attempted = 0usize;

        for (position, candidate) in ranked.into_iter().enumerate() {
            if run.observe_cancellation() {
                return Ok(cancelled(attempted, attempts));
            }

            let Some(in_flight) = self.in_flight.guard(&candidate.id) else {
                debug!(candidate = %candidate.id, "[vt-01] already being probed, skipping");
                attempts.push(record(candidate, AttemptVerdict::SkippedInFlight));
                continue;
            };

            attempted += 1;
            debug!(
                candidate = %candidate.id,
                position = position + 1,
                total,
                "[vt-01] probing candidate"
            );

            let result = probe_step(self.prober.as_ref(), candidate, params).await;
            self.results.set(candidate.id.clone(), result.clone());
            drop(in_flight);

            let latency_ms = match evaluate(&result, threshold_ms) {
                Acceptance::Accepted { latency_ms } => latency_ms,
                Acceptance::Rejected(reason) => {
                    debug!(
                        candidate = %candidate.id,
                        %reason,
                        "[vt-01] candidate rejected, trying next"
                    );
                    attempts.push(record(
                        candidate,
                        AttemptVerdict::Rejected {
                            reason,
                            latency_ms: result.latency_ms,
                        },
                    ));
                    continue;
                }
            };

            match self.connector.connect(candidate).await {
                Ok(()) => {
                    info!(
                        candidate = %candidate.id,
                        latency_ms,
                        attempted,
                        "[vt-01] auto-connect established"
                    );
                    attempts.push(record(candidate, AttemptVerdict::Connected { latency_ms }));
                    return Ok(AutoConnectReport {
                        outcome: AutoConnectOutcome::Connected {
                            candidate: candidate.clone(),
                            latency_ms,
                            attempted,
                        },
                        attempts,
                    });
                }
                Err(err) => {
                    warn!(
                        candidate = %candidate.id,
                        error = %err,
                        "[vt-01] connect failed, falling back to next candidate"
                    );
                    attempts.push(record(
                        candidate,
                        AttemptVerdict::ConnectFailed {
                            latency_ms,
                            reason: err.to_string(),
                        },
                    ));
                }
            }
        }

        warn!(attempted, "[vt-01] auto-connect exhausted all candidates");
        Ok(AutoConnectReport {
            outcome: AutoConnectOutcome::Exhausted { attempted },
            attempts,
        })
    }
}

fn record(candidate: &Candidate, verdict: AttemptVerdict) -> AttemptRecord {
    AttemptRecord {
        candidate_id: candidate.id.clone(),
        verdict,
    }
}

fn cancelled(attempted: usize, attempts: Vec<AttemptRecord>) -> AutoConnectReport {
    info!(attempted, "[vt-01] auto-connect cancelled");
    AutoConnectReport {
        outcome: AutoConnectOutcome::Cancelled { attempted },
        attempts,
    }
}
