use std::sync::Arc;

use tracing::debug;

use super::auto_connect::AutoConnectOrchestrator;
use super::batch::BatchProbeOrchestrator;
use super::probe::probe_step;
use crate::config::SelectionConfig;
use crate::domain::{
    Candidate, CandidateId, InFlightTracker, ProbeParams, ProbeResult, ResultStore, SelectionError,
    WorkflowState,
};
use crate::ports::{ConnectionGateway, ProbeGateway};

/// Probe selection service implementing the driving port.
///
/// Owns the shared result store and in-flight tracker and hands them to one
/// batch orchestrator and one auto-connect orchestrator, so both workflows
/// can run concurrently without probing the same candidate twice.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use vt_01_probe_selection::service::ProbeSelectionService;
/// use vt_01_probe_selection::adapters::{TcpProbeGateway, TcpConnectionGateway};
///
/// let service = ProbeSelectionService::new(
///     SelectionConfig::default(),
///     Arc::new(TcpProbeGateway::new()),
///     Arc::new(TcpConnectionGateway::new(10)),
/// );
/// let summary = service.probe_all(&candidates).await?;
/// ```
pub struct ProbeSelectionService<P, C>
where
    P: ProbeGateway + ?Sized,
    C: ConnectionGateway + ?Sized,
{
    pub(crate) config: SelectionConfig,
    pub(crate) prober: Arc<P>,
    pub(crate) connector: Arc<C>,
    pub(crate) results: ResultStore,
    pub(crate) in_flight: InFlightTracker,
    pub(crate) batch: BatchProbeOrchestrator<P>,
    pub(crate) auto_connect: AutoConnectOrchestrator<P, C>,
}

impl<P, C> ProbeSelectionService<P, C>
where
    P: ProbeGateway + ?Sized,
    C: ConnectionGateway + ?Sized,
{
    /// Create a service with fresh shared state.
    ///
    /// # Arguments
    ///
    /// * `config` - Probe parameters and acceptance threshold
    /// * `prober` - Latency probe adapter
    /// * `connector` - Connection adapter used by auto-connect
    pub fn new(config: SelectionConfig, prober: Arc<P>, connector: Arc<C>) -> Self {
        let results = ResultStore::new();
        let in_flight = InFlightTracker::new();
        let batch = BatchProbeOrchestrator::new(
            Arc::clone(&prober),
            results.clone(),
            in_flight.clone(),
        );
        let auto_connect = AutoConnectOrchestrator::new(
            Arc::clone(&prober),
            Arc::clone(&connector),
            results.clone(),
            in_flight.clone(),
        );

        Self {
            config,
            prober,
            connector,
            results,
            in_flight,
            batch,
            auto_connect,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Shared result store (clone to observe from elsewhere).
    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    /// Shared in-flight tracker.
    pub fn in_flight(&self) -> &InFlightTracker {
        &self.in_flight
    }

    /// Batch orchestrator.
    pub fn batch(&self) -> &BatchProbeOrchestrator<P> {
        &self.batch
    }

    /// Auto-connect orchestrator.
    pub fn auto_connect_orchestrator(&self) -> &AutoConnectOrchestrator<P, C> {
        &self.auto_connect
    }

    /// Lifecycle state of the batch workflow.
    pub fn batch_state(&self) -> WorkflowState {
        self.batch.state()
    }

    /// Lifecycle state of the auto-connect workflow.
    pub fn auto_connect_state(&self) -> WorkflowState {
        self.auto_connect.state()
    }

    /// Probe a single candidate outside of any batch run.
    ///
    /// # Errors
    ///
    /// `CandidateInFlight` if the candidate is being probed by a running
    /// workflow. The stored result is left untouched in that case.
    pub async fn probe_candidate(
        &self,
        candidate: &Candidate,
        params: ProbeParams,
    ) -> Result<ProbeResult, SelectionError> {
        let _in_flight = self
            .in_flight
            .guard(&candidate.id)
            .ok_or_else(|| SelectionError::CandidateInFlight(candidate.id.clone()))?;

        debug!(candidate = %candidate.id, "[vt-01] single probe");
        let result = probe_step(self.prober.as_ref(), candidate, params).await;
        self.results.set(candidate.id.clone(), result.clone());
        Ok(result)
    }
}

/// Look up `id` in a candidate list.
///
/// # Errors
///
/// `UnknownCandidate` if no candidate carries that id.
pub fn find_candidate<'a>(
    candidates: &'a [Candidate],
    id: &CandidateId,
) -> Result<&'a Candidate, SelectionError> {
    candidates
        .iter()
        .find(|candidate| &candidate.id == id)
        .ok_or_else(|| SelectionError::UnknownCandidate(id.clone()))
}
