use std::collections::HashMap;

use async_trait::async_trait;
use tracing::info;

use crate::domain::{
    AutoConnectReport, BatchSummary, Candidate, CandidateId, ProbeResult, SelectionError,
};
use crate::ports::{ConnectError, ConnectionGateway, ProbeGateway, ProbeSelectionApi};
use crate::service::ProbeSelectionService;

#[async_trait]
impl<P, C> ProbeSelectionApi for ProbeSelectionService<P, C>
where
    P: ProbeGateway + ?Sized,
    C: ConnectionGateway + ?Sized,
{
    async fn probe_all(&self, candidates: &[Candidate]) -> Result<BatchSummary, SelectionError> {
        self.batch.run_batch(candidates, self.config.batch).await
    }

    async fn probe_one(&self, candidate: &Candidate) -> Result<ProbeResult, SelectionError> {
        self.probe_candidate(candidate, self.config.batch).await
    }

    async fn auto_connect(
        &self,
        candidates: &[Candidate],
    ) -> Result<AutoConnectReport, SelectionError> {
        self.auto_connect
            .run_auto_connect(
                candidates,
                self.config.auto_connect,
                self.config.acceptance_threshold_ms,
            )
            .await
    }

    async fn disconnect(&self) -> Result<(), ConnectError> {
        self.connector.disconnect().await?;
        info!("[vt-01] disconnected");
        Ok(())
    }

    fn cancel_batch(&self) -> bool {
        self.batch.cancel()
    }

    fn cancel_auto_connect(&self) -> bool {
        self.auto_connect.cancel()
    }

    fn is_in_flight(&self, id: &CandidateId) -> bool {
        self.in_flight.contains(id)
    }

    fn get_result(&self, id: &CandidateId) -> Option<ProbeResult> {
        self.results.get(id)
    }

    fn all_results(&self) -> HashMap<CandidateId, ProbeResult> {
        self.results.all()
    }

    fn clear_results(&self) {
        self.results.clear();
    }
}
