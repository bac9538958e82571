use tracing::debug;

use crate::domain::{Candidate, ProbeParams, ProbeResult};
use crate::ports::ProbeGateway;

/// Run one probe step, folding gateway errors into a failed result.
pub(crate) async fn probe_step<P>(gateway: &P, candidate: &Candidate, params: ProbeParams) -> ProbeResult
where
    P: ProbeGateway + ?Sized,
{
    let result = match gateway
        .probe(
            &candidate.host,
            candidate.port,
            params.count,
            params.timeout_secs,
        )
        .await
    {
        Ok(result) => result,
        Err(err) => ProbeResult::failure(err.to_string()),
    };

    debug!(
        candidate = %candidate.id,
        address = %candidate.address(),
        success = result.success,
        latency_ms = ?result.latency_ms,
        "[vt-01] probe resolved"
    );

    result
}
