//! TCP connect latency probe.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::domain::ProbeResult;
use crate::ports::{ProbeError, ProbeGateway};

/// Measures latency as the time to complete a TCP handshake.
///
/// Attempts run one after another. The reported latency is the integer mean
/// of the successful attempts; if none succeed the result is a failure whose
/// error lists every attempt's error. A `count` of 0 is treated as 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbeGateway;

impl TcpProbeGateway {
    /// Create a new TCP probe gateway.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn attempt(host: &str, port: u16, timeout_secs: u64) -> Result<u64, String> {
        let started = Instant::now();
        match timeout(
            Duration::from_secs(timeout_secs),
            TcpStream::connect((host, port)),
        )
        .await
        {
            Ok(Ok(_stream)) => Ok(elapsed_ms(started)),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!("connection timed out after {timeout_secs}s")),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl ProbeGateway for TcpProbeGateway {
    async fn probe(
        &self,
        host: &str,
        port: u16,
        count: u32,
        timeout_secs: u64,
    ) -> Result<ProbeResult, ProbeError> {
        if host.trim().is_empty() || port == 0 {
            return Err(ProbeError::InvalidAddress(format!("{host}:{port}")));
        }

        let attempts = count.max(1);
        let mut latencies = Vec::with_capacity(attempts as usize);
        let mut errors = Vec::new();

        for attempt in 1..=attempts {
            match Self::attempt(host, port, timeout_secs).await {
                Ok(latency_ms) => latencies.push(latency_ms),
                Err(err) => {
                    debug!(host, port, attempt, error = %err, "[vt-01] tcp attempt failed");
                    errors.push(err);
                }
            }
        }

        if latencies.is_empty() {
            return Ok(ProbeResult::failure(errors.join("; ")));
        }

        let total: u64 = latencies.iter().sum();
        Ok(ProbeResult::success(total / latencies.len() as u64))
    }
}
