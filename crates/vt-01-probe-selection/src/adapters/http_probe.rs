//! HTTP request latency probe.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::ProbeResult;
use crate::ports::{ProbeError, ProbeGateway};

/// How one HTTP attempt ended.
enum Attempt {
    /// 2xx answer
    Ok(u64),
    /// Answer arrived, status was not 2xx
    Status(u64, reqwest::StatusCode),
    /// No answer
    Failed(String),
}

/// Measures latency as the time until an HTTP response head arrives.
///
/// Each attempt is a GET of `{scheme}://{host}:{port}{path}`. A non-2xx
/// answer is a completed round-trip, so when no attempt succeeds but some
/// were answered the result carries their mean latency and is still a
/// failure.
#[derive(Debug, Clone)]
pub struct HttpProbeGateway {
    client: Client,
    scheme: &'static str,
    path: String,
}

impl HttpProbeGateway {
    /// Plain HTTP probe of `path`.
    ///
    /// # Errors
    ///
    /// `Transport` if the HTTP client cannot be built.
    pub fn http(path: impl Into<String>) -> Result<Self, ProbeError> {
        Self::build("http", path.into())
    }

    /// HTTPS probe of `path`.
    ///
    /// # Errors
    ///
    /// `Transport` if the HTTP client cannot be built.
    pub fn https(path: impl Into<String>) -> Result<Self, ProbeError> {
        Self::build("https", path.into())
    }

    fn build(scheme: &'static str, path: String) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Ok(Self {
            client,
            scheme,
            path,
        })
    }

    /// URL probed for `host:port`.
    pub fn url(&self, host: &str, port: u16) -> String {
        format!("{}://{}:{}{}", self.scheme, host, port, self.path)
    }

    async fn attempt(&self, url: &str, timeout_secs: u64) -> Attempt {
        let started = Instant::now();
        let sent = self
            .client
            .get(url)
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await;
        match sent {
            Ok(response) => {
                let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                let status = response.status();
                if status.is_success() {
                    Attempt::Ok(latency_ms)
                } else {
                    Attempt::Status(latency_ms, status)
                }
            }
            Err(err) if err.is_timeout() => {
                Attempt::Failed(format!("request timed out after {timeout_secs}s"))
            }
            Err(err) => Attempt::Failed(err.to_string()),
        }
    }
}

fn mean(values: &[u64]) -> u64 {
    values.iter().sum::<u64>() / values.len() as u64
}

#[async_trait]
impl ProbeGateway for HttpProbeGateway {
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
        let url = self.url(host, port);

        let mut succeeded = Vec::new();
        let mut answered = Vec::new();
        let mut last_status = None;
        let mut errors = Vec::new();

        for attempt in 1..=count.max(1) {
            match self.attempt(&url, timeout_secs).await {
                Attempt::Ok(latency_ms) => succeeded.push(latency_ms),
                Attempt::Status(latency_ms, status) => {
                    debug!(%url, attempt, %status, "[vt-01] http attempt answered with error status");
                    answered.push(latency_ms);
                    last_status = Some(status);
                }
                Attempt::Failed(err) => {
                    debug!(%url, attempt, error = %err, "[vt-01] http attempt failed");
                    errors.push(err);
                }
            }
        }

        if !succeeded.is_empty() {
            return Ok(ProbeResult::success(mean(&succeeded)));
        }
        if let Some(status) = last_status {
            return Ok(ProbeResult::failure_with_latency(
                mean(&answered),
                format!("HTTP status {}", status.as_u16()),
            ));
        }
        Ok(ProbeResult::failure(errors.join("; ")))
    }
}
