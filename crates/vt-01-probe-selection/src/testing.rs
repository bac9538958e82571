//! Centralized Testing Utilities
//!
//! Scripted adapters and fixtures used by the unit tests and by the
//! integration test crate. Available with the `test-utils` feature flag.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::domain::{Candidate, CandidateId, ProbeResult};
use crate::ports::{ConnectError, ConnectionGateway, ProbeError, ProbeGateway};

/// Build a candidate whose host is `"{id}.test"` on port 443.
pub fn candidate(id: &str) -> Candidate {
    Candidate::new(id, id.to_uppercase(), format!("{id}.test"), 443)
}

/// Rendezvous point that parks an adapter call until the test releases it.
///
/// `entered` fires once the call reached the gate; the call then waits for
/// `release`. Both use `Notify` permits, so ordering between the test and
/// the adapter does not matter.
#[derive(Debug, Default)]
pub struct StepGate {
    entered: Notify,
    release: Notify,
}

impl StepGate {
    /// Wait until an adapter call is parked on this gate.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the parked call continue.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// One recorded probe call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCall {
    /// Host probed
    pub host: String,
    /// Port probed
    pub port: u16,
    /// Attempt count requested
    pub count: u32,
    /// Per-attempt timeout requested
    pub timeout_secs: u64,
}

/// Probe gateway returning scripted results per host.
///
/// Unscripted hosts resolve to a failed probe.
#[derive(Debug, Default)]
pub struct ScriptedProbeGateway {
    script: Mutex<HashMap<String, Result<ProbeResult, ProbeError>>>,
    gates: Mutex<HashMap<String, Arc<StepGate>>>,
    calls: Mutex<Vec<ProbeCall>>,
}

impl ScriptedProbeGateway {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a result for `host`.
    pub fn with_result(self, host: &str, result: ProbeResult) -> Self {
        self.set_result(host, result);
        self
    }

    /// Script a gateway error for `host`.
    pub fn with_error(self, host: &str, error: ProbeError) -> Self {
        self.script.lock().insert(host.to_string(), Err(error));
        self
    }

    /// Replace the scripted result for `host`.
    pub fn set_result(&self, host: &str, result: ProbeResult) {
        self.script.lock().insert(host.to_string(), Ok(result));
    }

    /// Park every probe of `host` on the returned gate.
    pub fn gate(&self, host: &str) -> Arc<StepGate> {
        let gate = Arc::new(StepGate::default());
        self.gates.lock().insert(host.to_string(), Arc::clone(&gate));
        gate
    }

    /// Every probe call so far, in order.
    pub fn calls(&self) -> Vec<ProbeCall> {
        self.calls.lock().clone()
    }

    /// Hosts probed so far, in order.
    pub fn probed_hosts(&self) -> Vec<String> {
        self.calls.lock().iter().map(|call| call.host.clone()).collect()
    }
}

#[async_trait]
impl ProbeGateway for ScriptedProbeGateway {
    async fn probe(
        &self,
        host: &str,
        port: u16,
        count: u32,
        timeout_secs: u64,
    ) -> Result<ProbeResult, ProbeError> {
        self.calls.lock().push(ProbeCall {
            host: host.to_string(),
            port,
            count,
            timeout_secs,
        });

        let gate = self.gates.lock().get(host).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        self.script
            .lock()
            .get(host)
            .cloned()
            .unwrap_or_else(|| Ok(ProbeResult::failure(format!("no script for {host}"))))
    }
}

/// Connection gateway that records calls and fails for chosen candidates.
#[derive(Debug, Default)]
pub struct RecordingConnectionGateway {
    failing: Mutex<HashSet<CandidateId>>,
    gates: Mutex<HashMap<CandidateId, Arc<StepGate>>>,
    connects: Mutex<Vec<CandidateId>>,
    active: Mutex<Option<CandidateId>>,
    disconnects: Mutex<usize>,
}

impl RecordingConnectionGateway {
    /// Gateway where every connect succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make connects to `id` fail.
    pub fn failing_for(self, id: &str) -> Self {
        self.failing.lock().insert(CandidateId::new(id));
        self
    }

    /// Park connects to `id` on the returned gate.
    pub fn gate(&self, id: &str) -> Arc<StepGate> {
        let gate = Arc::new(StepGate::default());
        self.gates
            .lock()
            .insert(CandidateId::new(id), Arc::clone(&gate));
        gate
    }

    /// Candidates passed to `connect`, in order.
    pub fn connect_calls(&self) -> Vec<CandidateId> {
        self.connects.lock().clone()
    }

    /// Currently connected candidate.
    pub fn active(&self) -> Option<CandidateId> {
        self.active.lock().clone()
    }

    /// Number of successful disconnects.
    pub fn disconnect_count(&self) -> usize {
        *self.disconnects.lock()
    }
}

#[async_trait]
impl ConnectionGateway for RecordingConnectionGateway {
    async fn connect(&self, candidate: &Candidate) -> Result<(), ConnectError> {
        self.connects.lock().push(candidate.id.clone());

        let gate = self.gates.lock().get(&candidate.id).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        if self.failing.lock().contains(&candidate.id) {
            return Err(ConnectError::Failed {
                candidate: candidate.id.to_string(),
                reason: "scripted failure".into(),
            });
        }

        *self.active.lock() = Some(candidate.id.clone());
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ConnectError> {
        let previous = self.active.lock().take();
        match previous {
            Some(_) => {
                *self.disconnects.lock() += 1;
                Ok(())
            }
            None => Err(ConnectError::NotConnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unscripted_host_fails() {
        let gateway = ScriptedProbeGateway::new();
        let result = gateway.probe("nowhere.test", 443, 1, 1).await.unwrap();
        assert!(!result.success);
        assert_eq!(gateway.probed_hosts(), vec!["nowhere.test".to_string()]);
    }

    #[tokio::test]
    async fn test_recording_gateway_disconnect_requires_connection() {
        let gateway = RecordingConnectionGateway::new().failing_for("b");
        assert_eq!(gateway.disconnect().await, Err(ConnectError::NotConnected));

        assert!(gateway.connect(&candidate("b")).await.is_err());
        assert!(gateway.active().is_none());

        gateway.connect(&candidate("a")).await.unwrap();
        assert_eq!(gateway.active(), Some(CandidateId::new("a")));
        gateway.disconnect().await.unwrap();
        assert_eq!(gateway.disconnect_count(), 1);
    }
}
