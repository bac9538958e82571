//! # TCP Adapter Flows
//!
//! The real TCP probe and held-session adapters wired into the service,
//! pointed at listeners on the loopback interface.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use vt_01_probe_selection::adapters::{TcpConnectionGateway, TcpProbeGateway};
    use vt_01_probe_selection::{
        AttemptVerdict, Candidate, CandidateId, ConnectError, ProbeParams, ProbeSelectionApi,
        ProbeSelectionService, RejectionReason, SelectionConfig,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type TcpService = ProbeSelectionService<TcpProbeGateway, TcpConnectionGateway>;

    /// Listener that accepts connections until the task is aborted.
    async fn open_listener() -> (u16, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let task = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        (port, task)
    }

    /// Port with nothing listening on it.
    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    fn local(id: &str, port: u16) -> Candidate {
        Candidate::new(id, id, "127.0.0.1", port)
    }

    fn tcp_service() -> (TcpService, Arc<TcpConnectionGateway>) {
        let config = SelectionConfig {
            acceptance_threshold_ms: 3000,
            ..SelectionConfig::for_testing()
        };
        let connector = Arc::new(TcpConnectionGateway::new(config.connect_timeout_secs));
        let service =
            ProbeSelectionService::new(config, Arc::new(TcpProbeGateway::new()), Arc::clone(&connector));
        (service, connector)
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_batch_over_tcp() {
        let (open, server) = open_listener().await;
        let closed = closed_port().await;
        let (service, _) = tcp_service();
        let candidates = vec![local("open", open), local("closed", closed)];

        let summary = service.probe_all(&candidates).await.unwrap();

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 1);

        let up = service.get_result(&CandidateId::new("open")).unwrap();
        assert!(up.success && up.latency_ms.is_some());
        let down = service.get_result(&CandidateId::new("closed")).unwrap();
        assert!(!down.success && down.latency_ms.is_none());
        assert!(down.error.is_some());

        server.abort();
    }

    #[tokio::test]
    async fn test_auto_connect_skips_unreachable_and_holds_session() {
        let (open, server) = open_listener().await;
        let closed = closed_port().await;
        let (service, connector) = tcp_service();
        let candidates = vec![local("closed", closed), local("open", open)];

        let report = service.auto_connect(&candidates).await.unwrap();

        assert_eq!(
            report.attempts[0].verdict,
            AttemptVerdict::Rejected {
                reason: RejectionReason::Unreachable,
                latency_ms: None,
            }
        );
        assert_eq!(report.outcome.connected(), Some(&local("open", open)));
        assert_eq!(connector.active(), Some(CandidateId::new("open")));

        service.disconnect().await.unwrap();
        assert!(connector.active().is_none());
        assert_eq!(service.disconnect().await, Err(ConnectError::NotConnected));

        server.abort();
    }

    #[tokio::test]
    async fn test_connectivity_check_single_attempt() {
        let (open, server) = open_listener().await;
        let (service, _) = tcp_service();

        let result = service
            .probe_candidate(&local("open", open), ProbeParams::connectivity(1))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.is_consistent());
        server.abort();
    }
}
