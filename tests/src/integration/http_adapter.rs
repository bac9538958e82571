//! # HTTP Probe Flows
//!
//! `HttpProbeGateway` wired into auto-connect against small HTTP responders
//! on the loopback interface.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use vt_01_probe_selection::adapters::{HttpProbeGateway, TcpConnectionGateway};
    use vt_01_probe_selection::{
        AttemptVerdict, Candidate, CandidateId, ProbeSelectionApi, ProbeSelectionService,
        RejectionReason, SelectionConfig,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Answers each connection with `status_line`; silent connections are left open.
    async fn responder(status_line: &'static str) -> (u16, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let task = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    if matches!(stream.read(&mut buf).await, Ok(n) if n > 0) {
                        let reply = format!(
                            "HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                        );
                        let _ = stream.write_all(reply.as_bytes()).await;
                    }
                });
            }
        });
        (port, task)
    }

    fn local(id: &str, port: u16) -> Candidate {
        Candidate::new(id, id, "127.0.0.1", port)
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_error_status_rejected_with_latency_then_fallback() {
        let (broken, broken_server) = responder("503 Service Unavailable").await;
        let (healthy, healthy_server) = responder("204 No Content").await;

        let config = SelectionConfig {
            acceptance_threshold_ms: 3000,
            ..SelectionConfig::for_testing()
        };
        let connector = Arc::new(TcpConnectionGateway::new(config.connect_timeout_secs));
        let service = ProbeSelectionService::new(
            config,
            Arc::new(HttpProbeGateway::http("/generate_204").unwrap()),
            Arc::clone(&connector),
        );
        let candidates = vec![local("broken", broken), local("healthy", healthy)];

        let report = service.auto_connect(&candidates).await.unwrap();

        match &report.attempts[0].verdict {
            AttemptVerdict::Rejected {
                reason: RejectionReason::Unreachable,
                latency_ms: Some(_),
            } => {}
            other => panic!("unexpected verdict {other:?}"),
        }
        assert_eq!(report.outcome.connected(), Some(&local("healthy", healthy)));
        assert_eq!(connector.active(), Some(CandidateId::new("healthy")));

        let stored = service.get_result(&CandidateId::new("broken")).unwrap();
        assert!(!stored.success);
        assert_eq!(stored.error.as_deref(), Some("HTTP status 503"));
        // error answers never count as measured successes when ranking
        assert_eq!(stored.successful_latency(), None);

        service.disconnect().await.unwrap();
        broken_server.abort();
        healthy_server.abort();
    }
}
