//! # Concurrent Workflow Flows
//!
//! A batch run and an auto-connect run share one result store and one
//! in-flight tracker. These flows drive both from separate tasks on a
//! multi-threaded runtime.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;

    use vt_01_probe_selection::testing::{
        candidate, RecordingConnectionGateway, ScriptedProbeGateway,
    };
    use vt_01_probe_selection::{
        AttemptVerdict, AutoConnectOutcome, CandidateId, ConnectionGateway, ProbeGateway,
        ProbeResult, ProbeSelectionApi, ProbeSelectionService, SelectionConfig, WorkflowState,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type DynService = ProbeSelectionService<dyn ProbeGateway, dyn ConnectionGateway>;

    const STEP_TIMEOUT: Duration = Duration::from_secs(5);

    fn dyn_service(
        prober: Arc<ScriptedProbeGateway>,
        connector: Arc<RecordingConnectionGateway>,
    ) -> Arc<DynService> {
        let prober: Arc<dyn ProbeGateway> = prober;
        let connector: Arc<dyn ConnectionGateway> = connector;
        Arc::new(ProbeSelectionService::new(
            SelectionConfig::for_testing(),
            prober,
            connector,
        ))
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_batch_and_auto_connect_never_probe_same_candidate_twice() {
        let prober = Arc::new(
            ScriptedProbeGateway::new()
                .with_result("a.test", ProbeResult::success(30))
                .with_result("b.test", ProbeResult::success(40))
                .with_result("c.test", ProbeResult::success(50)),
        );
        let gate = prober.gate("a.test");
        let connector = Arc::new(RecordingConnectionGateway::new());
        let service = dyn_service(Arc::clone(&prober), Arc::clone(&connector));
        let candidates = vec![candidate("a"), candidate("b"), candidate("c")];

        let batch = {
            let service = Arc::clone(&service);
            let candidates = candidates.clone();
            tokio::spawn(async move { service.probe_all(&candidates).await })
        };

        timeout(STEP_TIMEOUT, gate.wait_entered()).await.unwrap();
        assert!(service.is_in_flight(&CandidateId::new("a")));

        let report = timeout(STEP_TIMEOUT, service.auto_connect(&candidates))
            .await
            .unwrap()
            .unwrap();
        gate.release();
        let summary = timeout(STEP_TIMEOUT, batch).await.unwrap().unwrap().unwrap();

        assert_eq!(report.attempts[0].verdict, AttemptVerdict::SkippedInFlight);
        assert_eq!(report.outcome.connected(), Some(&candidate("b")));
        assert_eq!(summary.attempted, 3);

        let a_probes = prober
            .probed_hosts()
            .into_iter()
            .filter(|host| host == "a.test")
            .count();
        assert_eq!(a_probes, 1);
        assert!(service.in_flight().is_empty());
        assert_eq!(service.all_results().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_from_another_task() {
        let prober = Arc::new(ScriptedProbeGateway::new().with_result("a.test", ProbeResult::success(5)));
        let gate = prober.gate("a.test");
        let service = dyn_service(Arc::clone(&prober), Arc::new(RecordingConnectionGateway::new()));
        let candidates = vec![candidate("a"), candidate("b"), candidate("c"), candidate("d")];

        let batch = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.probe_all(&candidates).await })
        };

        timeout(STEP_TIMEOUT, gate.wait_entered()).await.unwrap();
        let canceller = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.cancel_batch() })
        };
        assert!(canceller.await.unwrap());
        gate.release();

        let summary = timeout(STEP_TIMEOUT, batch).await.unwrap().unwrap().unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.attempted, 1);
        assert_eq!(prober.probed_hosts(), vec!["a.test"]);
        assert_eq!(service.batch_state(), WorkflowState::Done);

        // The next run starts with a fresh token
        let rerun = service.probe_all(&[candidate("b")]).await.unwrap();
        assert!(!rerun.cancelled);
    }

    #[tokio::test]
    async fn test_history_from_batch_drives_auto_connect_order() {
        let prober = Arc::new(
            ScriptedProbeGateway::new()
                .with_result("slow.test", ProbeResult::success(400))
                .with_result("fast.test", ProbeResult::success(20))
                .with_result("down.test", ProbeResult::failure("refused")),
        );
        let connector = Arc::new(RecordingConnectionGateway::new());
        let service = dyn_service(Arc::clone(&prober), Arc::clone(&connector));
        let candidates = vec![candidate("down"), candidate("slow"), candidate("fast")];

        service.probe_all(&candidates).await.unwrap();
        let report = service.auto_connect(&candidates).await.unwrap();

        assert_eq!(
            report.outcome,
            AutoConnectOutcome::Connected {
                candidate: candidate("fast"),
                latency_ms: 20,
                attempted: 1,
            }
        );
        assert_eq!(connector.connect_calls(), vec![CandidateId::new("fast")]);
    }

    #[tokio::test]
    async fn test_service_behind_trait_object() {
        let prober = Arc::new(ScriptedProbeGateway::new().with_result("a.test", ProbeResult::success(5)));
        let connector = Arc::new(RecordingConnectionGateway::new().failing_for("a"));
        let api: Arc<dyn ProbeSelectionApi> = dyn_service(prober, Arc::clone(&connector));

        let report = api.auto_connect(&[candidate("a")]).await.unwrap();

        assert_eq!(report.outcome, AutoConnectOutcome::Exhausted { attempted: 1 });
        assert_eq!(report.connect_calls(), 1);
        assert!(api.get_result(&CandidateId::new("a")).is_some());

        let json = serde_json::to_value(&report.outcome).unwrap();
        assert_eq!(json["outcome"], "exhausted");

        api.clear_results();
        assert!(api.all_results().is_empty());
    }
}
