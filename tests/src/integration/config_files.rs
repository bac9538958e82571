//! # Config File Flows
//!
//! A TOML file on disk loaded through `TomlConfigProvider` and handed to the
//! service.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use vt_01_probe_selection::adapters::{ConfigError, TomlConfigProvider};
    use vt_01_probe_selection::testing::{RecordingConnectionGateway, ScriptedProbeGateway};
    use vt_01_probe_selection::{
        CandidateId, ConfigProvider, ProbeResult, ProbeSelectionApi, ProbeSelectionService,
    };

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_loaded_config_drives_auto_connect() {
        let file = write_config(
            r#"
            [auto_connect]
            count = 1
            timeout_secs = 2
            acceptance_threshold_ms = 100

            [[candidates]]
            id = "far"
            host = "far.test"
            port = 443

            [[candidates]]
            id = "near"
            host = "near.test"
            port = 443
            "#,
        );
        let provider = TomlConfigProvider::load(file.path()).unwrap();

        let prober = Arc::new(
            ScriptedProbeGateway::new()
                .with_result("far.test", ProbeResult::success(250))
                .with_result("near.test", ProbeResult::success(30)),
        );
        let connector = Arc::new(RecordingConnectionGateway::new());
        let service = ProbeSelectionService::new(
            provider.selection_config(),
            Arc::clone(&prober),
            Arc::clone(&connector),
        );

        let report = service.auto_connect(&provider.candidates()).await.unwrap();

        assert_eq!(
            report.outcome.connected().map(|c| c.id.clone()),
            Some(CandidateId::new("near"))
        );
        let calls = prober.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.count == 1 && call.timeout_secs == 2));
    }

    #[test]
    fn test_duplicate_ids_rejected_on_load() {
        let file = write_config(
            r#"
            [[candidates]]
            id = "a"
            host = "a.test"
            port = 443

            [[candidates]]
            id = "a"
            host = "b.test"
            port = 443
            "#,
        );

        let err = TomlConfigProvider::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
