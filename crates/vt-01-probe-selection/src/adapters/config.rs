use std::collections::HashSet;

use thiserror::Error;

use crate::config::SelectionConfig;
use crate::domain::Candidate;
use crate::ports::ConfigProvider;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },
    /// TOML parsing error.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// Parsed but semantically invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Reject duplicate candidate ids, empty hosts and port 0.
pub fn validate_candidates(candidates: &[Candidate]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        if !seen.insert(&candidate.id) {
            return Err(ConfigError::Invalid(format!(
                "duplicate candidate id {}",
                candidate.id
            )));
        }
        if candidate.host.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "candidate {} has an empty host",
                candidate.id
            )));
        }
        if candidate.port == 0 {
            return Err(ConfigError::Invalid(format!(
                "candidate {} has port 0",
                candidate.id
            )));
        }
    }
    Ok(())
}

// ============================================================================
// StaticConfigProvider - In-memory config
// ============================================================================

/// Static configuration provider.
///
/// Useful for tests and embedding. For files, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    candidates: Vec<Candidate>,
    config: SelectionConfig,
}

impl StaticConfigProvider {
    /// Create with default tuning and no candidates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these candidates.
    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Use this tuning.
    #[must_use]
    pub fn with_config(mut self, config: SelectionConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn candidates(&self) -> Vec<Candidate> {
        self.candidates.clone()
    }

    fn selection_config(&self) -> SelectionConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Config file loading (requires "network" feature)
// ============================================================================

#[cfg(feature = "network")]
mod toml_config {
    use std::fs;
    use std::path::Path;

    use serde::Deserialize;
    use tracing::debug;

    use super::*;
    use crate::domain::ProbeParams;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct ConfigFile {
        #[serde(default)]
        batch: ProbeSection,
        #[serde(default)]
        auto_connect: AutoConnectSection,
        #[serde(default)]
        candidates: Vec<CandidateEntry>,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct ProbeSection {
        count: Option<u32>,
        timeout_secs: Option<u64>,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct AutoConnectSection {
        count: Option<u32>,
        timeout_secs: Option<u64>,
        acceptance_threshold_ms: Option<u64>,
        connect_timeout_secs: Option<u64>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct CandidateEntry {
        id: String,
        name: Option<String>,
        host: String,
        port: u16,
    }

    /// TOML-based configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [batch]
    /// count = 3
    /// timeout_secs = 5
    ///
    /// [auto_connect]
    /// count = 2
    /// timeout_secs = 3
    /// acceptance_threshold_ms = 3000
    ///
    /// [[candidates]]
    /// id = "tokyo-1"
    /// name = "Tokyo 1"
    /// host = "203.0.113.10"
    /// port = 443
    /// ```
    ///
    /// Missing sections and keys fall back to `SelectionConfig::default()`.
    /// A missing `name` falls back to the id.
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        candidates: Vec<Candidate>,
        config: SelectionConfig,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if the file cannot be read, parsed or validated.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        ///
        /// # Errors
        ///
        /// `Parse` for malformed TOML, `Invalid` for duplicate ids, empty
        /// hosts, port 0 or zero probe counts.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let defaults = SelectionConfig::default();
            let batch = ProbeParams::new(
                file.batch.count.unwrap_or(defaults.batch.count),
                file.batch.timeout_secs.unwrap_or(defaults.batch.timeout_secs),
            );
            let ac = file.auto_connect;
            let auto_connect = ProbeParams::new(
                ac.count.unwrap_or(defaults.auto_connect.count),
                ac.timeout_secs.unwrap_or(defaults.auto_connect.timeout_secs),
            );
            if batch.count == 0 || auto_connect.count == 0 {
                return Err(ConfigError::Invalid("probe count must be at least 1".into()));
            }

            let config = SelectionConfig {
                batch,
                auto_connect,
                acceptance_threshold_ms: ac
                    .acceptance_threshold_ms
                    .unwrap_or(defaults.acceptance_threshold_ms),
                connect_timeout_secs: ac
                    .connect_timeout_secs
                    .unwrap_or(defaults.connect_timeout_secs),
            };

            let candidates: Vec<Candidate> = file
                .candidates
                .into_iter()
                .map(|entry| {
                    let name = entry.name.unwrap_or_else(|| entry.id.clone());
                    Candidate::new(entry.id, name, entry.host, entry.port)
                })
                .collect();
            validate_candidates(&candidates)?;

            debug!(
                candidates = candidates.len(),
                threshold_ms = config.acceptance_threshold_ms,
                "[vt-01] config parsed"
            );

            Ok(Self { candidates, config })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn candidates(&self) -> Vec<Candidate> {
            self.candidates.clone()
        }

        fn selection_config(&self) -> SelectionConfig {
            self.config.clone()
        }
    }
}

#[cfg(feature = "network")]
pub use toml_config::TomlConfigProvider;
