//! # Probe Selection Engine
//!
//! **Subsystem ID:** 1
//!
//! This crate selects, from a set of candidate remote endpoints, the one worth
//! connecting to. It runs sequential latency probes, ranks candidates by
//! history and connects to the first one under a latency threshold, falling
//! back to the next candidate when a connection fails.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** Candidates, results, ranking, acceptance, run control
//! - **Ports Layer:** Trait definitions for probing, connecting and config
//! - **Service Layer:** Batch and auto-connect orchestrators over shared state
//! - **Adapters Layer:** Concrete implementations (feature-gated)
//!
//! ## Feature Flags
//!
//! - `network` - TCP probe, held TCP session, TOML config (tokio, toml)
//! - `test-utils` - Scripted gateways for tests
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use vt_01_probe_selection::{
//!     evaluate, rank_candidates, Acceptance, Candidate, CandidateId, ProbeResult,
//! };
//!
//! let candidates = vec![
//!     Candidate::new("a", "A", "10.0.0.1", 443),
//!     Candidate::new("b", "B", "10.0.0.2", 443),
//! ];
//! let mut history = HashMap::new();
//! history.insert(CandidateId::new("b"), ProbeResult::success(40));
//!
//! let ranked = rank_candidates(&candidates, &history);
//! assert_eq!(ranked[0].id, CandidateId::new("b"));
//!
//! let verdict = evaluate(&ProbeResult::success(40), 3000);
//! assert_eq!(verdict, Acceptance::Accepted { latency_ms: 40 });
//! ```

#![warn(missing_docs)]

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// ADAPTERS
// =============================================================================

/// Adapters for external integrations.
/// TCP and TOML adapters require feature `network`, the HTTP probe `http`
pub mod adapters;

/// Test utilities (ScriptedProbeGateway, RecordingConnectionGateway)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain entities
pub use domain::{
    Acceptance, AttemptRecord, AttemptVerdict, AutoConnectOutcome, AutoConnectReport,
    BatchSummary, CancellationToken, Candidate, CandidateId, InFlightGuard, InFlightTracker,
    ProbeParams, ProbeResult, RejectionReason, ResultStore, SelectionError, WorkflowControl,
    WorkflowKind, WorkflowState, DEFAULT_ACCEPTANCE_THRESHOLD_MS,
};

// Domain services
pub use domain::{evaluate, rank_candidates};

// Configuration
pub use config::SelectionConfig;

// Port traits
pub use ports::{
    ConfigProvider, ConnectError, ConnectionGateway, ProbeError, ProbeGateway, ProbeSelectionApi,
};

// Services
pub use service::{AutoConnectOrchestrator, BatchProbeOrchestrator, ProbeSelectionService};
