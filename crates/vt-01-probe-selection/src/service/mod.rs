//! # Probe Selection Service
//!
//! High-level service implementing the `ProbeSelectionApi` port.
//!
//! The service wires the probe and connection adapters to the shared domain
//! state and runs the two workflows:
//!
//! - **Batch probe:** measure every candidate in order
//! - **Auto-connect:** rank by history, probe, connect to the first
//!   acceptable candidate and fall back on failure

// Semantic submodules
mod api;
mod auto_connect;
mod batch;
mod core;
mod probe;

// Re-export public API
pub use auto_connect::AutoConnectOrchestrator;
pub use batch::BatchProbeOrchestrator;
pub use self::core::{find_candidate, ProbeSelectionService};
