//! # Adapters
//!
//! Concrete implementations of the outbound ports.
//!
//! ## Adapters Provided
//!
//! - `StaticConfigProvider` - In-memory candidates and tuning
//! - `TomlConfigProvider` - Config file loading (requires "network" feature)
//! - `TcpProbeGateway` - TCP connect latency probe (requires "network" feature)
//! - `TcpConnectionGateway` - Held TCP session (requires "network" feature)
//! - `HttpProbeGateway` - HTTP request latency probe (requires "http" feature)
//!
//! ## Feature Flags
//!
//! - `network` - Enables tokio sockets and config file parsing
//! - `http` - Enables the `reqwest` based probe

/// Configuration providers
pub mod config;

/// TCP latency probe
#[cfg(feature = "network")]
pub mod tcp_probe;

/// HTTP latency probe
#[cfg(feature = "http")]
pub mod http_probe;

/// Held TCP session used as the connection
#[cfg(feature = "network")]
pub mod tcp_session;

// Re-export public API
pub use config::{validate_candidates, ConfigError, StaticConfigProvider};

#[cfg(feature = "network")]
pub use config::TomlConfigProvider;

#[cfg(feature = "network")]
pub use tcp_probe::TcpProbeGateway;

#[cfg(feature = "network")]
pub use tcp_session::TcpConnectionGateway;

#[cfg(feature = "http")]
pub use http_probe::HttpProbeGateway;
