//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the selection API offered to callers
//! - **Driven Ports (Outbound):** probe, connection and config SPIs

pub mod inbound;
pub mod outbound;

pub use inbound::ProbeSelectionApi;
pub use outbound::{ConfigProvider, ConnectError, ConnectionGateway, ProbeError, ProbeGateway};
