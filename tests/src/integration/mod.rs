//! Cross-component integration flows.

pub mod concurrent_runs;
pub mod config_files;
pub mod http_adapter;
pub mod tcp_adapters;
