//! Domain Layer - Pure selection logic with no I/O
//!
//! This module contains:
//! - Candidates, probe results and probe parameters
//! - Shared run state (result store, in-flight tracker)
//! - Cooperative cancellation and single-flight workflow control
//! - Candidate ranking and the acceptance policy
//! - Structured run outcomes

pub mod acceptance;
pub mod cancellation;
pub mod entities;
pub mod errors;
pub mod in_flight;
pub mod outcomes;
pub mod ranking;
pub mod result_store;
pub mod workflow;

pub use acceptance::*;
pub use cancellation::*;
pub use entities::*;
pub use errors::*;
pub use in_flight::*;
pub use outcomes::*;
pub use ranking::*;
pub use result_store::*;
pub use workflow::*;
