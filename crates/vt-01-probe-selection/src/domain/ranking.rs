//! # Candidate Ranking
//!
//! Orders candidates for auto-connect using cached probe results:
//!
//! 1. Candidates with a cached successful result come first
//! 2. Among those, lower recorded latency first
//! 3. Failed and unknown candidates are equivalent and keep input order
//!
//! The sort is stable, so any tie keeps the caller's order.

use std::collections::HashMap;

use super::entities::{Candidate, CandidateId, ProbeResult};

/// Rank candidates by prior success and latency.
///
/// Returns references into `candidates`; nothing is copied.
pub fn rank_candidates<'a>(
    candidates: &'a [Candidate],
    results: &HashMap<CandidateId, ProbeResult>,
) -> Vec<&'a Candidate> {
    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    ranked.sort_by_key(|candidate| rank_key(results.get(&candidate.id)));
    ranked
}

/// (tier, latency). Success without a measurement sorts after every
/// measured success.
fn rank_key(result: Option<&ProbeResult>) -> (u8, u64) {
    match result {
        Some(r) if r.success => (0, r.latency_ms.unwrap_or(u64::MAX)),
        _ => (1, 0),
    }
}
