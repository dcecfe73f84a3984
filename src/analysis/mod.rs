//! Code analysis: scoring, recommendations, and statistics.
//!
//! Scoring is exposed through the [`CodeScorer`] capability so the local
//! heuristics and the remote Codexa engine are interchangeable.

pub mod aggregator;
pub mod heuristics;
pub mod recommendations;

pub use aggregator::*;
pub use heuristics::LocalHeuristicScorer;
pub use recommendations::generate_recommendations;

use crate::models::AnalysisResult;
use async_trait::async_trait;
use md5::{Digest, Md5};

/// Anything that can turn source code into an [`AnalysisResult`].
///
/// Implementations absorb their own failures: callers always get a result.
#[async_trait]
pub trait CodeScorer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Score `code` written in `language`.
    async fn score(&self, code: &str, language: &str) -> AnalysisResult;
}

/// First `len` hex characters of the MD5 digest of `input`.
///
/// Used for display identifiers only; collisions are tolerated.
pub fn short_digest(input: &str, len: usize) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(len);
    hex
}
