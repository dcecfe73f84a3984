//! Review orchestration.
//!
//! [`ReviewService`] runs an analyze request through scoring, governance,
//! and recommendations, then stores the resulting record.

use crate::analysis::{calculate_statistics, generate_recommendations, CodeScorer};
use crate::governance::GovernancePolicy;
use crate::models::{
    AnalysisRecord, AnalyzeRequest, GovernanceRequest, GovernanceResult, HealthStatus, Statistics,
};
use crate::store::AnalysisStore;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "codexa-ai-reviewer";

/// Language assumed when a request does not declare one.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Repository assumed for ad-hoc submissions. Governance is skipped for it.
pub const MANUAL_SUBMISSION: &str = "manual-submission";

/// File list used for the governance check attached to an analysis.
const ANALYZE_GOVERNANCE_FILES: &[&str] = &["main.py"];

/// Failures surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Code is required")]
    MissingCode,

    #[error("Repository name required")]
    MissingRepository,

    #[error("{0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ReviewError {
    /// Whether the error is a client-side validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, ReviewError::MissingCode | ReviewError::MissingRepository)
    }
}

/// Coordinates scoring, governance, and storage.
#[derive(Clone)]
pub struct ReviewService {
    scorer: Arc<dyn CodeScorer>,
    governance: Arc<dyn GovernancePolicy>,
    store: Arc<dyn AnalysisStore>,
}

impl ReviewService {
    pub fn new(
        scorer: Arc<dyn CodeScorer>,
        governance: Arc<dyn GovernancePolicy>,
        store: Arc<dyn AnalysisStore>,
    ) -> Self {
        info!(
            "Review service using scorer '{}' and governance '{}'",
            scorer.name(),
            governance.name()
        );
        Self {
            scorer,
            governance,
            store,
        }
    }

    /// Analyze submitted code and store the record.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisRecord, ReviewError> {
        let code = request
            .code
            .filter(|c| !c.is_empty())
            .ok_or(ReviewError::MissingCode)?;
        let language = request
            .language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let repository = request
            .repository
            .unwrap_or_else(|| MANUAL_SUBMISSION.to_string());

        debug!(
            "Analyzing {} chars of {} for {}",
            code.len(),
            language,
            repository
        );

        let analysis = self.scorer.score(&code, &language);
        let governance = async {
            if repository == MANUAL_SUBMISSION {
                None
            } else {
                let files: Vec<String> = ANALYZE_GOVERNANCE_FILES
                    .iter()
                    .map(|f| f.to_string())
                    .collect();
                Some(self.governance.check(&repository, &files).await)
            }
        };
        let (analysis, governance) = tokio::join!(analysis, governance);

        let recommendations = generate_recommendations(&analysis);
        let record = AnalysisRecord::new(
            &code,
            language,
            repository,
            analysis,
            governance,
            recommendations,
        );

        let evicted = self.store.append(record.clone());
        if !evicted.is_empty() {
            debug!("Evicted {} old analyses", evicted.len());
        }

        info!(
            "Stored analysis {} (overall {:.2}, {})",
            record.id, record.analysis.scores.overall, record.analysis.governance_status
        );

        Ok(record)
    }

    /// Run a standalone governance check.
    pub async fn governance_check(
        &self,
        request: GovernanceRequest,
    ) -> Result<GovernanceResult, ReviewError> {
        let repository = request
            .repository
            .filter(|r| !r.is_empty())
            .ok_or(ReviewError::MissingRepository)?;
        let files = request.files.unwrap_or_default();

        Ok(self.governance.check(&repository, &files).await)
    }

    /// Summary statistics over the current store contents.
    pub fn statistics(&self) -> Statistics {
        calculate_statistics(&self.store.snapshot())
    }

    /// Service health summary.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            analyses_count: self.store.len(),
        }
    }

    /// Up to `n` most recent records.
    pub fn recent(&self, n: usize) -> Vec<AnalysisRecord> {
        self.store.recent(n)
    }

    /// All stored records, most recent first.
    pub fn analyses(&self) -> Vec<AnalysisRecord> {
        self.store.snapshot()
    }
}
