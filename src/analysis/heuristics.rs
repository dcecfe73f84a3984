//! Rule-based fallback scoring.
//!
//! Used whenever the Codexa engine is unreachable. Two rules adjust fixed
//! baseline scores: a keyword search for credentials and a length check.

use super::{short_digest, CodeScorer};
use crate::models::{AnalysisResult, ComplianceStatus, Issue, IssueKind, Scores, Severity};
use async_trait::async_trait;
use chrono::Utc;

const BASE_QUALITY: f64 = 7.5;
const BASE_SECURITY: f64 = 8.0;
const BASE_ALIGNMENT: f64 = 7.0;

const CREDENTIAL_PENALTY: f64 = 2.0;
const COMPLEXITY_PENALTY: f64 = 0.5;

/// Character count above which code is flagged as complex.
const COMPLEXITY_CHARS: usize = 500;

const CREDENTIAL_KEYWORDS: &[&str] = &["password", "api_key"];

pub const CREDENTIALS_MESSAGE: &str = "Potential hardcoded credentials detected";
pub const COMPLEXITY_MESSAGE: &str = "Function may be too complex";

/// Local scorer applying fixed-threshold heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHeuristicScorer;

#[async_trait]
impl CodeScorer for LocalHeuristicScorer {
    fn name(&self) -> &str {
        "local-heuristic"
    }

    async fn score(&self, code: &str, language: &str) -> AnalysisResult {
        score_code(code, language)
    }
}

/// Score `code` with the local heuristics. The language tag is recorded
/// but does not influence scoring.
pub fn score_code(code: &str, language: &str) -> AnalysisResult {
    let mut quality = BASE_QUALITY;
    let mut security = BASE_SECURITY;
    let alignment = BASE_ALIGNMENT;
    let mut issues = Vec::new();

    if contains_credentials(code) {
        security -= CREDENTIAL_PENALTY;
        issues.push(Issue {
            kind: IssueKind::Security,
            severity: Severity::High,
            message: CREDENTIALS_MESSAGE.to_string(),
            line: 1,
        });
    }

    if code.chars().count() > COMPLEXITY_CHARS {
        quality -= COMPLEXITY_PENALTY;
        issues.push(Issue {
            kind: IssueKind::Quality,
            severity: Severity::Medium,
            message: COMPLEXITY_MESSAGE.to_string(),
            line: 1,
        });
    }

    AnalysisResult {
        analysis_id: short_digest(code, 12),
        timestamp: Utc::now(),
        language: language.to_string(),
        scores: Scores::new(quality, security, alignment),
        issues,
        lines_analyzed: count_lines(code),
        governance_status: ComplianceStatus::from_security(security),
    }
}

fn contains_credentials(code: &str) -> bool {
    let lowered = code.to_lowercase();
    CREDENTIAL_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Number of `\n`-separated segments; empty input counts as one line.
fn count_lines(code: &str) -> usize {
    code.split('\n').count()
}
