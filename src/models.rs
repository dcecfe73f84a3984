//! Data models for the review service.
//!
//! This module contains the core data structures exchanged with the
//! Codexa engine, stored in memory, and returned over HTTP.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Maximum number of characters kept in a record's code preview.
pub const PREVIEW_CHARS: usize = 200;

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low severity - style issues, minor suggestions
    Low,
    /// Medium severity - code quality issues, potential bugs
    Medium,
    /// High severity - bugs, security concerns
    High,
    /// Critical severity - security vulnerabilities, major bugs
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

impl Severity {
    /// Returns an emoji representation of the severity.
    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Low => "🟢",
            Severity::Medium => "🟡",
            Severity::High => "🟠",
            Severity::Critical => "🔴",
        }
    }
}

/// Kind of an issue. Unknown kinds sent by the engine map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Security,
    Quality,
    #[serde(other)]
    Other,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Security => write!(f, "Security"),
            IssueKind::Quality => write!(f, "Quality"),
            IssueKind::Other => write!(f, "Other"),
        }
    }
}

/// A single finding reported for submitted code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    /// Line number (1-indexed). The local heuristic always reports 1.
    pub line: usize,
}

/// Score breakdown for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub quality: f64,
    pub security: f64,
    pub alignment: f64,
    /// Arithmetic mean of the three metrics, unrounded.
    pub overall: f64,
}

impl Scores {
    /// Build scores, deriving `overall` from the three metrics.
    pub fn new(quality: f64, security: f64, alignment: f64) -> Self {
        Self {
            quality,
            security,
            alignment,
            overall: (quality + security + alignment) / 3.0,
        }
    }
}

/// Compliance verdict derived from the security score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NeedsReview,
}

impl ComplianceStatus {
    /// Security threshold (inclusive) for a compliant verdict.
    pub const SECURITY_THRESHOLD: f64 = 7.0;

    pub fn from_security(security: f64) -> Self {
        if security >= Self::SECURITY_THRESHOLD {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::NeedsReview
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "compliant"),
            ComplianceStatus::NeedsReview => write!(f, "needs_review"),
        }
    }
}

/// Result of analyzing one piece of code, either from the Codexa engine
/// or from the local heuristic scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub language: String,
    pub scores: Scores,
    #[serde(default)]
    pub issues: Vec<Issue>,
    pub lines_analyzed: usize,
    pub governance_status: ComplianceStatus,
}

impl AnalysisResult {
    /// Issues at high severity, in report order.
    pub fn high_severity_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::High)
    }
}

/// Governance verdict for a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceResult {
    pub check_id: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub repository: String,
    pub governance_status: String,
    pub compliant: bool,
    pub coherence_score: u32,
    #[serde(default)]
    pub violations: Vec<serde_json::Value>,
    #[serde(default)]
    pub warnings: Vec<serde_json::Value>,
    pub policies_checked: u32,
    pub files_checked: usize,
}

/// Parse an engine timestamp.
///
/// Accepts RFC 3339 as well as ISO 8601 without an offset
/// (`2024-05-01T12:00:00.123456`), which is read as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}

/// One stored outcome of submitting code for review.
///
/// Records are created once per analyze request and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub language: String,
    pub repository: String,
    pub analysis: AnalysisResult,
    pub governance: Option<GovernanceResult>,
    pub recommendations: Vec<String>,
    pub code_preview: String,
}

impl AnalysisRecord {
    /// Assemble a record for the submitted code.
    pub fn new(
        code: &str,
        language: String,
        repository: String,
        analysis: AnalysisResult,
        governance: Option<GovernanceResult>,
        recommendations: Vec<String>,
    ) -> Self {
        Self {
            id: crate::analysis::short_digest(code, 8),
            timestamp: Utc::now(),
            language,
            repository,
            analysis,
            governance,
            recommendations,
            code_preview: code_preview(code),
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of the code, with `...` appended
/// when truncated.
pub fn code_preview(code: &str) -> String {
    match code.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &code[..cut]),
        None => code.to_string(),
    }
}

/// Trend label in the statistics summary.
///
/// `Stable` is only reported for an empty store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Stable,
    Improving,
    NeedsAttention,
}

/// Summary statistics over the stored analyses.
///
/// An empty summary serializes its averages and compliance rate as the
/// integer `0` and leaves out `avg_overall`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Statistics {
    pub total_analyses: usize,
    pub avg_quality: f64,
    pub avg_security: f64,
    pub avg_alignment: f64,
    #[serde(default)]
    pub avg_overall: Option<f64>,
    pub compliance_rate: f64,
    pub languages: HashMap<String, usize>,
    pub recent_trend: Trend,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            total_analyses: 0,
            avg_quality: 0.0,
            avg_security: 0.0,
            avg_alignment: 0.0,
            avg_overall: None,
            compliance_rate: 0.0,
            languages: HashMap::new(),
            recent_trend: Trend::Stable,
        }
    }
}

impl Serialize for Statistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let empty = self.total_analyses == 0;
        let fields = if self.avg_overall.is_some() { 8 } else { 7 };

        let mut state = serializer.serialize_struct("Statistics", fields)?;
        state.serialize_field("total_analyses", &self.total_analyses)?;
        serialize_metric(&mut state, "avg_quality", self.avg_quality, empty)?;
        serialize_metric(&mut state, "avg_security", self.avg_security, empty)?;
        serialize_metric(&mut state, "avg_alignment", self.avg_alignment, empty)?;
        if let Some(overall) = self.avg_overall {
            state.serialize_field("avg_overall", &overall)?;
        }
        serialize_metric(&mut state, "compliance_rate", self.compliance_rate, empty)?;
        state.serialize_field("languages", &self.languages)?;
        state.serialize_field("recent_trend", &self.recent_trend)?;
        state.end()
    }
}

fn serialize_metric<S: SerializeStruct>(
    state: &mut S,
    key: &'static str,
    value: f64,
    empty: bool,
) -> Result<(), S::Error> {
    if empty && value == 0.0 {
        state.serialize_field(key, &0u32)
    } else {
        state.serialize_field(key, &value)
    }
}

/// Payload of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub analyses_count: usize,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

/// Body of `POST /governance/check`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GovernanceRequest {
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}
