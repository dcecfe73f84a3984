//! Statistics over stored analyses.
//!
//! This module reduces a snapshot of the analysis store into the summary
//! served by `/api/stats` and shown on the dashboard.

use crate::models::{AnalysisRecord, ComplianceStatus, Statistics, Trend};
use std::collections::HashMap;

/// Average quality above which the trend is reported as improving.
const IMPROVING_QUALITY: f64 = 7.0;

/// Compute summary statistics for the given records.
pub fn calculate_statistics(records: &[AnalysisRecord]) -> Statistics {
    if records.is_empty() {
        return Statistics::default();
    }

    let total = records.len();
    let count = total as f64;

    let avg_quality = records.iter().map(|r| r.analysis.scores.quality).sum::<f64>() / count;
    let avg_security = records.iter().map(|r| r.analysis.scores.security).sum::<f64>() / count;
    let avg_alignment = records.iter().map(|r| r.analysis.scores.alignment).sum::<f64>() / count;

    let compliant = records
        .iter()
        .filter(|r| r.analysis.governance_status == ComplianceStatus::Compliant)
        .count();

    let recent_trend = if avg_quality > IMPROVING_QUALITY {
        Trend::Improving
    } else {
        Trend::NeedsAttention
    };

    Statistics {
        total_analyses: total,
        avg_quality: round_to(avg_quality, 2),
        avg_security: round_to(avg_security, 2),
        avg_alignment: round_to(avg_alignment, 2),
        avg_overall: Some(round_to(
            (avg_quality + avg_security + avg_alignment) / 3.0,
            2,
        )),
        compliance_rate: round_to(compliant as f64 / count * 100.0, 1),
        languages: language_distribution(records),
        recent_trend,
    }
}

/// Count analyses per language tag.
pub fn language_distribution(records: &[AnalysisRecord]) -> HashMap<String, usize> {
    let mut dist: HashMap<String, usize> = HashMap::new();

    for record in records {
        *dist.entry(record.language.clone()).or_default() += 1;
    }

    dist
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
