//! Advisory text derived from an analysis.

use crate::models::AnalysisResult;

/// Scores strictly below this trigger the matching advice.
const SCORE_THRESHOLD: f64 = 7.0;

const QUALITY_ADVICE: [&str; 2] = [
    "Consider refactoring for better code quality and maintainability",
    "Add comprehensive documentation and type hints",
];

const SECURITY_ADVICE: [&str; 2] = [
    "Review security issues immediately - high priority",
    "Implement input validation and sanitization",
];

const ALIGNMENT_ADVICE: [&str; 2] = [
    "Ensure code follows organizational governance standards",
    "Review and update documentation to match policies",
];

pub const POSITIVE_FEEDBACK: [&str; 2] = [
    "Excellent work! Code meets all governance standards",
    "Continue following best practices",
];

/// Build the recommendation list for an analysis.
///
/// Each rule appends independently; positive feedback is only given when
/// no rule fired.
pub fn generate_recommendations(analysis: &AnalysisResult) -> Vec<String> {
    let scores = &analysis.scores;
    let mut recommendations = Vec::new();

    if scores.quality < SCORE_THRESHOLD {
        recommendations.extend(QUALITY_ADVICE.iter().map(|s| s.to_string()));
    }

    if scores.security < SCORE_THRESHOLD {
        recommendations.extend(SECURITY_ADVICE.iter().map(|s| s.to_string()));
    }

    if scores.alignment < SCORE_THRESHOLD {
        recommendations.extend(ALIGNMENT_ADVICE.iter().map(|s| s.to_string()));
    }

    for issue in analysis.high_severity_issues() {
        recommendations.push(format!("CRITICAL: {}", issue.message));
    }

    if recommendations.is_empty() {
        recommendations.extend(POSITIVE_FEEDBACK.iter().map(|s| s.to_string()));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::heuristics::score_code;
    use crate::models::{Issue, IssueKind, Scores, Severity};

    fn analysis_with(scores: Scores, issues: Vec<Issue>) -> AnalysisResult {
        let mut analysis = score_code("", "python");
        analysis.scores = scores;
        analysis.issues = issues;
        analysis
    }

    fn issue(severity: Severity, message: &str) -> Issue {
        Issue {
            kind: IssueKind::Security,
            severity,
            message: message.to_string(),
            line: 1,
        }
    }

    #[test]
    fn test_baseline_gets_positive_feedback() {
        let recs = generate_recommendations(&analysis_with(Scores::new(7.5, 8.0, 7.0), vec![]));
        assert_eq!(recs, POSITIVE_FEEDBACK.to_vec());
    }

    #[test]
    fn test_threshold_is_strict() {
        let recs = generate_recommendations(&analysis_with(Scores::new(7.0, 7.0, 7.0), vec![]));
        assert_eq!(recs, POSITIVE_FEEDBACK.to_vec());
    }

    #[test]
    fn test_all_low_scores_in_order() {
        let recs = generate_recommendations(&analysis_with(Scores::new(5.0, 5.0, 5.0), vec![]));
        let expected: Vec<&str> = QUALITY_ADVICE
            .iter()
            .chain(SECURITY_ADVICE.iter())
            .chain(ALIGNMENT_ADVICE.iter())
            .copied()
            .collect();
        assert_eq!(recs, expected);
    }

    #[test]
    fn test_high_issues_become_critical_lines() {
        let issues = vec![
            issue(Severity::High, "first"),
            issue(Severity::Medium, "ignored"),
            issue(Severity::High, "second"),
        ];
        let recs = generate_recommendations(&analysis_with(Scores::new(8.0, 8.0, 8.0), issues));
        assert_eq!(recs, vec!["CRITICAL: first", "CRITICAL: second"]);
    }

    #[test]
    fn test_credentials_heuristic_output() {
        let analysis = score_code("password = 'secret'", "python");
        let recs = generate_recommendations(&analysis);
        assert_eq!(
            recs,
            vec![
                SECURITY_ADVICE[0],
                SECURITY_ADVICE[1],
                "CRITICAL: Potential hardcoded credentials detected",
            ]
        );
    }

    #[test]
    fn test_critical_severity_not_promoted() {
        let issues = vec![issue(Severity::Critical, "remote finding")];
        let recs = generate_recommendations(&analysis_with(Scores::new(8.0, 8.0, 8.0), issues));
        assert_eq!(recs, POSITIVE_FEEDBACK.to_vec());
    }
}
