//! HTML rendering for the dashboard views.
//!
//! Pages are assembled from small section builders. All user-supplied
//! text is escaped before it reaches the page.

use crate::models::{AnalysisRecord, Issue, Statistics, Trend};

/// Number of analyses listed on the index page.
pub const INDEX_ANALYSES: usize = 10;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#1f2933}\
table{border-collapse:collapse}td,th{border:1px solid #cbd2d9;padding:.35rem .6rem}\
pre{background:#f5f7fa;padding:.6rem;overflow-x:auto}.card{border:1px solid #cbd2d9;\
border-radius:6px;padding:1rem;margin-bottom:1rem}.compliant{color:#1b873f}\
.needs_review{color:#c92a2a}";

/// Render the landing page: submission form and recent analyses.
pub fn render_index(analyses: &[AnalysisRecord]) -> String {
    let mut body = String::new();

    body.push_str("<h1>Codexa AI Code Reviewer</h1>\n");
    body.push_str(&generate_submit_section());
    body.push_str("<h2>Recent Analyses</h2>\n");

    if analyses.is_empty() {
        body.push_str("<p>No analyses yet. Submit some code to get started.</p>\n");
    }

    for record in analyses.iter().take(INDEX_ANALYSES) {
        body.push_str(&generate_record_card(record));
    }

    page("Codexa AI Code Reviewer", &body)
}

/// Render the analytics dashboard.
pub fn render_dashboard(stats: &Statistics, analyses: &[AnalysisRecord]) -> String {
    let mut body = String::new();

    body.push_str("<h1>Analytics Dashboard</h1>\n");
    body.push_str("<p><a href=\"/\">Back to reviewer</a></p>\n");
    body.push_str(&generate_stats_section(stats));
    body.push_str(&generate_language_section(stats));
    body.push_str(&generate_history_table(analyses));

    page("Codexa Dashboard", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn generate_submit_section() -> String {
    let mut section = String::new();

    section.push_str("<div class=\"card\">\n");
    section.push_str("<h2>Submit Code</h2>\n");
    section.push_str("<p>POST JSON to <code>/analyze</code> with <code>code</code>, ");
    section.push_str("<code>language</code> and <code>repository</code> fields.</p>\n");
    section.push_str("<p><a href=\"/dashboard\">Open analytics dashboard</a></p>\n");
    section.push_str("</div>\n");

    section
}

/// One analysis as a card with scores, issues, and recommendations.
fn generate_record_card(record: &AnalysisRecord) -> String {
    let mut card = String::new();
    let scores = &record.analysis.scores;
    let status = record.analysis.governance_status.to_string();

    card.push_str("<div class=\"card\">\n");
    card.push_str(&format!(
        "<h3>{} <small>{} &middot; {} &middot; {}</small></h3>\n",
        escape_html(&record.id),
        escape_html(&record.language),
        escape_html(&record.repository),
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    card.push_str(&format!(
        "<p>Quality {:.1} | Security {:.1} | Alignment {:.1} | Overall {:.2} | \
         <span class=\"{}\">{}</span></p>\n",
        scores.quality, scores.security, scores.alignment, scores.overall, status, status
    ));

    if !record.analysis.issues.is_empty() {
        card.push_str("<ul>\n");
        for issue in &record.analysis.issues {
            card.push_str(&generate_issue_item(issue));
        }
        card.push_str("</ul>\n");
    }

    if let Some(governance) = &record.governance {
        card.push_str(&format!(
            "<p>Governance: {} (coherence {}, {} policies, {} files)</p>\n",
            escape_html(&governance.governance_status),
            governance.coherence_score,
            governance.policies_checked,
            governance.files_checked
        ));
    }

    card.push_str("<ol>\n");
    for rec in &record.recommendations {
        card.push_str(&format!("<li>{}</li>\n", escape_html(rec)));
    }
    card.push_str("</ol>\n");

    card.push_str(&format!(
        "<pre>{}</pre>\n",
        escape_html(&record.code_preview)
    ));
    card.push_str("</div>\n");

    card
}

fn generate_issue_item(issue: &Issue) -> String {
    format!(
        "<li>{} <strong>{}</strong> {} - {} (line {})</li>\n",
        issue.severity.emoji(),
        issue.severity.to_string().to_uppercase(),
        issue.kind,
        escape_html(&issue.message),
        issue.line
    )
}

fn generate_stats_section(stats: &Statistics) -> String {
    let mut section = String::new();

    let trend = match stats.recent_trend {
        Trend::Stable => "stable",
        Trend::Improving => "improving",
        Trend::NeedsAttention => "needs attention",
    };

    section.push_str("<h2>Summary</h2>\n<table>\n");
    section.push_str(&format!(
        "<tr><th>Total analyses</th><td>{}</td></tr>\n",
        stats.total_analyses
    ));
    section.push_str(&format!(
        "<tr><th>Average quality</th><td>{:.2}</td></tr>\n",
        stats.avg_quality
    ));
    section.push_str(&format!(
        "<tr><th>Average security</th><td>{:.2}</td></tr>\n",
        stats.avg_security
    ));
    section.push_str(&format!(
        "<tr><th>Average alignment</th><td>{:.2}</td></tr>\n",
        stats.avg_alignment
    ));
    if let Some(overall) = stats.avg_overall {
        section.push_str(&format!(
            "<tr><th>Average overall</th><td>{:.2}</td></tr>\n",
            overall
        ));
    }
    section.push_str(&format!(
        "<tr><th>Compliance rate</th><td>{:.1}%</td></tr>\n",
        stats.compliance_rate
    ));
    section.push_str(&format!("<tr><th>Trend</th><td>{}</td></tr>\n", trend));
    section.push_str("</table>\n");

    section
}

fn generate_language_section(stats: &Statistics) -> String {
    if stats.languages.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("<h2>Languages</h2>\n<table>\n");
    section.push_str("<tr><th>Language</th><th>Analyses</th></tr>\n");

    let mut langs: Vec<_> = stats.languages.iter().collect();
    langs.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (lang, count) in langs {
        section.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(lang),
            count
        ));
    }
    section.push_str("</table>\n");

    section
}

fn generate_history_table(analyses: &[AnalysisRecord]) -> String {
    let mut section = String::new();

    section.push_str("<h2>All Analyses</h2>\n");
    if analyses.is_empty() {
        section.push_str("<p>No analyses recorded.</p>\n");
        return section;
    }

    section.push_str("<table>\n<tr><th>ID</th><th>When</th><th>Language</th>");
    section.push_str("<th>Repository</th><th>Overall</th><th>Status</th><th>Issues</th></tr>\n");

    for record in analyses {
        section.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&record.id),
            record.timestamp.format("%Y-%m-%d %H:%M"),
            escape_html(&record.language),
            escape_html(&record.repository),
            record.analysis.scores.overall,
            record.analysis.governance_status,
            record.analysis.issues.len()
        ));
    }
    section.push_str("</table>\n");

    section
}

/// Escape text for inclusion in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{calculate_statistics, generate_recommendations, heuristics::score_code};
    use crate::governance::static_verdict;

    fn record(code: &str, repository: &str) -> AnalysisRecord {
        let analysis = score_code(code, "python");
        let recommendations = generate_recommendations(&analysis);
        AnalysisRecord::new(
            code,
            "python".to_string(),
            repository.to_string(),
            analysis,
            Some(static_verdict(repository, &["main.py".to_string()])),
            recommendations,
        )
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_index_empty() {
        let html = render_index(&[]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("No analyses yet"));
    }

    #[test]
    fn test_index_escapes_code_preview() {
        let html = render_index(&[record("<b>password</b>", "acme/web")]);

        assert!(html.contains("&lt;b&gt;password&lt;/b&gt;"));
        assert!(!html.contains("<b>password</b>"));
        assert!(html.contains("CRITICAL: Potential hardcoded credentials detected"));
        assert!(html.contains("needs_review"));
        assert!(html.contains("Governance: aligned"));
    }

    #[test]
    fn test_index_limits_entries() {
        let records: Vec<_> = (0..15)
            .map(|n| record(&format!("v = {}", n), &format!("repo-{}", n)))
            .collect();
        let html = render_index(&records);

        assert!(html.contains("repo-9"));
        assert!(!html.contains("repo-10"));
    }

    #[test]
    fn test_dashboard_sections() {
        let records = vec![record("a = 1", "repo-a"), record("api_key = 2", "repo-b")];
        let stats = calculate_statistics(&records);
        let html = render_dashboard(&stats, &records);

        assert!(html.contains("Analytics Dashboard"));
        assert!(html.contains("<th>Total analyses</th><td>2</td>"));
        assert!(html.contains("Compliance rate</th><td>50.0%"));
        assert!(html.contains("Average overall"));
        assert!(html.contains("<td>python</td><td>2</td>"));
        assert!(html.contains("repo-b"));
    }

    #[test]
    fn test_dashboard_empty() {
        let html = render_dashboard(&Statistics::default(), &[]);
        assert!(html.contains("No analyses recorded."));
        assert!(html.contains("<td>stable</td>"));
        assert!(!html.contains("Average overall"));
        assert!(!html.contains("<h2>Languages</h2>"));
    }
}
