//! Repository governance checks.
//!
//! The [`GovernancePolicy`] trait is the seam for a real policy engine.
//! [`StaticGovernancePolicy`] returns a constant "aligned" verdict.

use crate::analysis::short_digest;
use crate::models::GovernanceResult;
use async_trait::async_trait;
use chrono::Utc;

/// Number of policies the static verdict claims to have evaluated.
pub const POLICIES_CHECKED: u32 = 8;

/// Coherence score reported by the static verdict.
pub const COHERENCE_SCORE: u32 = 85;

/// Evaluates a repository against governance policies.
#[async_trait]
pub trait GovernancePolicy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Check `repository`, considering the listed `files`.
    async fn check(&self, repository: &str, files: &[String]) -> GovernanceResult;
}

/// Constant verdict keyed only by repository name and file count.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGovernancePolicy;

#[async_trait]
impl GovernancePolicy for StaticGovernancePolicy {
    fn name(&self) -> &str {
        "static"
    }

    async fn check(&self, repository: &str, files: &[String]) -> GovernanceResult {
        static_verdict(repository, files)
    }
}

/// Build the constant governance verdict.
pub fn static_verdict(repository: &str, files: &[String]) -> GovernanceResult {
    GovernanceResult {
        check_id: short_digest(repository, 12),
        timestamp: Utc::now(),
        repository: repository.to_string(),
        governance_status: "aligned".to_string(),
        compliant: true,
        coherence_score: COHERENCE_SCORE,
        violations: Vec::new(),
        warnings: Vec::new(),
        policies_checked: POLICIES_CHECKED,
        files_checked: files.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_verdict_shape() {
        let files = vec!["main.py".to_string(), "lib.py".to_string()];
        let result = static_verdict("acme/payments", &files);

        assert_eq!(result.repository, "acme/payments");
        assert_eq!(result.governance_status, "aligned");
        assert!(result.compliant);
        assert_eq!(result.coherence_score, 85);
        assert!(result.violations.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.policies_checked, 8);
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.check_id, short_digest("acme/payments", 12));
    }

    #[test]
    fn test_check_id_ignores_files() {
        let a = static_verdict("repo", &[]);
        let b = static_verdict("repo", &["x.py".to_string()]);
        assert_eq!(a.check_id, b.check_id);
        assert_eq!(a.files_checked, 0);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(static_verdict("repo", &[])).unwrap();
        for key in [
            "check_id",
            "timestamp",
            "repository",
            "governance_status",
            "compliant",
            "coherence_score",
            "violations",
            "warnings",
            "policies_checked",
            "files_checked",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[tokio::test]
    async fn test_policy_trait() {
        let policy = StaticGovernancePolicy;
        let result = policy.check("repo", &["a".to_string()]).await;
        assert_eq!(policy.name(), "static");
        assert_eq!(result.files_checked, 1);
    }
}
