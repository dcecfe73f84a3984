//! HTTP client for the Codexa analysis engine.
//!
//! Each call is a single attempt bounded by the configured timeout. Any
//! failure (transport, non-200 status, undecodable body) is logged and
//! replaced by the local fallback, so callers always receive a result.

use crate::analysis::{CodeScorer, LocalHeuristicScorer};
use crate::governance::{GovernancePolicy, StaticGovernancePolicy};
use crate::models::{AnalysisResult, GovernanceResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Header carrying the shared secret expected by the engine.
pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";

/// Configuration for the remote client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://codexa-engine-func.azurewebsites.net/api`.
    pub api_base: String,
    /// Optional shared secret sent as [`FUNCTION_KEY_HEADER`].
    pub function_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://codexa-engine-func.azurewebsites.net/api".to_string(),
            function_key: None,
            timeout_seconds: 10,
        }
    }
}

/// Why a remote call was abandoned in favor of the fallback.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to Codexa at {0}")]
    Connect(String),

    #[error("failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Codexa API returned {0}")]
    Status(StatusCode),

    #[error("failed to parse Codexa response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct AnalyzePayload<'a> {
    code: &'a str,
    language: &'a str,
}

#[derive(Debug, Serialize)]
struct GovernancePayload<'a> {
    repository: &'a str,
    files: &'a [String],
}

/// Codexa engine client with local fallbacks.
pub struct RemoteAnalysisClient {
    config: ClientConfig,
    http_client: reqwest::Client,
    fallback_scorer: LocalHeuristicScorer,
    fallback_policy: StaticGovernancePolicy,
}

impl RemoteAnalysisClient {
    /// Create a client for the configured engine.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
            fallback_scorer: LocalHeuristicScorer,
            fallback_policy: StaticGovernancePolicy,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// POST `body` as JSON and decode a 200 response.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let mut request = self.http_client.post(&url).json(body);
        if let Some(key) = self.config.function_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.header(FUNCTION_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout(self.config.timeout_seconds)
            } else if e.is_connect() {
                RemoteError::Connect(self.config.api_base.clone())
            } else {
                RemoteError::Transport(e)
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RemoteError::Status(status));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout(self.config.timeout_seconds)
            } else {
                RemoteError::Decode(e)
            }
        })
    }

    /// Request an analysis from the engine without falling back.
    pub async fn try_analyze(&self, code: &str, language: &str) -> Result<AnalysisResult, RemoteError> {
        self.post_json("analyze", &AnalyzePayload { code, language })
            .await
    }

    /// Request a governance check from the engine without falling back.
    pub async fn try_governance(
        &self,
        repository: &str,
        files: &[String],
    ) -> Result<GovernanceResult, RemoteError> {
        self.post_json("governance/check", &GovernancePayload { repository, files })
            .await
    }
}

#[async_trait]
impl CodeScorer for RemoteAnalysisClient {
    fn name(&self) -> &str {
        "codexa"
    }

    async fn score(&self, code: &str, language: &str) -> AnalysisResult {
        match self.try_analyze(code, language).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Codexa analyze unavailable ({}), using local heuristics", e);
                self.fallback_scorer.score(code, language).await
            }
        }
    }
}

#[async_trait]
impl GovernancePolicy for RemoteAnalysisClient {
    fn name(&self) -> &str {
        "codexa"
    }

    async fn check(&self, repository: &str, files: &[String]) -> GovernanceResult {
        match self.try_governance(repository, files).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Codexa governance unavailable ({}), using static policy", e);
                self.fallback_policy.check(repository, files).await
            }
        }
    }
}
