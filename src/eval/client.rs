// Player evaluation service client.
//
// Two compute endpoints: a numeric grade (relative to the roster's
// positional depth, which is why the full roster rides along) and a short
// narrative review. Both are plain JSON POSTs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::EngineError;

/// Request body for the grade endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GradeRequest {
    pub player_name: String,
    pub position: String,
    /// Full roster (player names) so the service can grade against
    /// positional scarcity and depth.
    pub roster_context: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GradeResponse {
    grade: f64,
}

/// Request body for the review endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    pub player_name: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReviewResponse {
    review: String,
}

/// Port for the external evaluation service.
///
/// The grade aggregator and the inspection flow both talk through this
/// trait; tests substitute counting/failing fakes.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn grade(&self, request: &GradeRequest) -> Result<f64, EngineError>;
    async fn review(&self, request: &ReviewRequest) -> Result<String, EngineError>;
}

/// Reqwest-backed evaluator speaking to the evaluation service.
pub struct HttpEvaluator {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEvaluator {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, EngineError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "evaluation request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::FetchFailed(format!("POST {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::FetchFailed(format!(
                "POST {url}: status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::FetchFailed(format!("decode {url}: {e}")))
    }
}

#[async_trait]
impl Evaluator for HttpEvaluator {
    async fn grade(&self, request: &GradeRequest) -> Result<f64, EngineError> {
        let response: GradeResponse = self.post_json("/player-grade", request).await?;
        Ok(response.grade)
    }

    async fn review(&self, request: &ReviewRequest) -> Result<String, EngineError> {
        let response: ReviewResponse = self.post_json("/player-review", request).await?;
        Ok(response.review)
    }
}

/// High-level wrapper that can be either an active evaluator or disabled.
///
/// Disabled (no service URL configured) fails every request immediately:
/// the team page renders ungraded and the inspector shows its fallback
/// text, with zero network cost.
pub enum EvalClient {
    Active(HttpEvaluator),
    Disabled,
}

impl EvalClient {
    /// Build an `EvalClient` from the application config. Returns `Active`
    /// when an evaluation base URL is configured, otherwise `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        match &config.evaluation.base_url {
            Some(url) if !url.is_empty() => EvalClient::Active(HttpEvaluator::new(url)),
            _ => EvalClient::Disabled,
        }
    }
}

#[async_trait]
impl Evaluator for EvalClient {
    async fn grade(&self, request: &GradeRequest) -> Result<f64, EngineError> {
        match self {
            EvalClient::Active(inner) => inner.grade(request).await,
            EvalClient::Disabled => Err(EngineError::FetchFailed(
                "evaluation service not configured".to_string(),
            )),
        }
    }

    async fn review(&self, request: &ReviewRequest) -> Result<String, EngineError> {
        match self {
            EvalClient::Active(inner) => inner.review(request).await,
            EvalClient::Disabled => Err(EngineError::FetchFailed(
                "evaluation service not configured".to_string(),
            )),
        }
    }
}
