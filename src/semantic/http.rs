//! HTTP semantic reranker.
//!
//! Talks to any service that speaks the common rerank wire format:
//!
//! | Provider | Endpoint | Lite model | Full model |
//! |----------|----------|------------|------------|
//! | Jina AI | `/v1/rerank` | `jina-reranker-v1-tiny-en` | `jina-reranker-v2-base-multilingual` |
//! | Cohere | `/v2/rerank` | `rerank-english-v3.0` | `rerank-v3.5` |

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::config::SemanticConfig;
use super::result::{RerankResult, RerankTier};
use super::traits::SemanticReranker;
use crate::error::{RankError, Result};

/// HTTP-backed two-tier reranker.
///
/// ```ascii
/// ┌──────────────────────┐    HTTP     ┌─────────────────┐
/// │ HttpSemanticReranker │ ─────────►  │  Provider API   │
/// │                      │             │  (Jina/Cohere)  │
/// └──────────┬───────────┘             └────────┬────────┘
///            │                                  │
///            │   SemanticConfig                 │  JSON Response
///            │   - lite_model / full_model      │  - results[]
///            │   - base_url                     │    - index
///            │   - api_key                      │    - relevance_score
///            └──────────────────────────────────┘
/// ```
pub struct HttpSemanticReranker {
    client: Client,
    config: SemanticConfig,
}

impl HttpSemanticReranker {
    /// Create a reranker from config.
    ///
    /// Fails with [`RankError::ConfigError`] if the HTTP client cannot be
    /// built.
    pub fn new(config: SemanticConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RankError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a Jina reranker.
    pub fn jina(api_key: impl Into<String>) -> Result<Self> {
        Self::new(SemanticConfig::jina(api_key))
    }

    /// Create a Cohere reranker.
    pub fn cohere(api_key: impl Into<String>) -> Result<Self> {
        Self::new(SemanticConfig::cohere(api_key))
    }

    /// Create from `CASCADE_RERANK_*` environment variables, or `None` when
    /// no API key is set.
    pub fn from_env() -> Result<Option<Self>> {
        SemanticConfig::from_env()?.map(Self::new).transpose()
    }

    /// Active configuration.
    pub fn config(&self) -> &SemanticConfig {
        &self.config
    }

    fn build_request(
        &self,
        query: &str,
        documents: &[String],
        tier: RerankTier,
        top_n: Option<usize>,
    ) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "model": self.config.model(tier),
            "query": query,
            "documents": documents,
        });
        if let Some(n) = top_n {
            payload["top_n"] = serde_json::json!(n);
        }
        payload
    }

    fn parse_response(&self, response: serde_json::Value) -> Result<Vec<RerankResult>> {
        let results = response
            .get("results")
            .and_then(|r| r.as_array())
            .ok_or_else(|| RankError::InvalidResponse("Missing results array".to_string()))?;

        if results.is_empty() {
            warn!("Rerank API returned empty results");
            return Ok(vec![]);
        }

        let mut rerank_results = Vec::with_capacity(results.len());
        for result in results {
            let index = result
                .get("index")
                .and_then(|i| i.as_i64())
                .ok_or_else(|| {
                    RankError::InvalidResponse("Missing index in rerank result".to_string())
                })?;
            let index = usize::try_from(index).map_err(|_| RankError::NegativeIndex(index))?;
            let score = result
                .get("relevance_score")
                .and_then(|s| s.as_f64())
                .ok_or_else(|| {
                    RankError::InvalidResponse(
                        "Missing relevance_score in rerank result".to_string(),
                    )
                })?;

            rerank_results.push(RerankResult {
                index,
                relevance_score: score,
            });
        }

        rerank_results.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(rerank_results)
    }

    fn status_error(status: StatusCode, body: String) -> RankError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RankError::AuthError(format!("{}: {}", status.as_u16(), body))
            }
            StatusCode::TOO_MANY_REQUESTS => RankError::RateLimited(body),
            _ => RankError::ApiError(format!("Rerank API error ({}): {}", status.as_u16(), body)),
        }
    }
}

#[async_trait]
impl SemanticReranker for HttpSemanticReranker {
    fn name(&self) -> &str {
        if self.config.base_url.contains("jina.ai") {
            "jina"
        } else if self.config.base_url.contains("cohere.com") {
            "cohere"
        } else {
            "http"
        }
    }

    fn model(&self, tier: RerankTier) -> &str {
        self.config.model(tier)
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        tier: RerankTier,
        top_k: Option<usize>,
    ) -> Result<Vec<RerankResult>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        let payload = self.build_request(query, documents, tier, top_k);

        debug!(
            "Rerank request: {} documents, tier: {}, model: {}",
            documents.len(),
            tier,
            self.config.model(tier)
        );

        let mut request = self
            .client
            .post(&self.config.base_url)
            .header("Content-Type", "application/json");

        if let Some(ref api_key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, error_text));
        }

        let body = response.text().await?;
        let response_json: serde_json::Value = serde_json::from_str(&body)?;

        let mut results = self.parse_response(response_json)?;
        if let Some(n) = top_k {
            results.truncate(n);
        }

        Ok(results)
    }
}
