//! Semantic reranker tests.

use super::*;
use crate::candidate::Candidate;
use crate::error::RankError;
use serial_test::serial;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn docs() -> Vec<String> {
    vec![
        "The capital of France is Paris.".to_string(),
        "Tokyo is the capital of Japan.".to_string(),
        "Bananas are yellow.".to_string(),
    ]
}

fn candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("https://a.com", "Paris", "The capital of France is Paris."),
        Candidate::new("https://b.com", "Tokyo", "Tokyo is the capital of Japan."),
    ]
}

async fn http_reranker(server: &MockServer) -> HttpSemanticReranker {
    let config = SemanticConfig::jina("test-key")
        .with_base_url(format!("{}/v1/rerank", server.uri()))
        .with_timeout(Duration::from_secs(2));
    HttpSemanticReranker::new(config).expect("client builds")
}

// ---- config ----

#[test]
fn test_semantic_config_defaults() {
    let config = SemanticConfig::default();
    assert!(config.api_key.is_none());
    assert!(config.base_url.contains("jina.ai"));
    assert_eq!(config.model(RerankTier::Lite), "jina-reranker-v1-tiny-en");
    assert_eq!(
        config.model(RerankTier::Full),
        "jina-reranker-v2-base-multilingual"
    );
}

#[test]
fn test_cohere_config() {
    let config = SemanticConfig::cohere("test-key");
    assert_eq!(config.api_key.as_deref(), Some("test-key"));
    assert!(config.base_url.contains("cohere.com"));
    assert_eq!(config.full_model, "rerank-v3.5");
}

fn clear_rerank_env() {
    for var in [
        "CASCADE_RERANK_API_KEY",
        "CASCADE_RERANK_PROVIDER",
        "CASCADE_RERANK_BASE_URL",
        "CASCADE_RERANK_LITE_MODEL",
        "CASCADE_RERANK_FULL_MODEL",
        "CASCADE_RERANK_TIMEOUT_SECS",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_without_key_is_none() {
    clear_rerank_env();
    assert!(SemanticConfig::from_env()
        .expect("no config error")
        .is_none());
    assert!(HttpSemanticReranker::from_env()
        .expect("no build error")
        .is_none());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_rerank_env();
    std::env::set_var("CASCADE_RERANK_API_KEY", "secret");
    std::env::set_var("CASCADE_RERANK_PROVIDER", "Cohere");
    std::env::set_var("CASCADE_RERANK_LITE_MODEL", "tiny");
    std::env::set_var("CASCADE_RERANK_TIMEOUT_SECS", "5");

    let config = SemanticConfig::from_env()
        .expect("valid env")
        .expect("key is set");
    assert_eq!(config.api_key.as_deref(), Some("secret"));
    assert!(config.base_url.contains("cohere.com"));
    assert_eq!(config.lite_model, "tiny");
    assert_eq!(config.full_model, "rerank-v3.5");
    assert_eq!(config.timeout, Duration::from_secs(5));

    clear_rerank_env();
}

#[test]
#[serial]
fn test_from_env_rejects_bad_timeout() {
    clear_rerank_env();
    std::env::set_var("CASCADE_RERANK_API_KEY", "secret");
    std::env::set_var("CASCADE_RERANK_TIMEOUT_SECS", "thirty");

    let err = SemanticConfig::from_env().unwrap_err();
    assert!(matches!(err, RankError::ConfigError(ref m) if m.contains("CASCADE_RERANK_TIMEOUT_SECS")));
    assert!(HttpSemanticReranker::from_env().is_err());

    clear_rerank_env();
}

#[test]
#[serial]
fn test_from_env_rejects_unknown_provider() {
    clear_rerank_env();
    std::env::set_var("CASCADE_RERANK_API_KEY", "secret");
    std::env::set_var("CASCADE_RERANK_PROVIDER", "openai");

    let err = SemanticConfig::from_env().unwrap_err();
    assert!(matches!(err, RankError::ConfigError(ref m) if m.contains("openai")));

    std::env::set_var("CASCADE_RERANK_PROVIDER", "JINA");
    let config = SemanticConfig::from_env()
        .expect("valid env")
        .expect("key is set");
    assert!(config.base_url.contains("jina.ai"));

    clear_rerank_env();
}

#[test]
fn test_debug_redacts_api_key() {
    let config = SemanticConfig::jina("secret-key");
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("secret-key"));
    assert!(rendered.contains("<redacted>"));
    assert!(rendered.contains("jina-reranker-v1-tiny-en"));

    let reranker = HttpSemanticReranker::new(config).expect("client builds");
    assert!(!format!("{:?}", reranker.config()).contains("secret-key"));

    let keyless = SemanticConfig::default();
    assert!(format!("{:?}", keyless).contains("api_key: None"));
}

// ---- null / mock ----

#[tokio::test]
async fn test_null_reranker_is_unavailable() {
    let reranker = NullSemanticReranker::with_reason("disabled by config");
    assert!(!reranker.is_available());
    assert_eq!(reranker.name(), "null");

    let err = reranker
        .rerank("q", &docs(), RerankTier::Lite, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::Unavailable(ref r) if r == "disabled by config"));
}

#[tokio::test]
async fn test_mock_term_overlap() {
    let reranker = MockSemanticReranker::new();
    let results = reranker
        .rerank("capital of France", &docs(), RerankTier::Lite, Some(2))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].index, 0);
    assert!(results[0].relevance_score > results[1].relevance_score);
    assert_eq!(reranker.calls(RerankTier::Lite), 1);
    assert_eq!(reranker.calls(RerankTier::Full), 0);
}

#[tokio::test]
async fn test_mock_failure_per_tier() {
    let reranker = MockSemanticReranker::new().with_full(MockBehavior::Fail(MockFailure::Timeout));

    assert!(reranker
        .rerank("q", &docs(), RerankTier::Lite, None)
        .await
        .is_ok());
    let err = reranker
        .rerank("q", &docs(), RerankTier::Full, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::Timeout));
}

// ---- score_tier ----

#[tokio::test]
async fn test_score_tier_aligns_with_input() {
    let reranker = MockSemanticReranker::new().with_lite(MockBehavior::Fixed(vec![
        RerankResult {
            index: 1,
            relevance_score: 0.9,
        },
        RerankResult {
            index: 0,
            relevance_score: 0.4,
        },
    ]));

    let outcome = score_tier(&reranker, "q", &candidates(), RerankTier::Lite, 100, "stage2")
        .await
        .unwrap();
    match outcome {
        TierOutcome::Scored(scores) => assert_eq!(scores, vec![Some(0.4), Some(0.9)]),
        other => panic!("expected scores, got {:?}", other),
    }
}

#[tokio::test]
async fn test_score_tier_omitted_candidate_is_none() {
    let reranker = MockSemanticReranker::new().with_full(MockBehavior::Fixed(vec![RerankResult {
        index: 0,
        relevance_score: 0.7,
    }]));

    let outcome = score_tier(&reranker, "q", &candidates(), RerankTier::Full, 100, "stage3")
        .await
        .unwrap();
    assert!(matches!(outcome, TierOutcome::Scored(ref s) if s == &vec![Some(0.7), None]));
}

#[tokio::test]
async fn test_score_tier_out_of_range_index() {
    let reranker = MockSemanticReranker::new().with_lite(MockBehavior::Fixed(vec![RerankResult {
        index: 5,
        relevance_score: 0.7,
    }]));

    let err = score_tier(&reranker, "q", &candidates(), RerankTier::Lite, 100, "stage2")
        .await
        .unwrap_err();
    match err {
        RankError::RerankingFailed { stage, source } => {
            assert_eq!(stage, "stage2");
            assert!(matches!(
                *source,
                RankError::IndexOutOfRange { index: 5, len: 2 }
            ));
        }
        other => panic!("expected RerankingFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_score_tier_classifies_failures() {
    let failing = MockSemanticReranker::new().with_lite(MockBehavior::Fail(MockFailure::RateLimited));
    let outcome = score_tier(&failing, "q", &candidates(), RerankTier::Lite, 100, "stage2")
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        TierOutcome::Failed(RankError::RateLimited(_))
    ));

    let disabled = MockSemanticReranker::new().with_lite(MockBehavior::Fail(MockFailure::Unavailable));
    let outcome = score_tier(&disabled, "q", &candidates(), RerankTier::Lite, 100, "stage2")
        .await
        .unwrap();
    assert!(matches!(outcome, TierOutcome::Unavailable));

    let null = NullSemanticReranker::new();
    let outcome = score_tier(&null, "q", &candidates(), RerankTier::Full, 100, "stage3")
        .await
        .unwrap();
    assert!(matches!(outcome, TierOutcome::Unavailable));
}

// ---- HTTP ----

#[tokio::test]
async fn test_http_rerank_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/rerank"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "jina-reranker-v1-tiny-en",
            "query": "capital of France"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"index": 1, "relevance_score": 0.1},
                {"index": 0, "relevance_score": 0.95}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reranker = http_reranker(&server).await;
    let results = reranker
        .rerank("capital of France", &docs(), RerankTier::Lite, None)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].index, 0);
    assert!((results[0].relevance_score - 0.95).abs() < 1e-12);
}

#[tokio::test]
async fn test_http_full_tier_uses_full_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "model": "jina-reranker-v2-base-multilingual"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"index": 0, "relevance_score": 0.5}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reranker = http_reranker(&server).await;
    let results = reranker
        .rerank("q", &docs(), RerankTier::Full, None)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_http_empty_documents_skip_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let reranker = http_reranker(&server).await;
    let results = reranker
        .rerank("q", &[], RerankTier::Lite, None)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_http_status_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/rerank"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let reranker = http_reranker(&server).await;
    let err = reranker
        .rerank("q", &docs(), RerankTier::Lite, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::RateLimited(ref body) if body == "quota"));
    assert!(err.is_degradable());
}

#[tokio::test]
async fn test_http_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let reranker = http_reranker(&server).await;
    let err = reranker
        .rerank("q", &docs(), RerankTier::Full, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::AuthError(_)));
}

#[tokio::test]
async fn test_http_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let reranker = http_reranker(&server).await;
    let err = reranker
        .rerank("q", &docs(), RerankTier::Lite, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::SerializationError(_)));
}

#[tokio::test]
async fn test_http_out_of_range_index_through_score_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"index": 9, "relevance_score": 0.8}]
        })))
        .mount(&server)
        .await;

    let reranker = http_reranker(&server).await;
    let err = score_tier(&reranker, "q", &candidates(), RerankTier::Full, 100, "stage3")
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::RerankingFailed { stage: "stage3", .. }));
}

#[tokio::test]
async fn test_http_negative_index_through_score_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"index": 0, "relevance_score": 0.4},
                {"index": -1, "relevance_score": 0.8}
            ]
        })))
        .mount(&server)
        .await;

    let reranker = http_reranker(&server).await;
    let err = score_tier(&reranker, "q", &candidates(), RerankTier::Lite, 100, "stage2")
        .await
        .unwrap_err();
    match err {
        RankError::RerankingFailed { stage, source } => {
            assert_eq!(stage, "stage2");
            assert!(matches!(*source, RankError::NegativeIndex(-1)));
        }
        other => panic!("expected RerankingFailed, got {:?}", other),
    }
}
