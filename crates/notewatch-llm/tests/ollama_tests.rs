//! HTTP contract tests for OllamaProvider against a mock server

use notewatch_domain::traits::LlmProvider;
use notewatch_llm::{LlmError, OllamaProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCHEMA: &str = r#"{"type":"array","items":{"type":"object"}}"#;

#[tokio::test]
async fn test_sends_schema_and_deterministic_options() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3",
            "prompt": "split this",
            "stream": false,
            "format": {"type": "array", "items": {"type": "object"}},
            "options": {"temperature": 0.0, "num_ctx": 8192}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "  [{\"title\":\"T\"}]\n",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(server.uri(), "llama3").unwrap();
    let result = provider.generate_structured("split this", SCHEMA).await.unwrap();

    assert_eq!(result, r#"[{"title":"T"}]"#);
}

#[tokio::test]
async fn test_full_generate_url_is_used_as_is() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "[]"})))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/api/generate", server.uri());
    let provider = OllamaProvider::new(endpoint, "llama3").unwrap();

    assert_eq!(provider.generate_structured("p", SCHEMA).await.unwrap(), "[]");
}

#[tokio::test]
async fn test_missing_response_field_is_empty_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(server.uri(), "llama3").unwrap();
    assert_eq!(provider.generate_structured("p", SCHEMA).await.unwrap(), "");
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(server.uri(), "llama3").unwrap();
    let result = provider.generate_structured("p", SCHEMA).await;

    match result {
        Err(LlmError::Communication(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("boom"));
        }
        other => panic!("Expected Communication error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_maps_to_model_not_available() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(server.uri(), "missing-model").unwrap();
    let result = provider.generate_structured("p", SCHEMA).await;

    assert!(matches!(result, Err(LlmError::ModelNotAvailable(m)) if m == "missing-model"));
}

#[tokio::test]
async fn test_rate_limit_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(server.uri(), "llama3").unwrap();
    let result = provider.generate_structured("p", SCHEMA).await;

    assert!(matches!(result, Err(LlmError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(server.uri(), "llama3").unwrap();
    let result = provider.generate_structured("p", SCHEMA).await;

    assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
}
