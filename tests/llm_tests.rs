use pretty_assertions::assert_eq;
use repoprep::error::AnalyzerError;
use repoprep::llm::CompletionClient;
use serde_json::json;
use std::time::Instant;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{completion_body, full_analysis_value, init_test_tracing, test_config};

fn client_for(server: &MockServer) -> CompletionClient {
    let config = test_config(
        "http://unused.invalid",
        &format!("{}/chat/completions", server.uri()),
    );
    CompletionClient::new(&config).unwrap()
}

#[tokio::test]
async fn success_returns_parsed_structured_json() {
    init_test_tracing();
    let server = MockServer::start().await;
    let content = full_analysis_value().to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test_key"))
        .and(body_partial_json(json!({"temperature": 0.3, "max_tokens": 8000})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(completion_body(&content)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let value = client.generate("system", "user", 2).await.unwrap();
    assert_eq!(value["explanation"]["tech_stack"][0], "Python");
    assert_eq!(value["resume_bullets"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn fenced_reply_is_unwrapped() {
    init_test_tracing();
    let server = MockServer::start().await;
    let content = format!("Here you go:\n```json\n{}\n```", json!({"a": 1}));

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(completion_body(&content)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let value = client.generate("system", "user", 2).await.unwrap();
    assert_eq!(value, json!({"a": 1}));
}

#[tokio::test]
async fn rate_limit_retries_with_backoff_then_succeeds() {
    init_test_tracing();
    let server = MockServer::start().await;

    // Two 429s, then the mock expires and the 200 below takes over
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(completion_body(r#"{"ok": true}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let started = Instant::now();
    let value = client.generate("system", "user", 2).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(value, json!({"ok": true}));
    // Backoff of 1s after the first 429 and 2s after the second
    assert!(elapsed.as_secs_f64() >= 3.0, "elapsed {elapsed:?}");
}

#[tokio::test]
async fn rate_limit_exhausts_retries() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate("system", "user", 1).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::RateLimited { .. }));
    assert_eq!(err.status_code().as_u16(), 429);
}

#[tokio::test]
async fn unauthorized_is_a_configuration_error_without_retry() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate("system", "user", 2).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Configuration(_)));
}

#[tokio::test]
async fn other_upstream_errors_carry_status_and_body() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.generate("system", "user", 2).await.unwrap_err() {
        AnalyzerError::Upstream { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn reply_without_message_content_is_malformed() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(r#"{"choices": []}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.generate("system", "user", 2).await.unwrap_err(),
        AnalyzerError::MalformedResponse(_)
    ));
}
