use std::net::TcpListener;
use std::time::Duration;

use breedrag_core::config::{LlmConfig, RagConfig};
use breedrag_core::error::Error;
use breedrag_llm::{GenerationClient, GenerationFailure, GenerationOutcome, Unavailability, APOLOGY, DEGRADED_NOTE};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_url: &str) -> LlmConfig {
    LlmConfig { base_url: base_url.to_string(), timeout_ms: 200, health_timeout_ms: 200, ..LlmConfig::default() }
}

async fn completion_server(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn returns_first_choice_content() {
    let server = completion_server(ResponseTemplate::new(200).set_body_json(json!({
        "choices": [
            { "message": { "role": "assistant", "content": "Terriers are small." } },
            { "message": { "role": "assistant", "content": "ignored" } }
        ]
    })))
    .await;
    let client = GenerationClient::new(&config(&server.uri())).unwrap();

    let answer = client.generate("What is a terrier?", "[1] Dog breed: terrier.").await.unwrap();
    assert_eq!(answer, "Terriers are small.");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "local-model");
    assert_eq!(body["max_tokens"], 500);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[1]["content"].as_str().unwrap().contains("[1] Dog breed: terrier."));
    assert_eq!(messages[2]["role"], "user");
    assert_eq!(messages[2]["content"], "What is a terrier?");
}

#[tokio::test]
async fn empty_context_sends_no_context_message() {
    let client = GenerationClient::new(&LlmConfig::default()).unwrap();
    let messages = client.build_messages("hi", "");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, "user");
}

#[tokio::test]
async fn empty_choices_is_a_generation_error() {
    let server = completion_server(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] }))).await;
    let client = GenerationClient::new(&config(&server.uri())).unwrap();

    assert_eq!(
        client.complete("q", "ctx").await,
        GenerationOutcome::Failed(GenerationFailure::EmptyChoices)
    );
    let err = client.generate("q", "ctx").await.unwrap_err();
    assert!(matches!(err, Error::Generation(_)), "got {err:?}");
}

#[tokio::test]
async fn server_error_propagates() {
    let server = completion_server(ResponseTemplate::new(500).set_body_string("boom")).await;
    let client = GenerationClient::new(&config(&server.uri())).unwrap();

    match client.complete("q", "ctx").await {
        GenerationOutcome::Failed(GenerationFailure::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(client.generate("q", "ctx").await.is_err());
}

#[tokio::test]
async fn malformed_body_propagates() {
    let server = completion_server(ResponseTemplate::new(200).set_body_string("not json")).await;
    let client = GenerationClient::new(&config(&server.uri())).unwrap();

    assert!(matches!(
        client.complete("q", "ctx").await,
        GenerationOutcome::Failed(GenerationFailure::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn timeout_degrades_to_context_excerpt() {
    let server = completion_server(
        ResponseTemplate::new(200)
            .set_body_json(json!({ "choices": [{ "message": { "content": "late" } }] }))
            .set_delay(Duration::from_secs(2)),
    )
    .await;
    let client = GenerationClient::new(&config(&server.uri())).unwrap().with_fallback_excerpt(10);

    let context = "[1] Dog breed: terrier. (relevance: 80.0%)";
    match client.complete("q", context).await {
        GenerationOutcome::Degraded { reason, text } => {
            assert_eq!(reason, Unavailability::Timeout);
            assert!(text.contains("[1] Dog br..."), "{text}");
            assert!(text.ends_with(DEGRADED_NOTE));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_degrades() {
    let client = GenerationClient::new(&config(&closed_port_url())).unwrap();

    let outcome = client.complete("q", "").await;
    assert_eq!(
        outcome,
        GenerationOutcome::Degraded { reason: Unavailability::Unreachable, text: APOLOGY.to_string() }
    );
    assert_eq!(client.generate("q", "").await.unwrap(), APOLOGY);
}

#[tokio::test]
async fn unresolvable_host_fails_instead_of_degrading() {
    let llm = LlmConfig { base_url: "http://llm-backend.invalid".to_string(), timeout_ms: 10_000, ..LlmConfig::default() };
    let client = GenerationClient::new(&llm).unwrap();

    let outcome = client.complete("q", "ctx").await;
    assert!(matches!(outcome, GenerationOutcome::Failed(GenerationFailure::Transport(_))), "got {outcome:?}");
    let err = client.generate("q", "ctx").await.unwrap_err();
    assert!(matches!(err, Error::Generation(_)), "got {err:?}");
}

#[tokio::test]
async fn default_fallback_excerpt_matches_rag_defaults() {
    let client = GenerationClient::new(&config(&closed_port_url())).unwrap();
    let context = "c".repeat(RagConfig::default().fallback_excerpt_chars + 50);

    let text = client.generate("q", &context).await.unwrap();
    assert!(text.contains(&format!("{}...", "c".repeat(RagConfig::default().fallback_excerpt_chars))));
    assert!(!text.contains(&"c".repeat(RagConfig::default().fallback_excerpt_chars + 1)));
}

#[tokio::test]
async fn health_reports_backend_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "model_loaded": true })))
        .mount(&server)
        .await;
    let client = GenerationClient::new(&config(&server.uri())).unwrap();

    let health = client.check_health().await;
    assert_eq!(health.status, "ok");
    assert!(health.error.is_none());
}

#[tokio::test]
async fn health_without_status_field_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "model_loaded": false })))
        .mount(&server)
        .await;
    let client = GenerationClient::new(&config(&server.uri())).unwrap();

    assert_eq!(client.check_health().await.status, "unknown");
}

#[tokio::test]
async fn health_never_fails_when_backend_is_down() {
    let client = GenerationClient::new(&config(&closed_port_url())).unwrap();

    let health = client.check_health().await;
    assert_eq!(health.status, "unavailable");
    assert!(health.error.is_some());
}
