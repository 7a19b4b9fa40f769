use std::time::Duration;

use serde_json::json;
use textbook_quiz_backend::{
    error::Error,
    services::ai_service::{CompletionRequest, ModelClient, OpenAiClient},
};

fn client(base_url: String) -> OpenAiClient {
    OpenAiClient::new(
        "sk-test".into(),
        base_url,
        Duration::from_secs(5),
        reqwest::Client::new(),
    )
}

fn request() -> CompletionRequest {
    CompletionRequest::json_object(
        "gpt-4o",
        "You write quizzes.".to_string(),
        "{\"mode\":\"topic\"}".to_string(),
    )
}

#[tokio::test]
async fn returns_raw_message_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(mockito::Matcher::PartialJson(json!({
            "model": "gpt-4o",
            "messages": [
                { "role": "system", "content": "You write quizzes." },
                { "role": "user", "content": "{\"mode\":\"topic\"}" }
            ],
            "response_format": { "type": "json_object" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{ "message": { "role": "assistant", "content": "```json\n{\"questions\": [" } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let content = client(format!("{}/", server.url()))
        .complete(&request())
        .await
        .unwrap();
    assert_eq!(content, "```json\n{\"questions\": [");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_model_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("rate limited")
        .create_async()
        .await;

    let err = client(server.url()).complete(&request()).await.unwrap_err();
    match err {
        Error::ModelCallFailed(detail) => {
            assert!(detail.contains("429"));
            assert!(detail.contains("rate limited"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn malformed_envelope_is_model_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"unexpected\": true}")
        .create_async()
        .await;

    let err = client(server.url()).complete(&request()).await.unwrap_err();
    assert!(matches!(err, Error::ModelCallFailed(_)));
}

#[tokio::test]
async fn empty_choices_is_model_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"choices\": []}")
        .create_async()
        .await;

    let err = client(server.url()).complete(&request()).await.unwrap_err();
    assert!(matches!(err, Error::ModelCallFailed(_)));
}
