use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_analyze_image_sends_image_and_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "aGVsbG8="}},
                    {"type": "text", "text": "Where is the login button?"}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "content": [{"type": "text", "text": "{\"found\": true, \"x\": 10, \"y\": 20, \"description\": \"top bar\"}"}],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = VisionClient::new("test-key", "claude-sonnet-4-20250514").with_base_url(server.uri());
    let reply = client
        .analyze_image("aGVsbG8=", "Where is the login button?")
        .await
        .unwrap();
    assert!(reply.contains("\"found\": true"));
}

#[tokio::test]
async fn test_analyze_image_surfaces_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "error",
            "error": {"type": "invalid_request_error", "message": "image exceeds size limit"}
        })))
        .mount(&server)
        .await;

    let client = VisionClient::new("test-key", "claude-sonnet-4-20250514").with_base_url(server.uri());
    let err = client.analyze_image("aGVsbG8=", "question").await.unwrap_err();
    match err {
        VisionError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "image exceeds size limit");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_analyze_image_rejects_empty_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": []
        })))
        .mount(&server)
        .await;

    let client = VisionClient::new("k", "m").with_base_url(server.uri());
    let err = client.analyze_image("aGVsbG8=", "question").await.unwrap_err();
    assert!(matches!(err, VisionError::EmptyResponse));
}
