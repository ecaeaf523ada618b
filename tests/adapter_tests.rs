//! Provider adapter tests against a mock HTTP server.
//!
//! These verify the wire shape of each family's request (URL, headers, body)
//! and the adapter-level error contract: configuration failures must reject
//! the request before anything leaves the process.

use futures_util::StreamExt;
use pagetalk::{
    AnswerEvent, AskClient, AskRequest, ChatError, Conversation, Message, ProviderConfig,
};
use secrecy::SecretString;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_url: &str, api_key: Option<&str>, model: &str) -> ProviderConfig {
    ProviderConfig {
        base_url: base_url.into(),
        api_key: api_key.map(|k| SecretString::from(k.to_string())),
        model: model.into(),
        temperature: 0.4,
        max_tokens: 256,
        system_prompt: String::new(),
        enabled: true,
    }
}

fn request(provider: &str, config: ProviderConfig, conversation: Conversation) -> AskRequest {
    AskRequest {
        provider: provider.into(),
        config,
        conversation,
    }
}

async fn drain(client: &AskClient, req: &AskRequest) -> Vec<Result<AnswerEvent, ChatError>> {
    client
        .ask(req)
        .await
        .expect("stream should open")
        .collect()
        .await
}

#[tokio::test]
async fn missing_credential_rejects_before_any_outbound_request() {
    let server = MockServer::start().await;
    let client = AskClient::new();

    for provider in ["openai", "anthropic", "gemini"] {
        let req = request(
            provider,
            config(&server.uri(), None, "some-model"),
            Conversation::new(vec![Message::user("hi")]),
        );
        let err = client.ask(&req).await.err().expect("must reject");
        assert!(
            matches!(err, ChatError::Configuration(_)),
            "{provider}: expected configuration error, got {err:?}"
        );
    }

    let received = server.received_requests().await.unwrap();
    assert!(
        received.is_empty(),
        "no HTTP request may be attempted, saw {}",
        received.len()
    );
}

#[tokio::test]
async fn unknown_provider_identifier_is_a_configuration_error() {
    let client = AskClient::new();
    let req = request(
        "cohere",
        config("http://localhost:1", Some("k"), "m"),
        Conversation::new(vec![Message::user("hi")]),
    );
    let err = client.ask(&req).await.err().expect("must reject");
    assert!(matches!(err, ChatError::Configuration(_)));
}

#[tokio::test]
async fn disabled_provider_is_rejected_without_network_io() {
    let server = MockServer::start().await;
    let client = AskClient::new();

    let mut cfg = config(&server.uri(), Some("sk"), "gpt-4o-mini");
    cfg.enabled = false;
    let req = request(
        "openai",
        cfg,
        Conversation::new(vec![Message::user("hi")]),
    );
    let err = client.ask(&req).await.err().expect("must reject");
    assert!(matches!(err, ChatError::Configuration(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn openai_request_shape_and_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n",
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let client = AskClient::new();
    let req = request(
        "openai",
        config(&server.uri(), Some("sk-test"), "gpt-4o-mini"),
        Conversation::new(vec![Message::system("be brief"), Message::user("hello")]),
    );
    let events = drain(&client, &req).await;
    assert!(matches!(events.last(), Some(Ok(AnswerEvent::Done))));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let sent = &received[0];
    assert_eq!(
        sent.headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer sk-test")
    );
    let body: serde_json::Value = sent.body_json().unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["stream"], true);
    assert_eq!(body["temperature"], 0.4);
    assert_eq!(body["max_tokens"], 256);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
}

#[tokio::test]
async fn local_backend_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: [DONE]\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = AskClient::new();
    let req = request(
        "local",
        config(&server.uri(), None, "llama3"),
        Conversation::new(vec![Message::user("hello")]),
    );
    drain(&client, &req).await;

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("Authorization").is_none());
}

#[tokio::test]
async fn anthropic_request_shape_headers_and_system_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            concat!(
                "data: {\"type\":\"message_start\"}\n\n",
                "data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"Hello\"}}\n\n",
                "data: {\"type\":\"message_stop\"}\n\n",
            ),
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let client = AskClient::new();
    let req = request(
        "anthropic",
        config(&server.uri(), Some("sk-ant"), "claude-sonnet-4-5"),
        Conversation::new(vec![Message::system("be brief"), Message::user("hello")]),
    );
    let events = drain(&client, &req).await;
    assert!(
        events
            .iter()
            .any(|e| matches!(e, Ok(AnswerEvent::Delta { text }) if text == "Hello"))
    );

    let received = server.received_requests().await.unwrap();
    let sent = &received[0];
    assert_eq!(
        sent.headers.get("x-api-key").and_then(|v| v.to_str().ok()),
        Some("sk-ant")
    );
    assert_eq!(
        sent.headers
            .get("anthropic-version")
            .and_then(|v| v.to_str().ok()),
        Some("2023-06-01")
    );
    assert!(sent.headers.get("Authorization").is_none());

    let body: serde_json::Value = sent.body_json().unwrap();
    assert_eq!(body["system"], "be brief");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1, "system message must not stay in messages");
    assert_eq!(messages[0]["role"], "user");
}

#[tokio::test]
async fn gemini_request_path_query_credential_and_generation_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .and(query_param("key", "AIza-test"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"OK\"}]}}]}\n\n",
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let client = AskClient::new();
    let req = request(
        "gemini",
        config(&server.uri(), Some("AIza-test"), "gemini-2.0-flash"),
        Conversation::new(vec![Message::user("hello"), Message::assistant("hi")]),
    );
    let events = drain(&client, &req).await;
    assert!(
        events
            .iter()
            .any(|e| matches!(e, Ok(AnswerEvent::Delta { text }) if text == "OK"))
    );

    let received = server.received_requests().await.unwrap();
    let sent = &received[0];
    assert!(sent.headers.get("Authorization").is_none());
    assert!(sent.headers.get("x-api-key").is_none());

    let body: serde_json::Value = sent.body_json().unwrap();
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][1]["role"], "model");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
}

#[tokio::test]
async fn non_success_status_is_a_request_level_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = AskClient::new();
    let req = request(
        "openai",
        config(&server.uri(), Some("sk"), "gpt-4o-mini"),
        Conversation::new(vec![Message::user("hi")]),
    );
    let err = client.ask(&req).await.err().expect("must reject");
    match err {
        ChatError::Http { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let client = AskClient::new();
    // Nothing listens on this port.
    let req = request(
        "local",
        config("http://127.0.0.1:9", None, "llama3"),
        Conversation::new(vec![Message::user("hi")]),
    );
    let err = client.ask(&req).await.err().expect("must fail");
    assert!(matches!(err, ChatError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn ask_request_deserializes_from_handler_json() {
    let req: AskRequest = serde_json::from_value(serde_json::json!({
        "provider": "anthropic",
        "config": {
            "base_url": "https://api.anthropic.com/v1",
            "api_key": "sk-ant",
            "model": "claude-sonnet-4-5",
            "system_prompt": "be helpful"
        },
        "conversation": [
            {"role": "user", "content": "Summarize this page."}
        ]
    }))
    .unwrap();

    assert_eq!(req.provider, "anthropic");
    assert_eq!(req.config.model, "claude-sonnet-4-5");
    assert_eq!(req.conversation.len(), 1);
}
