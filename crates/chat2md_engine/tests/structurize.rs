use std::time::Duration;

use chat2md_core::{Config, Language};
use chat2md_engine::{ErrorKind, Structurizer, StructurizerSettings};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

fn config_for(server: &MockServer) -> Config {
    Config {
        api_key: "sk-test".to_string(),
        api_base_url: server.uri(),
        model: "test-model".to_string(),
        ..Config::default()
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

fn structurizer() -> Structurizer {
    Structurizer::new(StructurizerSettings::default()).unwrap()
}

#[tokio::test]
async fn sends_system_and_user_messages_and_prepends_front_matter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 4000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("# Title\n\nBody")))
        .expect(1)
        .mount(&server)
        .await;

    let markdown = structurizer()
        .structurize_on(
            "raw conversation",
            &config_for(&server),
            Some("https://chatgpt.com/share/1"),
            day(),
        )
        .await
        .unwrap();

    assert_eq!(
        markdown,
        "---\ntags: []\ndate: 2024-01-02\nsource: https://chatgpt.com/share/1\n---\n\n# Title\n\nBody"
    );

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "raw conversation");
}

#[tokio::test]
async fn system_prompt_names_the_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("# T")))
        .mount(&server)
        .await;

    let config = Config {
        language: Language::Zh,
        ..config_for(&server)
    };
    structurizer()
        .structurize_on("text", &config, Some("chat.webarchive"), day())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let system = body["messages"][0]["content"].as_str().unwrap();
    assert!(system.ends_with("原始来源: chat.webarchive"));
}

#[tokio::test]
async fn existing_front_matter_is_not_doubled() {
    let server = MockServer::start().await;
    let content = "---\ntags: [rust, cli]\ndate: 2024-01-02\nsource: x\n---\n\n# Title\n";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(&server)
        .await;

    let markdown = structurizer()
        .structurize_on("text", &config_for(&server), Some("x"), day())
        .await
        .unwrap();
    assert_eq!(markdown, content);
}

#[tokio::test]
async fn versioned_base_url_is_not_doubled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("# T")))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_base_url: format!("{}/v1/", server.uri()),
        ..config_for(&server)
    };
    structurizer()
        .structurize_on("text", &config, None, day())
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_choices_is_a_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = structurizer()
        .structurize_on("text", &config_for(&server), None, day())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = structurizer()
        .structurize_on("text", &config_for(&server), None, day())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Auth);
    assert!(err.message.contains("API key"));
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = structurizer()
        .structurize_on("text", &config_for(&server), None, day())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RateLimit);
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": {"message": "overloaded"}})),
        )
        .mount(&server)
        .await;

    let err = structurizer()
        .structurize_on("text", &config_for(&server), None, day())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Api { status: 503 });
    assert!(err.message.starts_with("API request failed: 503 - "));
    assert!(err.message.contains("overloaded"));
}

#[tokio::test]
async fn slow_api_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(completion("# T")),
        )
        .mount(&server)
        .await;

    let structurizer = Structurizer::new(StructurizerSettings {
        request_timeout: Duration::from_millis(50),
    })
    .unwrap();
    let err = structurizer
        .structurize_on("text", &config_for(&server), None, day())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);
}

#[tokio::test]
async fn unreachable_host_maps_to_network_error() {
    let server = MockServer::start().await;
    let config = Config {
        api_base_url: "http://127.0.0.1:1".to_string(),
        ..config_for(&server)
    };

    let err = structurizer()
        .structurize_on("text", &config, None, day())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}

#[tokio::test]
async fn missing_credentials_fail_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("# T")))
        .expect(0)
        .mount(&server)
        .await;

    let no_key = Config {
        api_key: String::new(),
        ..config_for(&server)
    };
    let err = structurizer()
        .structurize_on("text", &no_key, None, day())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let no_base = Config {
        api_base_url: "  ".to_string(),
        ..config_for(&server)
    };
    let err = structurizer()
        .structurize_on("text", &no_base, None, day())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
