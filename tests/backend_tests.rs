// tests for the claude and openai resolvers against a local stand-in server

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use vidchat::{Claude, Error, Message, OpenAi, Resolver, Role};

// every (headers, body) the server received
#[derive(Clone, Default)]
struct Received(Arc<Mutex<Vec<(HeaderMap, Value)>>>);

impl Received {
    fn only(&self) -> (HeaderMap, Value) {
        let all = self.0.lock().unwrap();
        assert_eq!(all.len(), 1);
        all[0].clone()
    }
}

// answers `path` with a fixed status and body; returns a base url with a trailing slash
async fn serve(path: &str, status: StatusCode, reply: Value) -> (String, Received) {
    let received = Received::default();

    let app = Router::new()
        .route(
            path,
            post(
                move |State(received): State<Received>,
                      headers: HeaderMap,
                      Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        received.0.lock().unwrap().push((headers, body));
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1/"), received)
}

fn prompt() -> Message {
    Message::user("Context: T\nQuestion: Q")
}

#[tokio::test]
async fn test_openai_request_and_reply() {
    let (base, received) = serve(
        "/v1/chat/completions",
        StatusCode::OK,
        json!({"choices": [
            {"message": {"content": " hi "}},
            {"message": {"content": null}}
        ]}),
    )
    .await;

    let openai = OpenAi::new("key".to_string(), "m".to_string()).with_base_url(base);
    let replies = openai.query(&[prompt()]).await.unwrap();
    assert_eq!(replies, vec!["hi".to_string()]);

    let (headers, body) = received.only();
    assert_eq!(headers["authorization"], "Bearer key");
    assert_eq!(
        body,
        json!({
            "max_tokens": 1024,
            "messages": [{"content": "Context: T\nQuestion: Q", "role": "user"}],
            "model": "m",
        })
    );
}

#[tokio::test]
async fn test_openai_error_status() {
    let (base, _) = serve(
        "/v1/chat/completions",
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": "rate limited"}),
    )
    .await;

    let openai = OpenAi::new("key".to_string(), "m".to_string()).with_base_url(base);
    let err = openai.query(&[prompt()]).await.unwrap_err();
    assert!(
        matches!(err, Error::ResolverQuery(ref m) if m.contains("429") && m.contains("rate limited")),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_claude_request_and_reply() {
    let (base, received) = serve(
        "/v1/messages",
        StatusCode::OK,
        json!({"content": [
            {"type": "thinking", "thinking": "hmm"},
            {"type": "text", "text": " yo "}
        ]}),
    )
    .await;

    let claude = Claude::new("key".to_string(), "c".to_string())
        .with_base_url(base)
        .with_max_tokens(64);
    let history = [
        Message {
            content: "sys".to_string(),
            role: Role::System,
        },
        prompt(),
    ];
    let replies = claude.query(&history).await.unwrap();
    assert_eq!(replies, vec!["yo".to_string()]);

    let (headers, body) = received.only();
    assert_eq!(headers["x-api-key"], "key");
    assert_eq!(headers["anthropic-version"], "2023-06-01");
    assert_eq!(
        body,
        json!({
            "model": "c",
            "max_tokens": 64,
            "system": "sys",
            "messages": [{"content": "Context: T\nQuestion: Q", "role": "user"}],
        })
    );
}

#[tokio::test]
async fn test_claude_without_system_message() {
    let (base, received) = serve(
        "/v1/messages",
        StatusCode::OK,
        json!({"content": [{"type": "text", "text": "ok"}]}),
    )
    .await;

    let claude = Claude::new("key".to_string(), "c".to_string()).with_base_url(base);
    claude.query(&[prompt()]).await.unwrap();

    let (_, body) = received.only();
    assert!(body.get("system").is_none());
    assert!(body.get("temperature").is_none());
}

#[tokio::test]
async fn test_claude_error_status() {
    let (base, _) = serve(
        "/v1/messages",
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "invalid x-api-key"}}),
    )
    .await;

    let claude = Claude::new("bad".to_string(), "c".to_string()).with_base_url(base);
    let err = claude.query(&[prompt()]).await.unwrap_err();
    assert!(
        matches!(err, Error::ResolverQuery(ref m) if m.contains("401") && m.contains("invalid x-api-key")),
        "{err:?}"
    );
}
