//! The real reqwest transport against a local wiremock backend.

use std::sync::Arc;

use serde_json::json;
use thinktoart::adapters::{InMemoryStorage, ReqwestHttpClient};
use thinktoart::api::ChatApi;
use thinktoart::error::{AuthError, ClientError, FetchError};
use thinktoart::models::{Credentials, MessageRequest, PromptMode, StoredSession, Theme};
use thinktoart::startup::{ClientConfig, Services};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> ChatApi {
    ChatApi::new(Arc::new(ReqwestHttpClient::new()), server.uri())
}

async fn mount_account(server: &MockServer, credits: u64) {
    Mock::given(method("GET"))
        .and(path("/api/user/userdetails"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": {"_id": "u1", "name": "Ada", "credits": credits}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/chat/getAllChats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chats": [{"_id": "c1", "name": "New Chat", "messages": []}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_posts_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"email": "ada@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "token": "jwt"})))
        .expect(1)
        .mount(&server)
        .await;

    let token = api(&server)
        .login(&Credentials::login("ada@example.com", "pw"))
        .await
        .unwrap();
    assert_eq!(token, "jwt");
}

#[tokio::test]
async fn test_login_rejection_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&server)
        .await;

    let err = api(&server)
        .login(&Credentials::login("ada@example.com", "nope"))
        .await
        .unwrap_err();
    match &err {
        ClientError::Auth(AuthError::InvalidCredentials { message }) => {
            assert_eq!(message, "Invalid credentials")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_wrapped_user_details() {
    let server = MockServer::start().await;
    mount_account(&server, 9).await;

    let user = api(&server).user_details("tok").await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.credit_balance, 9);
}

#[tokio::test]
async fn test_text_stream_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/message/text"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({"message": "Not enough credits"})))
        .mount(&server)
        .await;

    let result = api(&server)
        .send_text("tok", &MessageRequest::new("c1", "hi", false))
        .await;
    match result {
        Err(ClientError::Fetch(FetchError::HttpStatus { status, message })) => {
            assert_eq!(status, 402);
            assert_eq!(message, "Not enough credits");
        }
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("expected an error"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_a_fetch_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let api = ChatApi::new(Arc::new(ReqwestHttpClient::new()), uri);
    let err = api.get_all_chats("tok").await.unwrap_err();
    assert!(matches!(err, ClientError::Fetch(_)));
}

#[tokio::test]
async fn test_full_submission_over_http() {
    let server = MockServer::start().await;
    mount_account(&server, 5).await;
    Mock::given(method("POST"))
        .and(path("/api/message/text"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_json(json!({"chatId": "c1", "prompt": "colours?", "isPublished": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/event-stream")
                .set_body_string("data: Red, \n\ndata: green and blue.\n\ndata: [DONE]\n\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new().with_server_url(server.uri());
    let storage = InMemoryStorage::with_session(StoredSession {
        token: Some("tok".to_string()),
        theme: Theme::Dark,
    });
    let services = Services::build(
        &config,
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(storage),
    );
    assert!(services.restore().await.unwrap());

    let answer = services
        .chat
        .submit("colours?", PromptMode::Text, true)
        .await
        .unwrap();

    assert_eq!(answer.content, "Red, green and blue.");
    assert_eq!(services.session.snapshot().credits(), Some(4));
    let thread = services.registry.thread("c1").unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert_eq!(thread.messages[0].content, "colours?");
}
