use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use unibot_core::api::{ApiError, AuthBackend, ChatBackend, LoginRequest, UploadBackend};
use unibot_core::config::ClientConfig;
use unibot_core::credential::{CredentialStore, MemoryCredentialStore, SessionCredential, UserProfile};
use unibot_core::upload::UploadFile;
use unibot_interaction::UnibotApi;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential() -> SessionCredential {
    SessionCredential::new(
        "token-123",
        "refresh-456",
        UserProfile(json!({"id": 1, "Username": "admin"})),
    )
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: format!("{}/api", server.uri()),
        ..Default::default()
    }
}

fn api(server: &MockServer, store: Arc<MemoryCredentialStore>) -> UnibotApi {
    UnibotApi::new(&config_for(server), store).unwrap()
}

#[tokio::test]
async fn test_bearer_token_is_attached_when_logged_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .and(header("Authorization", "Bearer token-123"))
        .and(body_json(json!({"prompt": "Where is the library?"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": "The library is in Block A."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credential(credential()));
    let reply = api(&server, store).chat("Where is the library?").await.unwrap();

    assert_eq!(reply.non_empty(), Some("The library is in Block A."));
}

#[tokio::test]
async fn test_request_goes_out_unauthenticated_without_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hi"})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    api(&server, store).chat("hello").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/file_records"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credential(credential()));
    let result = api(&server, store.clone()).history().await;

    assert_eq!(result.unwrap_err(), ApiError::AuthExpired);
    assert!(store.read().is_none());
}

#[tokio::test]
async fn test_unauthorized_from_any_endpoint_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credential(credential()));
    let api = api(&server, store.clone());
    assert!(api.chat("hello").await.unwrap_err().is_auth_expired());
    assert!(store.read().is_none());

    store.save(&credential()).unwrap();
    let file = UploadFile {
        file_name: "faq.json".into(),
        mime_type: "application/json".into(),
        bytes: b"[]".to_vec(),
    };
    assert!(api.upload(&file).await.unwrap_err().is_auth_expired());
    assert!(store.read().is_none());
}

#[tokio::test]
async fn test_server_error_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": "Service unavailable"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credential(credential()));
    let err = api(&server, store.clone()).chat("hello").await.unwrap_err();

    match &err {
        ApiError::Failure(detail) => assert_eq!(detail.status, Some(503)),
        other => panic!("Expected Failure, got {other:?}"),
    }
    assert_eq!(err.server_error(), Some("Service unavailable"));
    // Only 401 touches the session.
    assert!(store.read().is_some());
}

#[tokio::test]
async fn test_malformed_success_payload_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/file_records"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api(&server, Arc::new(MemoryCredentialStore::new()))
        .history()
        .await
        .unwrap_err();

    match err {
        ApiError::Failure(detail) => {
            assert_eq!(detail.status, Some(200));
            assert!(detail.description.contains("Malformed"));
        }
        other => panic!("Expected Failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    let config = ClientConfig {
        // Nothing listens on port 9 (discard) in the test environment.
        base_url: "http://127.0.0.1:9/api/".into(),
        ..Default::default()
    };
    let store = Arc::new(MemoryCredentialStore::with_credential(credential()));
    let api = UnibotApi::new(&config, store.clone()).unwrap();

    match api.chat("hello").await.unwrap_err() {
        ApiError::Failure(detail) => assert!(detail.is_transport()),
        other => panic!("Expected Failure, got {other:?}"),
    }
    assert!(store.read().is_some());
}

#[tokio::test]
async fn test_configured_timeout_becomes_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        request_timeout_secs: Some(1),
        ..config_for(&server)
    };
    let api = UnibotApi::new(&config, Arc::new(MemoryCredentialStore::new())).unwrap();

    match api.chat("hello").await.unwrap_err() {
        ApiError::Failure(detail) => {
            assert!(detail.is_transport());
            assert!(detail.description.contains("timed out"));
        }
        other => panic!("Expected Failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_posts_username_and_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .and(body_json(json!({"username": "admin", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": {"access": "a1", "refresh": "r1"},
            "user": {"id": 1, "Username": "admin", "email": "admin@uni.edu"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = api(&server, Arc::new(MemoryCredentialStore::new()))
        .login(&LoginRequest {
            identifier: "admin".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.token.access, "a1");
    assert_eq!(response.token.refresh, "r1");
    assert_eq!(response.user["Username"], "admin");
}

#[tokio::test]
async fn test_upload_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload_file/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Data upload successfully and vector store rebuilt successfully",
            "inserted": 2,
            "skipped": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = UploadFile {
        file_name: "faq.json".into(),
        mime_type: "application/json".into(),
        bytes: br#"[{"question":"q","answer":"a"}]"#.to_vec(),
    };
    let receipt = api(&server, Arc::new(MemoryCredentialStore::with_credential(credential())))
        .upload(&file)
        .await
        .unwrap();

    assert_eq!(receipt.inserted, Some(2));
    assert_eq!(receipt.skipped, Some(1));

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="faq.json""#));
}

#[tokio::test]
async fn test_history_parses_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/file_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": [{
                "file_name": "faq.json",
                "uploaded_by": "admin",
                "uploaded_at": "2024-05-01T09:30:00Z",
                "inserted_count": 4,
                "skipped_count": 0
            }]
        })))
        .mount(&server)
        .await;

    let entries = api(&server, Arc::new(MemoryCredentialStore::new()))
        .history()
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file_name, "faq.json");
    assert_eq!(entries[0].inserted_count, 4);
}
