//! Firebase client tests against a local mock server.

use firebase::{Fields, FirebaseClient, FirebaseError, FirebaseOptions, Value};
use wiremock::{
    matchers::{body_json, body_string_contains, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const DOC_PATH: &str = "/projects/demo-project/databases/(default)/documents/users/uid-1";

fn client_for(server: &MockServer) -> FirebaseClient {
    FirebaseClient::new(FirebaseOptions::new("api-key", "demo-project").with_base_url(&server.uri()))
}

#[tokio::test]
async fn test_sign_up_returns_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts:signUp"))
        .and(query_param("key", "api-key"))
        .and(body_json(serde_json::json!({
            "email": "jane@example.com",
            "password": "secret1",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localId": "uid-1",
            "email": "jane@example.com",
            "idToken": "id-token",
            "refreshToken": "refresh-token",
            "expiresIn": "3600"
        })))
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sign_up("jane@example.com", "secret1")
        .await
        .unwrap();

    assert_eq!(session.local_id, "uid-1");
    assert_eq!(session.id_token, "id-token");
    assert_eq!(session.expires_in, 3600);
}

#[tokio::test]
async fn test_sign_in_error_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 400, "message": "INVALID_PASSWORD", "errors": [] }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_in_with_password("jane@example.com", "nope")
        .await
        .unwrap_err();

    assert!(matches!(err, FirebaseError::Api { status: 400, .. }));
    assert_eq!(err.code(), Some("INVALID_PASSWORD"));
}

#[tokio::test]
async fn test_send_password_reset_email() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts:sendOobCode"))
        .and(body_json(serde_json::json!({
            "requestType": "PASSWORD_RESET",
            "email": "jane@example.com"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "email": "jane@example.com" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_id_token_uses_form_encoding() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": "refresh-2",
            "id_token": "id-2",
            "user_id": "uid-1",
            "project_id": "123"
        })))
        .mount(&server)
        .await;

    let session = client_for(&server).refresh_id_token("refresh-1").await.unwrap();

    assert_eq!(session.local_id, "uid-1");
    assert_eq!(session.id_token, "id-2");
    assert_eq!(session.refresh_token, "refresh-2");
}

#[tokio::test]
async fn test_update_account_without_token_rotation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts:update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localId": "uid-1",
            "email": "new@example.com"
        })))
        .mount(&server)
        .await;

    let update = client_for(&server)
        .update_account("id-token", Some("new@example.com"), None)
        .await
        .unwrap();

    assert_eq!(update.email.as_deref(), Some("new@example.com"));
    assert!(update.session.is_none());
}

#[tokio::test]
async fn test_get_missing_document_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let doc = client_for(&server)
        .get_document("id-token", "users", "uid-1")
        .await
        .unwrap();

    assert!(doc.is_none());
}

#[tokio::test]
async fn test_get_document_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .and(header("Authorization", "Bearer id-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/demo-project/databases/(default)/documents/users/uid-1",
            "fields": {
                "firstName": { "stringValue": "Jane" },
                "createdAt": { "integerValue": "1700000000000" }
            }
        })))
        .mount(&server)
        .await;

    let doc = client_for(&server)
        .get_document("id-token", "users", "uid-1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(doc.get_str("firstName"), Some("Jane"));
    assert_eq!(doc.get_i64("createdAt"), Some(1_700_000_000_000));
}

#[tokio::test]
async fn test_update_document_sends_field_mask() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(DOC_PATH))
        .and(query_param("updateMask.fieldPaths", "firstName"))
        .and(query_param("currentDocument.exists", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/demo-project/databases/(default)/documents/users/uid-1",
            "fields": { "firstName": { "stringValue": "Janet" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = Fields::new();
    fields.insert("firstName".to_string(), Value::from("Janet"));

    let doc = client_for(&server)
        .update_document("id-token", "users", "uid-1", fields)
        .await
        .unwrap();

    assert_eq!(doc.get_str("firstName"), Some("Janet"));
}
