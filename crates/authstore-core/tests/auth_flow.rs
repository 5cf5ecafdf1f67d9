//! End-to-end session tests against a mock backend.

use authstore_core::auth::{REFRESH_TOKEN_KEY, TOKEN_KEY};
use authstore_core::{
    ApiClient, ApiError, AuthState, AuthStatus, FetchOutcome, FileStorage, Session, Storage,
};
use mockito::{Matcher, Server};
use serde_json::json;

fn file_storage(dir: &tempfile::TempDir) -> FileStorage {
    FileStorage::in_dir(dir.path()).expect("storage should open")
}

#[tokio::test]
async fn login_stores_tokens_and_user_and_survives_restart() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/auth/login/")
        .match_body(Matcher::Json(json!({"email": "a@b.com", "password": "pw"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access":"T1","refresh":"R1"}"#)
        .create_async()
        .await;
    let user = server
        .mock("GET", "/auth/user/")
        .match_header("authorization", "Bearer T1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"name":"A"}"#)
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = ApiClient::new(&server.url()).unwrap();
    let mut state = AuthState::new(api.clone(), file_storage(&dir)).unwrap();

    let status = state.login("a@b.com", "pw").await.unwrap();

    assert_eq!(status, AuthStatus::Authenticated);
    assert_eq!(state.token(), "T1");
    assert_eq!(state.refresh_token(), "R1");
    assert_eq!(
        serde_json::to_value(state.user().unwrap()).unwrap(),
        json!({"id": 1, "name": "A"})
    );

    // A new process picks the tokens back up and can reload the user
    let mut restored = AuthState::new(api, file_storage(&dir)).unwrap();
    assert_eq!(restored.token(), "T1");
    assert_eq!(restored.refresh_token(), "R1");
    assert!(restored.user().is_none());
    assert_eq!(restored.fetch_user().await.unwrap(), FetchOutcome::Loaded);
    assert_eq!(restored.user().and_then(|u| u.id()).as_deref(), Some("1"));

    login.assert_async().await;
    user.assert_async().await;
}

#[tokio::test]
async fn rejected_login_propagates_and_sends_no_user_request() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/auth/login/")
        .with_status(401)
        .with_body(r#"{"detail":"No active account found with the given credentials"}"#)
        .create_async()
        .await;
    let user = server
        .mock("GET", "/auth/user/")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = ApiClient::new(&server.url()).unwrap();
    let mut state = AuthState::new(api, file_storage(&dir)).unwrap();

    let err = state.login("a@b.com", "wrong").await.unwrap_err();

    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)));
    assert_eq!(state.session(), &Session::default());
    assert_eq!(state.storage().get(TOKEN_KEY).unwrap(), None);

    login.assert_async().await;
    user.assert_async().await;
}

#[tokio::test]
async fn malformed_login_response_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/login/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"T1"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(&server.url()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut state = AuthState::new(api, file_storage(&dir)).unwrap();

    let err = state.login("a@b.com", "pw").await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::InvalidResponse(_))));
    assert_eq!(state.status(), AuthStatus::Anonymous);
}

#[tokio::test]
async fn user_fetch_failure_clears_persisted_session() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/auth/user/")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut storage = file_storage(&dir);
    storage.set(TOKEN_KEY, "STALE").unwrap();
    storage.set(REFRESH_TOKEN_KEY, "STALER").unwrap();

    let api = ApiClient::new(&server.url()).unwrap();
    let mut state = AuthState::new(api, storage).unwrap();
    assert!(state.is_authenticated());

    assert_eq!(state.fetch_user().await.unwrap(), FetchOutcome::SessionCleared);
    assert_eq!(state.session(), &Session::default());

    let reopened = file_storage(&dir);
    assert_eq!(reopened.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(reopened.get(REFRESH_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn fetch_user_without_token_sends_no_request() {
    let mut server = Server::new_async().await;
    let user = server
        .mock("GET", "/auth/user/")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = ApiClient::new(&server.url()).unwrap();
    let mut state = AuthState::new(api, file_storage(&dir)).unwrap();

    assert_eq!(state.fetch_user().await.unwrap(), FetchOutcome::Skipped);
    user.assert_async().await;
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Nothing listens on port 1
    let api = ApiClient::new("http://127.0.0.1:1").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut state = AuthState::new(api, file_storage(&dir)).unwrap();

    let err = state.login("a@b.com", "pw").await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Network(_))));
    assert_eq!(state.status(), AuthStatus::Anonymous);
}
