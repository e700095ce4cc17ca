use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query};
use tokio::sync::Mutex;
use toptracks::{api::callback, config::Credentials, types::AuthState};

// Helper function to create a pending login waiting for `state`
fn create_pending_login(state: &str) -> Arc<Mutex<AuthState>> {
    Arc::new(Mutex::new(AuthState {
        state: state.to_string(),
        credentials: Credentials {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        },
        token: None,
        error: None,
    }))
}

fn params(pairs: &[(&str, &str)]) -> Query<HashMap<String, String>> {
    Query(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[tokio::test]
async fn test_callback_ignores_foreign_state() {
    let shared_state = create_pending_login("expected");

    callback(
        params(&[("state", "forged"), ("code", "stolen-code")]),
        Extension(Arc::clone(&shared_state)),
    )
    .await;

    let auth_state = shared_state.lock().await;
    assert!(auth_state.token.is_none());
    assert!(auth_state.error.is_none());
}

#[tokio::test]
async fn test_callback_ignores_missing_state() {
    let shared_state = create_pending_login("expected");

    callback(
        params(&[("code", "some-code")]),
        Extension(Arc::clone(&shared_state)),
    )
    .await;

    let auth_state = shared_state.lock().await;
    assert!(auth_state.token.is_none());
    assert!(auth_state.error.is_none());
}

#[tokio::test]
async fn test_callback_records_denied_consent() {
    let shared_state = create_pending_login("expected");

    callback(
        params(&[("state", "expected"), ("error", "access_denied")]),
        Extension(Arc::clone(&shared_state)),
    )
    .await;

    let auth_state = shared_state.lock().await;
    assert!(auth_state.token.is_none());
    assert!(
        auth_state
            .error
            .as_deref()
            .is_some_and(|e| e.contains("access_denied"))
    );
}

#[tokio::test]
async fn test_callback_without_code_leaves_state_untouched() {
    let shared_state = create_pending_login("expected");

    callback(
        params(&[("state", "expected")]),
        Extension(Arc::clone(&shared_state)),
    )
    .await;

    let auth_state = shared_state.lock().await;
    assert!(auth_state.token.is_none());
    assert!(auth_state.error.is_none());
    assert_eq!(auth_state.state, "expected");
}
