use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use log::debug;
use tokio::sync::Mutex;

use crate::{config, spotify, types::AuthState, warning};

/// Handles the redirect back from the Spotify authorization page.
///
/// The request is only acted on when its `state` parameter matches the one
/// the login was started with. Anything else is ignored without touching the
/// shared state, so a forged redirect can neither complete nor abort a login.
///
/// # Arguments
///
/// * `params` - Query parameters of the redirect (`state`, `code` or `error`)
/// * `shared_state` - Login state shared with the task waiting for the token
///
/// # Returns
///
/// A short HTML page for the browser. On the side the shared state receives:
/// - `token` - When the authorization code was exchanged successfully
/// - `error` - When Spotify reported an error or the exchange failed
///
/// A redirect without `code` and without `error` leaves the state as it is.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthState>>>,
) -> Html<&'static str> {
    let mut auth_state = shared_state.lock().await;

    if params.get("state") != Some(&auth_state.state) {
        debug!("Callback with unexpected state ignored");
        return Html("<h4>State mismatch, login ignored.</h4>");
    }

    if let Some(error) = params.get("error") {
        auth_state.error = Some(format!("Spotify denied authorization: {error}"));
        return Html("<h4>Login failed.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let token_url = config::spotify_apitoken_url();
    match spotify::auth::exchange_code(&token_url, &auth_state.credentials, code).await {
        Ok(token) => {
            auth_state.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            auth_state.error = Some(e.to_string());
            Html("<h4>Login failed.</h4>")
        }
    }
}
