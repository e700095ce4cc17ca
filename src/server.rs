use axum::{Extension, Router, routing::get};
use log::debug;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{Error, Result, api, types::AuthState, utils};

/// Binds the callback listener up front so a busy port fails the login
/// before the browser is opened.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Server(format!("cannot listen on {addr}: {e}")))?;
    debug!("Callback server listening on {addr}");
    Ok(listener)
}

/// Builds the router of the local callback server.
///
/// Serves the health check on [`utils::HEALTH_PATH`] and the OAuth callback on
/// `callback_path`. Only the callback route sees the shared login state.
///
/// # Arguments
///
/// * `callback_path` - Path component of the configured redirect URI
/// * `state` - Login state shared with the task waiting for the token
pub fn router(callback_path: &str, state: Arc<Mutex<AuthState>>) -> Router {
    Router::new()
        .route(utils::HEALTH_PATH, get(api::health))
        .route(callback_path, get(api::callback).layer(Extension(state)))
}

/// Serves the callback router on an already bound listener.
///
/// Runs until the task is aborted, which the login flow does once a token or
/// an error has been recorded in `state`.
///
/// # Errors
///
/// Returns `Error::Server` when axum stops serving because of an I/O failure.
///
/// # Example
///
/// ```
/// let listener = server::bind(addr).await?;
/// let handle = tokio::spawn(async move {
///     server::serve(listener, &path, state).await
/// });
/// ```
pub async fn serve(
    listener: TcpListener,
    callback_path: &str,
    state: Arc<Mutex<AuthState>>,
) -> Result<()> {
    axum::serve(listener, router(callback_path, state))
        .await
        .map_err(|e| Error::Server(e.to_string()))
}
