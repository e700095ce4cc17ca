use std::{sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    Error, Result, config,
    config::Credentials,
    info,
    management::TokenManager,
    server,
    spotify::SpotifyClient,
    types::{AuthState, Token, TokenResponse},
    utils, warning,
};

/// How long the browser login may take before giving up.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Returns a client authorized for the configured scopes.
///
/// A cached token is reused when it covers [`config::SCOPES`], refreshed
/// first if it has expired. Without a usable cache, or with `force`, the
/// browser login runs and its token is cached for the next run.
pub async fn authorize(credentials: &Credentials, force: bool) -> Result<SpotifyClient> {
    if !force {
        if let Some(access_token) = cached_access_token(credentials).await {
            return Ok(SpotifyClient::new(access_token));
        }
    }

    let token = login(credentials).await?;
    TokenManager::new(token.clone()).persist().await?;
    Ok(SpotifyClient::new(token.access_token))
}

async fn cached_access_token(credentials: &Credentials) -> Option<String> {
    let mut token_mgr = match TokenManager::load().await {
        Ok(mgr) => mgr,
        Err(e) => {
            debug!("No usable token cache: {e}");
            return None;
        }
    };

    if !token_mgr.issued_to(&credentials.client_id) {
        debug!("Cached token belongs to another client id");
        return None;
    }

    if !token_mgr.covers(config::SCOPES) {
        debug!("Cached token lacks required scopes");
        return None;
    }

    match token_mgr.get_valid_token(credentials).await {
        Ok(token) => Some(token),
        Err(e) => {
            warn!("Refreshing cached token failed: {e}");
            None
        }
    }
}

/// Runs the authorization code flow in the browser.
///
/// 1. Binds the local callback server on the redirect URI's address
/// 2. Opens the authorization URL in the default browser
/// 3. Waits for the callback to exchange the code for a token
async fn login(credentials: &Credentials) -> Result<Token> {
    let state = utils::generate_state();
    let (addr, callback_path) = utils::callback_target(&credentials.redirect_uri)?;

    let shared_state = Arc::new(Mutex::new(AuthState {
        state: state.clone(),
        credentials: credentials.clone(),
        token: None,
        error: None,
    }));

    let listener = server::bind(addr).await?;
    let server_state = Arc::clone(&shared_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, &callback_path, server_state).await {
            warn!("Callback server stopped: {e}");
        }
    });

    let auth_url = utils::authorize_url(
        &config::spotify_apiauth_url(),
        &credentials.client_id,
        &credentials.redirect_uri,
        &credentials.scope(),
        &state,
    )?;

    info!("A browser window will open for authorization");
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let result = wait_for_token(shared_state).await;
    server_handle.abort();
    result
}

/// Polls the shared state until the callback stored a token or an error.
async fn wait_for_token(shared_state: Arc<Mutex<AuthState>>) -> Result<Token> {
    use std::time::Instant;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let start = Instant::now();
    while start.elapsed() < LOGIN_TIMEOUT {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = &lock.token {
                pb.finish_and_clear();
                return Ok(token.clone());
            }
            if let Some(e) = &lock.error {
                pb.finish_and_clear();
                return Err(Error::Authorization(e.clone()));
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    pb.finish_and_clear();
    Err(Error::Authorization(format!(
        "no callback received within {} seconds",
        LOGIN_TIMEOUT.as_secs()
    )))
}

/// Exchanges an authorization code for a token.
pub async fn exchange_code(token_url: &str, credentials: &Credentials, code: &str) -> Result<Token> {
    debug!("POST {token_url} grant_type=authorization_code");
    let res = Client::new()
        .post(token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json = res.json::<TokenResponse>().await?;
    let refresh_token = json.refresh_token.clone().unwrap_or_default();
    Ok(into_token(json, &credentials.client_id, refresh_token))
}

/// Trades a refresh token for a new access token.
///
/// Spotify may omit the refresh token from the response, in which case the
/// old one stays valid and is kept.
pub async fn refresh_token(
    token_url: &str,
    credentials: &Credentials,
    refresh_token: &str,
) -> Result<Token> {
    debug!("POST {token_url} grant_type=refresh_token");
    let res = Client::new()
        .post(token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json = res.json::<TokenResponse>().await?;
    let refresh_token = json
        .refresh_token
        .clone()
        .unwrap_or_else(|| refresh_token.to_string());
    Ok(into_token(json, &credentials.client_id, refresh_token))
}

fn into_token(json: TokenResponse, client_id: &str, refresh_token: String) -> Token {
    Token {
        client_id: client_id.to_string(),
        access_token: json.access_token,
        refresh_token,
        scope: json.scope,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
