use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;

use crate::{Result, config, config::Credentials, spotify, types::Token};

/// Seconds before the real expiry at which a token is treated as expired.
const EXPIRY_MARGIN: u64 = 240;

/// Owns the cached OAuth token and keeps it usable.
///
/// The token lives in `<data dir>/cache/token.json`. A manager is created
/// from that cache, hands out access tokens and refreshes them when they are
/// about to expire, writing the new token back to the same file.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    /// Wraps a token that was just obtained or built by hand.
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    /// Loads the token from the default cache location.
    ///
    /// # Errors
    ///
    /// Fails when no cache exists yet or the file holds no valid token,
    /// see [`TokenManager::load_from`].
    pub async fn load() -> Result<Self> {
        Self::load_from(&Self::token_path()).await
    }

    /// Loads the token cached at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - JSON file written earlier by [`TokenManager::persist_to`]
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` when the file cannot be read and `Error::Parse`
    /// when its content is not a token.
    ///
    /// # Example
    ///
    /// ```
    /// let manager = TokenManager::load_from(&TokenManager::token_path()).await?;
    /// println!("{}", manager.current_token().scope);
    /// ```
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = async_fs::read_to_string(path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token })
    }

    /// Writes the token to the default cache location.
    pub async fn persist(&self) -> Result<()> {
        self.persist_to(&Self::token_path()).await
    }

    /// Writes the token to `path` as pretty-printed JSON.
    ///
    /// Missing parent directories are created. An existing cache at `path`
    /// is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` when the directory or the file cannot be written.
    pub async fn persist_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        debug!("Token cached at {}", path.display());
        Ok(())
    }

    /// Returns an access token, refreshing and re-caching it first when it
    /// has expired.
    pub async fn get_valid_token(&mut self, credentials: &Credentials) -> Result<String> {
        if self.is_expired() {
            debug!("Cached token expired, refreshing");
            self.token = spotify::auth::refresh_token(
                &config::spotify_apitoken_url(),
                credentials,
                &self.token.refresh_token,
            )
            .await?;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    /// Whether the token is expired or expires within the next four minutes.
    ///
    /// Corrupt timestamps in the cache saturate instead of overflowing. A huge
    /// `obtained_at` or `expires_in` reads as "not expired", the next API call
    /// then fails with an authorization error and `auth --force` starts over.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now.saturating_add(EXPIRY_MARGIN)
            >= self.token.obtained_at.saturating_add(self.token.expires_in)
    }

    /// Whether the token was issued to the app with `client_id`.
    pub fn issued_to(&self, client_id: &str) -> bool {
        self.token.client_id == client_id
    }

    /// Whether the token was granted every scope in `scopes`.
    pub fn covers(&self, scopes: &[&str]) -> bool {
        let granted: Vec<&str> = self.token.scope.split_whitespace().collect();
        scopes.iter().all(|s| granted.contains(s))
    }

    /// Default location of the token cache.
    pub fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }

    /// The token as currently held, without checking its expiry.
    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
