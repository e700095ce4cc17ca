//! Configuration management for the top tracks playlist builder.
//!
//! Values come from, in order of priority:
//! 1. Process environment variables
//! 2. A `.env` file in the local data directory (`toptracks/.env`)
//! 3. A `.env` file in the current working directory
//! 4. Built-in defaults
//!
//! The credential variable names follow the conventions of the popular
//! Spotify client libraries (`SPOTIPY_*`) so an existing setup keeps working.

use std::{env, path::PathBuf};

use log::debug;

use crate::Result;

pub const CLIENT_ID_VAR: &str = "SPOTIPY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIPY_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "SPOTIPY_REDIRECT_URI";

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Scopes needed to create a playlist and add tracks to it.
pub const SCOPES: &[&str] = &["playlist-modify-public", "playlist-modify-private"];

/// Artists included in the playlist unless overridden on the command line.
pub const ARTISTS: &[&str] = &[
    "Bonobo",
    "Sofia Kourtesis",
    "Bicep",
    "Barry Can't Swim",
    "Moby",
    "Catching Flies",
    "Jamie xx",
    "Moderat",
    "Caribou",
    "Four Tet",
];

pub const TRACKS_PER_ARTIST: usize = 3;

/// Market used for the top tracks lookup.
pub const MARKET: &str = "US";

pub const PLAYLIST_NAME: &str = "Electronic Discovery 🎧";
pub const PLAYLIST_DESCRIPTION: &str = "A curated selection of electronic/ambient music featuring Bonobo, Sofia Kourtesis, Bicep, Barry Can't Swim, Moby, Catching Flies, Jamie XX, Moderat, Caribou, and Four Tet.";

/// Client credentials of a registered Spotify app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Credentials {
    /// Reads the credentials from the process environment.
    ///
    /// Returns `None` when the client id or the client secret is missing.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Credentials::from_env`] over an arbitrary variable lookup.
    ///
    /// Empty values count as missing. The redirect URI falls back to
    /// [`DEFAULT_REDIRECT_URI`].
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = non_empty(CLIENT_ID_VAR)?;
        let client_secret = non_empty(CLIENT_SECRET_VAR)?;
        let redirect_uri =
            non_empty(REDIRECT_URI_VAR).unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        Some(Self {
            client_id,
            client_secret,
            redirect_uri,
        })
    }

    /// Space separated scope string as expected by the authorize endpoint.
    pub fn scope(&self) -> String {
        SCOPES.join(" ")
    }
}

/// Loads `.env` files from the local data directory and the working directory.
///
/// Missing files are skipped. Variables already present in the environment
/// are never overwritten.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| {
            crate::Error::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        debug!("Loaded environment from {}", path.display());
    }

    if let Ok(local) = dotenv::dotenv() {
        debug!("Loaded environment from {}", local.display());
    }

    Ok(())
}

/// Directory holding the `.env` file and the token cache.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("toptracks");
    path
}

/// Base URL of the Spotify Web API.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Spotify OAuth authorization URL the browser is sent to.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

/// Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Guidance printed when no credentials are configured.
pub fn setup_instructions() -> Vec<String> {
    vec![
        "1. Go to https://developer.spotify.com/dashboard".to_string(),
        "2. Create a new app".to_string(),
        format!("3. Set redirect URI to: {DEFAULT_REDIRECT_URI}"),
        "4. Copy your Client ID and Client Secret".to_string(),
        "5. Either:".to_string(),
        format!("   - Set environment variables: {CLIENT_ID_VAR}, {CLIENT_SECRET_VAR}"),
        format!(
            "   - Or put them into {}",
            data_dir().join(".env").display()
        ),
    ]
}
