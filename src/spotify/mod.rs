//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API the playlist builder needs.
//!
//! ```text
//! cli::playlist (procedure)
//!          ↓
//!   SpotifyApi trait
//!          ↓
//!   SpotifyClient (reqwest, JSON)
//!     ├── auth      authorization code flow, token exchange and refresh
//!     ├── artists   artist search, top tracks
//!     ├── playlist  playlist creation, track appending
//!     └── user      current user profile
//!          ↓
//!   Spotify Web API
//! ```
//!
//! Every request is sent once. Non-success statuses are turned into errors
//! with `error_for_status` and bubble up to the caller unchanged.

pub mod artists;
pub mod auth;
pub mod playlist;
pub mod user;

use reqwest::Client;

use crate::{
    Result, config,
    types::{Artist, CreatePlaylistRequest, CurrentUser, Playlist, Track},
};

/// Upper bound on track ids per "add tracks to playlist" request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Remote operations used while building a playlist.
#[allow(async_fn_in_trait)]
pub trait SpotifyApi {
    /// Profile of the user the client is authenticated as.
    async fn current_user(&self) -> Result<CurrentUser>;

    /// First artist matching `name`, `None` when the search finds nothing.
    async fn search_artist(&self, name: &str) -> Result<Option<Artist>>;

    /// Top tracks of an artist in the given market, in Spotify's ranking order.
    async fn top_tracks(&self, artist_id: &str, market: &str) -> Result<Vec<Track>>;

    /// Creates an empty playlist owned by `user_id`.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Spotify id of the owner, as returned by [`SpotifyApi::current_user`]
    /// * `request` - Name, description and visibility of the playlist
    ///
    /// # Returns
    ///
    /// The created playlist with its id, needed for [`SpotifyApi::add_tracks`].
    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist>;

    /// Appends at most [`MAX_TRACKS_PER_REQUEST`] tracks in one request.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;
}

/// Authenticated client for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    /// Client for the Spotify Web API at its configured base URL.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_api_url(config::spotify_apiurl(), access_token)
    }

    /// Client for a Web API served at `api_url`.
    ///
    /// A trailing slash on `api_url` is ignored. No request is sent until one
    /// of the [`SpotifyApi`] operations is called.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL the endpoint paths are appended to
    /// * `access_token` - Bearer token sent with every request
    ///
    /// # Example
    ///
    /// ```
    /// let client = SpotifyClient::with_api_url("https://api.spotify.com/v1/", token);
    /// let user = client.current_user().await?;
    /// ```
    pub fn with_api_url(api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn token(&self) -> &str {
        &self.access_token
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> Result<CurrentUser> {
        user::current_user(self).await
    }

    async fn search_artist(&self, name: &str) -> Result<Option<Artist>> {
        artists::search(self, name).await
    }

    async fn top_tracks(&self, artist_id: &str, market: &str) -> Result<Vec<Track>> {
        artists::top_tracks(self, artist_id, market).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist> {
        playlist::create(self, user_id, request).await
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        playlist::add_tracks(self, playlist_id, track_ids).await
    }
}
