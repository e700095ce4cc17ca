use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::config::Credentials;

/// OAuth token as kept in the token cache.
///
/// `client_id` records which registered app the token was issued to. Caches
/// written without it deserialize to an empty id and never match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub client_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Body returned by the token endpoint for both grant types.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// State of one browser login, shared with the callback handler.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub state: String,
    pub credentials: Credentials,
    pub token: Option<Token>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: ArtistsPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistsPage {
    pub items: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
}

/// Tracks collected for one resolved artist.
#[derive(Debug, Clone)]
pub struct ArtistTracks {
    pub artist: Artist,
    pub tracks: Vec<Track>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub artist: String,
    pub track: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl Playlist {
    /// Shareable link of the playlist, empty when Spotify sent none.
    pub fn url(&self) -> &str {
        self.external_urls
            .get("spotify")
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
