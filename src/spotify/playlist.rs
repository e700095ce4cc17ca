use log::debug;

use crate::{
    Error, Result,
    spotify::{MAX_TRACKS_PER_REQUEST, SpotifyClient},
    types::{AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest, Playlist},
    utils,
};

/// Creates a new playlist owned by the given user.
///
/// Sends the name, description and visibility from `request` to the user's
/// playlist collection. The playlist starts out empty, tracks are appended
/// afterwards with [`add_tracks`].
///
/// # Arguments
///
/// * `client` - Authenticated client holding the access token
/// * `user_id` - Spotify id of the playlist owner, usually the current user
/// * `request` - Name, description and visibility of the new playlist
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Playlist)` - Id and shareable URL of the created playlist
/// - `Err(Error)` - Network error, non-success status or unexpected response body
///
/// # Example
///
/// ```
/// let request = CreatePlaylistRequest {
///     name: "Top Tracks".to_string(),
///     description: "Generated".to_string(),
///     public: false,
/// };
/// let playlist = create(&client, &user.id, &request).await?;
/// println!("{}", playlist.url());
/// ```
pub async fn create(
    client: &SpotifyClient,
    user_id: &str,
    request: &CreatePlaylistRequest,
) -> Result<Playlist> {
    let api_url = client.endpoint(&format!("users/{user_id}/playlists"));
    debug!("POST {api_url} name={:?} public={}", request.name, request.public);

    let response = client
        .http()
        .post(&api_url)
        .bearer_auth(client.token())
        .json(request)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json::<Playlist>().await?)
}

/// Appends one batch of tracks. Batches above the API limit are rejected
/// before anything is sent.
pub async fn add_tracks(client: &SpotifyClient, playlist_id: &str, track_ids: &[String]) -> Result<()> {
    if track_ids.len() > MAX_TRACKS_PER_REQUEST {
        return Err(Error::BatchTooLarge(track_ids.len()));
    }

    let api_url = client.endpoint(&format!("playlists/{playlist_id}/tracks"));
    debug!("POST {api_url} tracks={}", track_ids.len());

    let body = AddTrackToPlaylistRequest {
        uris: track_ids.iter().map(|id| utils::track_uri(id)).collect(),
    };

    let response = client
        .http()
        .post(&api_url)
        .bearer_auth(client.token())
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    let json = response.json::<AddTrackToPlaylistResponse>().await?;
    debug!("Playlist {playlist_id} now at snapshot {}", json.snapshot_id);
    Ok(())
}
