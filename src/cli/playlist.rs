use std::future::Future;

use log::debug;
use tabled::Table;

use crate::{
    Result, config,
    config::Credentials,
    failure, info, spotify,
    spotify::{MAX_TRACKS_PER_REQUEST, SpotifyApi},
    success,
    types::{ArtistTracks, CreatePlaylistRequest, Track, TrackTableRow},
    utils, warning,
};

const RULE_WIDTH: usize = 50;

/// What to put into the playlist and how to publish it.
#[derive(Debug, Clone)]
pub struct PlaylistSpec {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub artists: Vec<String>,
    pub tracks_per_artist: usize,
    pub market: String,
    /// Only resolve artists and tracks, never create or modify a playlist.
    pub dry_run: bool,
}

impl Default for PlaylistSpec {
    fn default() -> Self {
        Self {
            name: config::PLAYLIST_NAME.to_string(),
            description: config::PLAYLIST_DESCRIPTION.to_string(),
            public: true,
            artists: config::ARTISTS.iter().map(|a| a.to_string()).collect(),
            tracks_per_artist: config::TRACKS_PER_ARTIST,
            market: config::MARKET.to_string(),
            dry_run: false,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct PlaylistSummary {
    pub name: String,
    /// Shareable link, `None` on a dry run.
    pub url: Option<String>,
    pub track_ids: Vec<String>,
    pub collected: Vec<ArtistTracks>,
}

/// Entry point of the default command: logs in through the browser flow and
/// builds the playlist.
pub async fn playlist(credentials: Option<Credentials>, spec: PlaylistSpec) -> Result<()> {
    run(
        credentials,
        |credentials| async move { spotify::auth::authorize(&credentials, false).await },
        &spec,
    )
    .await?;
    Ok(())
}

/// Checks the credentials, connects and builds the playlist.
///
/// Missing credentials print the setup guidance and return `Ok(None)` without
/// calling `connect`, so nothing touches the network.
pub async fn run<A, F, Fut>(
    credentials: Option<Credentials>,
    connect: F,
    spec: &PlaylistSpec,
) -> Result<Option<PlaylistSummary>>
where
    A: SpotifyApi,
    F: FnOnce(Credentials) -> Fut,
    Fut: Future<Output = Result<A>>,
{
    println!("🎵 Spotify Playlist Creator - {}", spec.name);
    println!("{}", "=".repeat(RULE_WIDTH));

    let Some(credentials) = credentials else {
        failure!("Error: Please set your Spotify API credentials!");
        print_setup_instructions();
        return Ok(None);
    };

    info!("Authenticating with Spotify...");
    let api = connect(credentials).await?;
    build_playlist(&api, spec).await.map(Some)
}

/// Runs the procedure against an authenticated API.
///
/// The playlist is created once, before any track is appended. Artists that
/// cannot be resolved are reported and skipped.
pub async fn build_playlist<A: SpotifyApi>(api: &A, spec: &PlaylistSpec) -> Result<PlaylistSummary> {
    let user = api.current_user().await?;
    success!(
        "Logged in as: {} ({})",
        user.display_name.as_deref().unwrap_or(&user.id),
        user.id
    );

    let playlist = if spec.dry_run {
        info!("Dry run, no playlist will be created");
        None
    } else {
        info!("Creating playlist: {}", spec.name);
        let request = CreatePlaylistRequest {
            name: spec.name.clone(),
            description: spec.description.clone(),
            public: spec.public,
        };
        let playlist = api.create_playlist(&user.id, &request).await?;
        success!("Playlist created!");
        Some(playlist)
    };

    info!("Searching for artists and their top tracks...");
    let collected = collect_tracks(api, spec).await?;
    let track_ids: Vec<String> = collected
        .iter()
        .flat_map(|at| at.tracks.iter().map(|t| t.id.clone()))
        .collect();

    if let Some(playlist) = &playlist {
        if !track_ids.is_empty() {
            info!("Adding {} tracks to playlist...", track_ids.len());
            add_tracks_in_batches(api, &playlist.id, &track_ids).await?;
            success!("Tracks added successfully!");
        }
    }

    let summary = PlaylistSummary {
        name: spec.name.clone(),
        url: playlist.map(|p| p.url().to_string()),
        track_ids,
        collected,
    };
    print_summary(&summary);
    Ok(summary)
}

/// Resolves each artist in order and keeps its first `tracks_per_artist`
/// top tracks. Unresolved artists contribute nothing.
pub async fn collect_tracks<A: SpotifyApi>(api: &A, spec: &PlaylistSpec) -> Result<Vec<ArtistTracks>> {
    let mut collected = Vec::new();

    for artist_name in &spec.artists {
        let Some(artist) = api.search_artist(artist_name).await? else {
            warning!("Could not find: {}", artist_name);
            continue;
        };

        let tracks = top_tracks(api, &artist.id, &spec.market, spec.tracks_per_artist).await?;
        success!(
            "{}: {} tracks - {}...",
            artist.name,
            tracks.len(),
            utils::track_names_preview(&tracks, utils::PREVIEW_CHARS)
        );
        collected.push(ArtistTracks { artist, tracks });
    }

    Ok(collected)
}

/// Top tracks of an artist cut down to `limit` entries.
pub async fn top_tracks<A: SpotifyApi>(
    api: &A,
    artist_id: &str,
    market: &str,
    limit: usize,
) -> Result<Vec<Track>> {
    let mut tracks = api.top_tracks(artist_id, market).await?;
    tracks.truncate(limit);
    Ok(tracks)
}

/// Appends the ids in order using as few requests as the per-request limit
/// allows. Returns the number of requests sent.
pub async fn add_tracks_in_batches<A: SpotifyApi>(
    api: &A,
    playlist_id: &str,
    track_ids: &[String],
) -> Result<usize> {
    let mut requests = 0;
    for batch in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
        debug!("Adding batch of {} tracks", batch.len());
        api.add_tracks(playlist_id, batch).await?;
        requests += 1;
    }
    Ok(requests)
}

pub(crate) fn print_setup_instructions() {
    println!();
    println!("Instructions:");
    for line in config::setup_instructions() {
        println!("{line}");
    }
}

fn print_summary(summary: &PlaylistSummary) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));

    match &summary.url {
        Some(url) => {
            success!("Playlist created successfully!");
            println!("   Name: {}", summary.name);
            println!("   Total tracks: {}", summary.track_ids.len());
            println!("   URL: {url}");
            println!();
            println!("Open Spotify and enjoy your new playlist! 🎧");
        }
        None => {
            let rows: Vec<TrackTableRow> = summary
                .collected
                .iter()
                .flat_map(|at| {
                    at.tracks.iter().map(|t| TrackTableRow {
                        artist: at.artist.name.clone(),
                        track: t.name.clone(),
                    })
                })
                .collect();

            println!("{}", Table::new(rows));
            info!(
                "{} tracks would be added to {}",
                summary.track_ids.len(),
                summary.name
            );
        }
    }
}
