use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use toptracks::{
    Error, Result,
    cli::{
        PlaylistSpec,
        playlist::{add_tracks_in_batches, build_playlist, collect_tracks, run},
    },
    config::Credentials,
    spotify::{MAX_TRACKS_PER_REQUEST, SpotifyApi, SpotifyClient},
    types::{Artist, CreatePlaylistRequest, CurrentUser, Playlist, Track},
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CurrentUser,
    Search(String),
    TopTracks(String, String),
    CreatePlaylist(String, String, bool),
    AddTracks(String, Vec<String>),
}

// In-memory Spotify that records every call in order
#[derive(Default)]
struct FakeSpotify {
    artists: HashMap<String, Artist>,
    top_tracks: HashMap<String, Vec<Track>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeSpotify {
    fn with_artist(mut self, name: &str, id: &str, track_count: usize) -> Self {
        self.artists.insert(
            name.to_string(),
            Artist {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self.top_tracks.insert(
            id.to_string(),
            (0..track_count)
                .map(|i| Track {
                    id: format!("{id}_track_{i}"),
                    name: format!("{name} Song {i}"),
                })
                .collect(),
        );
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn add_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AddTracks(_, ids) => Some(ids),
                _ => None,
            })
            .collect()
    }
}

impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> Result<CurrentUser> {
        self.calls.borrow_mut().push(Call::CurrentUser);
        Ok(CurrentUser {
            id: "listener".to_string(),
            display_name: Some("Test Listener".to_string()),
        })
    }

    async fn search_artist(&self, name: &str) -> Result<Option<Artist>> {
        self.calls.borrow_mut().push(Call::Search(name.to_string()));
        Ok(self.artists.get(name).cloned())
    }

    async fn top_tracks(&self, artist_id: &str, market: &str) -> Result<Vec<Track>> {
        self.calls
            .borrow_mut()
            .push(Call::TopTracks(artist_id.to_string(), market.to_string()));
        Ok(self.top_tracks.get(artist_id).cloned().unwrap_or_default())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist> {
        self.calls.borrow_mut().push(Call::CreatePlaylist(
            user_id.to_string(),
            request.name.clone(),
            request.public,
        ));
        Ok(Playlist {
            id: "playlist_1".to_string(),
            external_urls: HashMap::from([(
                "spotify".to_string(),
                "https://open.spotify.com/playlist/playlist_1".to_string(),
            )]),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        if track_ids.len() > MAX_TRACKS_PER_REQUEST {
            return Err(Error::BatchTooLarge(track_ids.len()));
        }
        self.calls
            .borrow_mut()
            .push(Call::AddTracks(playlist_id.to_string(), track_ids.to_vec()));
        Ok(())
    }
}

fn spec(artists: &[&str], tracks_per_artist: usize) -> PlaylistSpec {
    PlaylistSpec {
        artists: artists.iter().map(|a| a.to_string()).collect(),
        tracks_per_artist,
        ..PlaylistSpec::default()
    }
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("track{i}")).collect()
}

fn credentials() -> Credentials {
    Credentials {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
    }
}

#[tokio::test]
async fn test_batches_of_250_ids() {
    let api = FakeSpotify::default();
    let track_ids = ids(250);

    let requests = add_tracks_in_batches(&api, "playlist_1", &track_ids)
        .await
        .unwrap();

    assert_eq!(requests, 3);
    let sizes: Vec<usize> = api.add_calls().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    assert_eq!(api.add_calls().concat(), track_ids);
}

#[tokio::test]
async fn test_batches_preserve_order_without_loss() {
    for n in [0, 1, 99, 100, 101, 200, 301] {
        let api = FakeSpotify::default();
        let track_ids = ids(n);

        let requests = add_tracks_in_batches(&api, "p", &track_ids).await.unwrap();

        assert_eq!(requests, n.div_ceil(MAX_TRACKS_PER_REQUEST), "n = {n}");
        let batches = api.add_calls();
        assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= 100));
        assert_eq!(batches.concat(), track_ids, "n = {n}");
    }
}

#[tokio::test]
async fn test_unresolved_artist_is_skipped() {
    let api = FakeSpotify::default()
        .with_artist("Bonobo", "bonobo", 4)
        .with_artist("Caribou", "caribou", 4);

    let collected = collect_tracks(&api, &spec(&["Bonobo", "Nobody Known", "Caribou"], 2))
        .await
        .unwrap();

    let names: Vec<&str> = collected.iter().map(|at| at.artist.name.as_str()).collect();
    assert_eq!(names, vec!["Bonobo", "Caribou"]);
    assert!(collected.iter().all(|at| at.tracks.len() == 2));
    assert!(api.calls().contains(&Call::Search("Nobody Known".to_string())));
    let looked_up: Vec<Call> = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::TopTracks(..)))
        .collect();
    assert_eq!(
        looked_up,
        vec![
            Call::TopTracks("bonobo".to_string(), "US".to_string()),
            Call::TopTracks("caribou".to_string(), "US".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_top_tracks_are_limited_and_keep_order() {
    let api = FakeSpotify::default().with_artist("Moby", "moby", 10);

    let collected = collect_tracks(&api, &spec(&["Moby"], 3)).await.unwrap();

    let track_ids: Vec<&str> = collected[0].tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(track_ids, vec!["moby_track_0", "moby_track_1", "moby_track_2"]);
    assert!(api.calls().contains(&Call::TopTracks("moby".to_string(), "US".to_string())));
}

#[tokio::test]
async fn test_artist_without_tracks_contributes_nothing() {
    let api = FakeSpotify::default().with_artist("Quiet", "quiet", 0);

    let summary = build_playlist(&api, &spec(&["Quiet"], 3)).await.unwrap();

    assert!(summary.track_ids.is_empty());
    assert!(api.add_calls().is_empty());
}

#[tokio::test]
async fn test_end_to_end_one_resolved_one_missing() {
    let api = FakeSpotify::default().with_artist("Bicep", "bicep", 5);

    let summary = build_playlist(&api, &spec(&["Bicep", "Unknown Artist"], 3))
        .await
        .unwrap();

    assert_eq!(summary.track_ids.len(), 3);
    assert_eq!(
        summary.url.as_deref(),
        Some("https://open.spotify.com/playlist/playlist_1")
    );

    let calls = api.calls();
    let creates: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Call::CreatePlaylist(..)))
        .map(|(i, _)| i)
        .collect();
    let first_add = calls
        .iter()
        .position(|c| matches!(c, Call::AddTracks(..)))
        .unwrap();

    assert_eq!(creates.len(), 1);
    assert!(creates[0] < first_add);
    assert_eq!(
        calls[creates[0]],
        Call::CreatePlaylist(
            "listener".to_string(),
            toptracks::config::PLAYLIST_NAME.to_string(),
            true
        )
    );
    assert_eq!(api.add_calls(), vec![summary.track_ids.clone()]);
}

#[tokio::test]
async fn test_duplicates_across_artists_are_kept() {
    let mut api = FakeSpotify::default()
        .with_artist("Four Tet", "fourtet", 2)
        .with_artist("Caribou", "caribou", 0);
    // a collaboration shows up in both artists' top tracks
    let shared = api.top_tracks["fourtet"].clone();
    api.top_tracks.insert("caribou".to_string(), shared);

    let summary = build_playlist(&api, &spec(&["Four Tet", "Caribou"], 3))
        .await
        .unwrap();

    assert_eq!(
        summary.track_ids,
        vec![
            "fourtet_track_0",
            "fourtet_track_1",
            "fourtet_track_0",
            "fourtet_track_1"
        ]
    );
}

#[tokio::test]
async fn test_dry_run_does_not_touch_playlists() {
    let api = FakeSpotify::default().with_artist("Moderat", "moderat", 5);
    let spec = PlaylistSpec {
        dry_run: true,
        ..spec(&["Moderat"], 3)
    };

    let summary = build_playlist(&api, &spec).await.unwrap();

    assert_eq!(summary.track_ids.len(), 3);
    assert!(summary.url.is_none());
    assert!(
        !api.calls()
            .iter()
            .any(|c| matches!(c, Call::CreatePlaylist(..) | Call::AddTracks(..)))
    );
}

#[tokio::test]
async fn test_missing_credentials_never_connect() {
    let connected = Cell::new(false);

    let result = run(
        None,
        |_| async {
            connected.set(true);
            Ok(FakeSpotify::default())
        },
        &PlaylistSpec::default(),
    )
    .await
    .unwrap();

    assert!(result.is_none());
    assert!(!connected.get());
}

#[tokio::test]
async fn test_run_with_credentials_builds_playlist() {
    let result = run(
        Some(credentials()),
        |creds| async move {
            assert_eq!(creds.client_id, "id");
            Ok(FakeSpotify::default()
                .with_artist("Jamie xx", "jamiexx", 5)
                .with_artist("Catching Flies", "flies", 1))
        },
        &spec(&["Jamie xx", "Catching Flies"], 3),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(result.track_ids.len(), 4);
    assert_eq!(result.collected.len(), 2);
}

#[tokio::test]
async fn test_connect_error_propagates() {
    let result = run(
        Some(credentials()),
        |_| async { Err::<FakeSpotify, _>(Error::Authorization("denied".to_string())) },
        &PlaylistSpec::default(),
    )
    .await;

    assert!(matches!(result, Err(Error::Authorization(_))));
}

#[tokio::test]
async fn test_client_rejects_oversized_batch_before_sending() {
    // nothing listens on the discard port, any request would fail with Http
    let client = SpotifyClient::with_api_url("http://127.0.0.1:9", "token");

    let result = client.add_tracks("playlist_1", &ids(101)).await;

    assert!(matches!(result, Err(Error::BatchTooLarge(101))));
}
