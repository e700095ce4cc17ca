use serde_json::json;
use toptracks::types::*;

#[test]
fn test_search_response_first_artist() {
    let body = json!({
        "artists": {
            "href": "https://api.spotify.com/v1/search?query=artist%3ABonobo&type=artist&offset=0&limit=1",
            "items": [{
                "id": "0cmWgDlu9CwTgxPhf403hb",
                "name": "Bonobo",
                "genres": ["downtempo"],
                "popularity": 66,
                "type": "artist"
            }],
            "limit": 1,
            "total": 120
        }
    });

    let response: SearchArtistsResponse = serde_json::from_value(body).unwrap();

    assert_eq!(response.artists.items.len(), 1);
    assert_eq!(response.artists.items[0].id, "0cmWgDlu9CwTgxPhf403hb");
    assert_eq!(response.artists.items[0].name, "Bonobo");
}

#[test]
fn test_search_response_no_match() {
    let body = json!({ "artists": { "items": [], "total": 0 } });

    let response: SearchArtistsResponse = serde_json::from_value(body).unwrap();

    assert!(response.artists.items.is_empty());
}

#[test]
fn test_top_tracks_response_keeps_order() {
    let body = json!({
        "tracks": [
            { "id": "a", "name": "Kerala", "popularity": 70, "uri": "spotify:track:a" },
            { "id": "b", "name": "Cirrus", "popularity": 65, "uri": "spotify:track:b" }
        ]
    });

    let response: TopTracksResponse = serde_json::from_value(body).unwrap();
    let names: Vec<&str> = response.tracks.iter().map(|t| t.name.as_str()).collect();

    assert_eq!(names, vec!["Kerala", "Cirrus"]);
}

#[test]
fn test_playlist_url() {
    let body = json!({
        "id": "37i9dQZF1DX",
        "name": "Electronic Discovery",
        "external_urls": { "spotify": "https://open.spotify.com/playlist/37i9dQZF1DX" }
    });

    let playlist: Playlist = serde_json::from_value(body).unwrap();

    assert_eq!(playlist.id, "37i9dQZF1DX");
    assert_eq!(playlist.url(), "https://open.spotify.com/playlist/37i9dQZF1DX");
}

#[test]
fn test_playlist_without_external_urls() {
    let playlist: Playlist = serde_json::from_value(json!({ "id": "p" })).unwrap();
    assert_eq!(playlist.url(), "");
}

#[test]
fn test_create_playlist_request_body() {
    let request = CreatePlaylistRequest {
        name: "Mix".to_string(),
        description: "desc".to_string(),
        public: true,
    };

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({ "name": "Mix", "description": "desc", "public": true })
    );
}

#[test]
fn test_current_user_without_display_name() {
    let user: CurrentUser =
        serde_json::from_value(json!({ "id": "listener", "display_name": null })).unwrap();

    assert_eq!(user.id, "listener");
    assert!(user.display_name.is_none());
}

#[test]
fn test_token_response_defaults() {
    let response: TokenResponse = serde_json::from_value(json!({
        "access_token": "BQD",
        "token_type": "Bearer"
    }))
    .unwrap();

    assert_eq!(response.expires_in, 3600);
    assert_eq!(response.scope, "");
    assert!(response.refresh_token.is_none());
}
