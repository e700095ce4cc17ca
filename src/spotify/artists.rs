use log::debug;

use crate::{
    Result,
    spotify::SpotifyClient,
    types::{Artist, SearchArtistsResponse, TopTracksResponse, Track},
};

/// Resolves an artist name to the first search hit.
pub async fn search(client: &SpotifyClient, name: &str) -> Result<Option<Artist>> {
    let api_url = client.endpoint("search");
    let query = format!("artist:{name}");
    debug!("GET {api_url} q={query}");

    let response = client
        .http()
        .get(&api_url)
        .query(&[("q", query.as_str()), ("type", "artist"), ("limit", "1")])
        .bearer_auth(client.token())
        .send()
        .await?
        .error_for_status()?;

    let json = response.json::<SearchArtistsResponse>().await?;
    Ok(json.artists.items.into_iter().next())
}

/// Fetches the top tracks of an artist for a market.
pub async fn top_tracks(client: &SpotifyClient, artist_id: &str, market: &str) -> Result<Vec<Track>> {
    let api_url = client.endpoint(&format!("artists/{artist_id}/top-tracks"));
    debug!("GET {api_url} market={market}");

    let response = client
        .http()
        .get(&api_url)
        .query(&[("market", market)])
        .bearer_auth(client.token())
        .send()
        .await?
        .error_for_status()?;

    let json = response.json::<TopTracksResponse>().await?;
    Ok(json.tracks)
}
