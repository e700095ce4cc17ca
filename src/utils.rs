use std::net::{SocketAddr, ToSocketAddrs};

use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;

use crate::{Error, Result, types::Track};

/// Route of the callback server's health check.
pub const HEALTH_PATH: &str = "/health";

/// Number of characters of joined track names shown per artist.
pub const PREVIEW_CHARS: usize = 60;

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Joins the track names and cuts the result after `max_chars` characters.
pub fn track_names_preview(tracks: &[Track], max_chars: usize) -> String {
    tracks
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
        .chars()
        .take(max_chars)
        .collect()
}

/// Socket address and path the callback server has to serve for a redirect URI.
pub fn callback_target(redirect_uri: &str) -> Result<(SocketAddr, String)> {
    let url = Url::parse(redirect_uri)
        .map_err(|e| Error::Configuration(format!("invalid redirect URI {redirect_uri}: {e}")))?;

    let host = url
        .host_str()
        .ok_or_else(|| Error::Configuration(format!("redirect URI {redirect_uri} has no host")))?;
    let port = url.port_or_known_default().ok_or_else(|| {
        Error::Configuration(format!("redirect URI {redirect_uri} has no port"))
    })?;

    // "localhost" resolves to several addresses, the first one is enough
    let addr = (host.trim_matches(['[', ']']), port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| Error::Configuration(format!("cannot resolve host {host}")))?;

    let path = url.path().to_string();
    if path == HEALTH_PATH {
        return Err(Error::Configuration(format!(
            "redirect URI {redirect_uri} uses {HEALTH_PATH}, which is reserved for the health check"
        )));
    }

    Ok((addr, path))
}

/// Authorization URL the user has to open in the browser.
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> Result<Url> {
    Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", scope),
            ("state", state),
        ],
    )
    .map_err(|e| Error::Configuration(format!("invalid authorization URL {auth_url}: {e}")))
}

/// Spotify URI of a track id as expected by the playlist endpoints.
pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{id}")
}
