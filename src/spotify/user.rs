use log::debug;

use crate::{Result, spotify::SpotifyClient, types::CurrentUser};

/// Fetches the profile of the user the access token belongs to.
///
/// # Arguments
///
/// * `client` - Authenticated client holding the access token
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(CurrentUser)` - Id and display name of the user
/// - `Err(Error)` - Network error, expired token or other non-success status
pub async fn current_user(client: &SpotifyClient) -> Result<CurrentUser> {
    let api_url = client.endpoint("me");
    debug!("GET {api_url}");

    let response = client
        .http()
        .get(&api_url)
        .bearer_auth(client.token())
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json::<CurrentUser>().await?)
}
