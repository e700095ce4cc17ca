use crate::{
    Result, cli::playlist::print_setup_instructions, config::Credentials, failure, info, spotify,
    spotify::SpotifyApi, success,
};

/// Logs in, caches the token and reports who is logged in.
///
/// With `force` the cached token is ignored and the browser login runs again.
pub async fn auth(credentials: Option<Credentials>, force: bool) -> Result<()> {
    let Some(credentials) = credentials else {
        failure!("Error: Please set your Spotify API credentials!");
        print_setup_instructions();
        return Ok(());
    };

    info!("Authenticating with Spotify...");
    let client = spotify::auth::authorize(&credentials, force).await?;
    let user = client.current_user().await?;
    success!(
        "Logged in as: {} ({})",
        user.display_name.as_deref().unwrap_or(&user.id),
        user.id
    );
    Ok(())
}
