use thiserror::Error;

/// Errors raised while talking to Spotify or preparing a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Spotify request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Cannot add {0} tracks in one request, the limit is {max}", max = crate::spotify::MAX_TRACKS_PER_REQUEST)]
    BatchTooLarge(usize),

    #[error("Callback server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, Error>;
