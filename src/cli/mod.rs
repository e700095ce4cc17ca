//! # CLI Module
//!
//! User-facing commands. Each command prints progress through the crate's
//! `info!`/`success!`/`warning!` macros and returns errors to `main`.
//!
//! - [`playlist`] - Builds the playlist from the artists' top tracks (default)
//! - [`auth`] - Logs in and caches the token without touching playlists
//!
//! ```bash
//! toptracks                                   # built-in artist list
//! toptracks create --artist Bonobo --artist Bicep --tracks-per-artist 5
//! toptracks create --dry-run                  # preview, no playlist
//! toptracks auth --force                      # log in again
//! ```

mod auth;
pub mod playlist;

pub use auth::auth;
pub use playlist::{PlaylistSpec, PlaylistSummary, playlist};
