//! # API Module
//!
//! HTTP handlers served by the local server while the user logs in.
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization page,
//!   checks the `state` parameter and exchanges the code for a token.
//! - [`health`] - Reports status and version, handy to check the port is ours.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
