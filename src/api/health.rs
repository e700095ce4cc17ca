use axum::response::Json;
use serde_json::{Value, json};

/// Liveness check of the callback server, reports name and version.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "waiting_for": "spotify-callback"
    }))
}
