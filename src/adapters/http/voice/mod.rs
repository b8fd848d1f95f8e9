//! HTTP adapter for the voice webhook proxy.

mod handlers;

use axum::{routing::post, Router};

pub use handlers::{forward_voice_note, ProxyErrorResponse, VoiceProxyState};

/// Creates the proxy router with its full path.
pub fn voice_routes(state: VoiceProxyState) -> Router {
    Router::new()
        .route("/api/voice-webhook", post(forward_voice_note))
        .with_state(state)
}
