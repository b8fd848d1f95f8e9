//! HTTP adapters - REST API implementations.
//!
//! Each area has its own HTTP adapter; [`app_router`] assembles them.

pub mod planning;
pub mod voice;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub use planning::{planning_routes, PlanningHandlers};
pub use voice::{voice_routes, VoiceProxyState};

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Full application router. The voice proxy is mounted only when configured.
pub fn app_router(planning: PlanningHandlers, voice_proxy: Option<VoiceProxyState>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/planning", planning_routes(planning));

    match voice_proxy {
        Some(state) => router.merge(voice_routes(state)),
        None => router,
    }
}
