//! HTTP routes for planning endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    delete_intervention, drop_on_slot, get_agenda, get_double_bookings, get_filter,
    get_focused_hours, get_job_site_hours, get_month, get_snapshot, refresh, submit_voice_note,
    update_selection, PlanningHandlers,
};

/// Creates the planning router, meant to be nested under `/api/planning`.
pub fn planning_routes(handlers: PlanningHandlers) -> Router {
    Router::new()
        .route("/month", get(get_month))
        .route("/agenda", get(get_agenda))
        .route("/hours", get(get_focused_hours))
        .route("/hours/:job_site_id", get(get_job_site_hours))
        .route("/double-bookings", get(get_double_bookings))
        .route("/snapshot", get(get_snapshot))
        .route("/filter", get(get_filter))
        .route("/selection", post(update_selection))
        .route("/drop", post(drop_on_slot))
        .route("/interventions/:id", delete(delete_intervention))
        .route("/refresh", post(refresh))
        .route("/voice-notes", post(submit_voice_note))
        .with_state(handlers)
}
