//! HTTP handlers for planning endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;

use crate::application::handlers::planning::{
    DeleteInterventionCommand, DeleteInterventionHandler, HandleDropCommand, HandleDropHandler,
    PlanningQueries, RefreshScheduleCommand, RefreshScheduleHandler, SelectionCommand,
    SubmitVoiceNoteCommand, SubmitVoiceNoteHandler, UpdateSelectionHandler,
};
use crate::domain::foundation::{CommandMetadata, ErrorCode, InterventionId, JobSiteId, UserId};
use crate::domain::planning::PlanningError;

use super::dto::{
    DeleteResponse, DropRequest, DropResponse, ErrorResponse, MonthQuery, RefreshResponse,
    VoiceNoteResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PlanningHandlers {
    user_id: UserId,
    drop_handler: Arc<HandleDropHandler>,
    delete_handler: Arc<DeleteInterventionHandler>,
    refresh_handler: Arc<RefreshScheduleHandler>,
    selection_handler: Arc<UpdateSelectionHandler>,
    voice_handler: Option<Arc<SubmitVoiceNoteHandler>>,
    queries: Arc<PlanningQueries>,
}

impl PlanningHandlers {
    pub fn new(
        user_id: UserId,
        drop_handler: Arc<HandleDropHandler>,
        delete_handler: Arc<DeleteInterventionHandler>,
        refresh_handler: Arc<RefreshScheduleHandler>,
        selection_handler: Arc<UpdateSelectionHandler>,
        queries: Arc<PlanningQueries>,
    ) -> Self {
        Self {
            user_id,
            drop_handler,
            delete_handler,
            refresh_handler,
            selection_handler,
            voice_handler: None,
            queries,
        }
    }

    /// Enables `POST /voice-notes`.
    pub fn with_voice(mut self, voice_handler: Arc<SubmitVoiceNoteHandler>) -> Self {
        self.voice_handler = Some(voice_handler);
        self
    }

    fn metadata(&self, headers: &HeaderMap) -> CommandMetadata {
        let metadata = CommandMetadata::new(self.user_id.clone()).with_source("http");
        match headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            Some(id) => metadata.with_correlation_id(id),
            None => metadata,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Queries
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/planning/month - Month grid around the current anchor
pub async fn get_month(
    State(handlers): State<PlanningHandlers>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    Json(handlers.queries.month_grid(today).await).into_response()
}

/// GET /api/planning/agenda - Interventions on the anchor date
pub async fn get_agenda(State(handlers): State<PlanningHandlers>) -> Response {
    Json(handlers.queries.day_agenda().await).into_response()
}

/// GET /api/planning/hours - Hours of the focused job-site, `null` without focus
pub async fn get_focused_hours(State(handlers): State<PlanningHandlers>) -> Response {
    Json(handlers.queries.focused_hours().await).into_response()
}

/// GET /api/planning/hours/:job_site_id
pub async fn get_job_site_hours(
    State(handlers): State<PlanningHandlers>,
    Path(job_site_id): Path<String>,
) -> Response {
    let Ok(job_site_id) = job_site_id.parse::<JobSiteId>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid job-site ID")),
        )
            .into_response();
    };

    match handlers.queries.hours_for(job_site_id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// GET /api/planning/double-bookings
pub async fn get_double_bookings(State(handlers): State<PlanningHandlers>) -> Response {
    Json(handlers.queries.double_bookings().await).into_response()
}

/// GET /api/planning/snapshot - Raw loaded collections
pub async fn get_snapshot(State(handlers): State<PlanningHandlers>) -> Response {
    Json(handlers.queries.snapshot().await).into_response()
}

/// GET /api/planning/filter
pub async fn get_filter(State(handlers): State<PlanningHandlers>) -> Response {
    Json(handlers.queries.filter().await).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Commands
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/planning/selection - Focus, worker filter, detail, navigation
pub async fn update_selection(
    State(handlers): State<PlanningHandlers>,
    headers: HeaderMap,
    Json(cmd): Json<SelectionCommand>,
) -> Response {
    let metadata = handlers.metadata(&headers);
    match handlers.selection_handler.handle(cmd, metadata).await {
        Ok(filter) => Json(filter).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// POST /api/planning/drop - Create or move an assignment
pub async fn drop_on_slot(
    State(handlers): State<PlanningHandlers>,
    headers: HeaderMap,
    Json(req): Json<DropRequest>,
) -> Response {
    let metadata = handlers.metadata(&headers);
    let cmd = HandleDropCommand {
        payload: req.payload,
        target: req.target,
    };

    match handlers.drop_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let response = DropResponse::from(result);
            let status = match response {
                DropResponse::Created { .. } => StatusCode::CREATED,
                _ => StatusCode::OK,
            };
            (status, Json(response)).into_response()
        }
        Err(e) => handle_planning_error(e),
    }
}

/// DELETE /api/planning/interventions/:id
pub async fn delete_intervention(
    State(handlers): State<PlanningHandlers>,
    headers: HeaderMap,
    Path(intervention_id): Path<String>,
) -> Response {
    let Ok(intervention_id) = intervention_id.parse::<InterventionId>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid intervention ID")),
        )
            .into_response();
    };

    let metadata = handlers.metadata(&headers);
    match handlers
        .delete_handler
        .handle(DeleteInterventionCommand { intervention_id }, metadata)
        .await
    {
        Ok(outcome) => Json(DeleteResponse::from(outcome)).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// POST /api/planning/refresh - Reload everything from the store
pub async fn refresh(State(handlers): State<PlanningHandlers>, headers: HeaderMap) -> Response {
    let metadata = handlers.metadata(&headers);
    match handlers
        .refresh_handler
        .handle(RefreshScheduleCommand, metadata)
        .await
    {
        Ok(result) => Json(RefreshResponse::from(result)).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// POST /api/planning/voice-notes - Raw audio body sent to the assistant
pub async fn submit_voice_note(
    State(handlers): State<PlanningHandlers>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(voice_handler) = handlers.voice_handler.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(
                ErrorCode::UpstreamError,
                "Voice assistant is not configured",
            )),
        )
            .into_response();
    };

    let metadata = handlers.metadata(&headers);
    let cmd = SubmitVoiceNoteCommand {
        audio: body.to_vec(),
    };
    match voice_handler.handle(cmd, metadata).await {
        Ok(result) => Json(VoiceNoteResponse::from(result)).into_response(),
        Err(e) => handle_planning_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::InvalidTimeRange => StatusCode::BAD_REQUEST,
        ErrorCode::NoFocusedJobSite => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::RecordBusy | ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::JobSiteNotFound
        | ErrorCode::WorkerNotFound
        | ErrorCode::InterventionNotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::DatabaseError | ErrorCode::UpstreamError => StatusCode::BAD_GATEWAY,
        ErrorCode::ContextClosed => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_planning_error(error: PlanningError) -> Response {
    let code = error.code();
    (
        status_for(code),
        Json(ErrorResponse::new(code, error.to_string())),
    )
        .into_response()
}
