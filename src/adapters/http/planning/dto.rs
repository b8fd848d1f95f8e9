//! HTTP DTOs for planning endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::handlers::planning::{
    HandleDropResult, MoveAssignmentResult, RefreshScheduleResult, SubmitVoiceNoteResult,
};
use crate::domain::foundation::ErrorCode;
use crate::domain::planning::{DeleteOutcome, DragPayload, Intervention, Slot};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A drag released over the calendar. `target` is absent when released
/// outside any slot.
#[derive(Debug, Clone, Deserialize)]
pub struct DropRequest {
    pub payload: DragPayload,
    #[serde(default)]
    pub target: Option<Slot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    /// Overrides the server's current date for the `is_today` flag.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropResponse {
    Ignored,
    Created { intervention: Intervention },
    Unchanged,
    Moved {
        intervention: Intervention,
        refreshed: bool,
    },
}

impl From<HandleDropResult> for DropResponse {
    fn from(result: HandleDropResult) -> Self {
        match result {
            HandleDropResult::Ignored => DropResponse::Ignored,
            HandleDropResult::Created(intervention) => DropResponse::Created { intervention },
            HandleDropResult::Moved(MoveAssignmentResult::Unchanged) => DropResponse::Unchanged,
            HandleDropResult::Moved(MoveAssignmentResult::Moved {
                intervention,
                refreshed,
            }) => DropResponse::Moved {
                intervention,
                refreshed,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub outcome: DeleteOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<DeleteOutcome> for DeleteResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            outcome,
            warning: outcome
                .is_warning()
                .then(|| "Intervention was already deleted".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub job_sites: usize,
    pub workers: usize,
    pub interventions: usize,
}

impl From<RefreshScheduleResult> for RefreshResponse {
    fn from(result: RefreshScheduleResult) -> Self {
        Self {
            job_sites: result.job_sites,
            workers: result.workers,
            interventions: result.interventions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceNoteResponse {
    pub reply: String,
    pub message_count: u32,
    pub refreshed: bool,
}

impl From<SubmitVoiceNoteResult> for VoiceNoteResponse {
    fn from(result: SubmitVoiceNoteResult) -> Self {
        Self {
            reply: result.reply,
            message_count: result.message_count,
            refreshed: result.refreshed,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }
}
