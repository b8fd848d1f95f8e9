//! Planning-specific error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::slot::WallClock;
use crate::domain::foundation::{DomainError, ErrorCode, InterventionId, JobSiteId};

/// Which store collection a failure relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    JobSite,
    Worker,
    Intervention,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::JobSite => "job-site",
            EntityKind::Worker => "worker",
            EntityKind::Intervention => "intervention",
        };
        write!(f, "{}", s)
    }
}

/// Result of a delete that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    /// The store reported zero affected rows; the record was already gone.
    AlreadyDeleted,
}

impl DeleteOutcome {
    pub fn is_warning(&self) -> bool {
        matches!(self, DeleteOutcome::AlreadyDeleted)
    }
}

/// Errors surfaced by the assignment engine and the planning context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    #[error("Select a job-site before assigning a worker")]
    NoFocusedJobSite,

    #[error("Failed to save {entity}: {message}")]
    PersistenceFailed { entity: EntityKind, message: String },

    #[error("Intervention {intervention_id} references unknown {entity} {reference}")]
    StaleJoinReference {
        intervention_id: InterventionId,
        entity: EntityKind,
        reference: String,
    },

    #[error("Intervention {0} already has an operation in progress")]
    RecordBusy(InterventionId),

    #[error("Intervention not found: {0}")]
    NotFound(InterventionId),

    #[error("Intervention already present: {0}")]
    Duplicate(InterventionId),

    #[error("Job-site not found: {0}")]
    UnknownJobSite(JobSiteId),

    #[error("End {end} must be after start {start}")]
    InvalidTimeRange { start: WallClock, end: WallClock },

    #[error("Voice assistant error: {0}")]
    VoiceFailed(String),

    #[error("Planning context is closed")]
    ContextClosed,
}

impl PlanningError {
    /// Wraps a port failure for `entity`, keeping the store message verbatim.
    pub fn persistence(entity: EntityKind, err: &DomainError) -> Self {
        PlanningError::PersistenceFailed {
            entity,
            message: err.message.clone(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PlanningError::NoFocusedJobSite => ErrorCode::NoFocusedJobSite,
            PlanningError::PersistenceFailed { .. } => ErrorCode::DatabaseError,
            PlanningError::StaleJoinReference { .. } => ErrorCode::InternalError,
            PlanningError::RecordBusy(_) => ErrorCode::RecordBusy,
            PlanningError::NotFound(_) => ErrorCode::InterventionNotFound,
            PlanningError::Duplicate(_) => ErrorCode::Conflict,
            PlanningError::UnknownJobSite(_) => ErrorCode::JobSiteNotFound,
            PlanningError::InvalidTimeRange { .. } => ErrorCode::InvalidTimeRange,
            PlanningError::VoiceFailed(_) => ErrorCode::UpstreamError,
            PlanningError::ContextClosed => ErrorCode::ContextClosed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_keeps_store_message_verbatim() {
        let err = PlanningError::persistence(
            EntityKind::Intervention,
            &DomainError::database("duplicate key value"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to save intervention: duplicate key value"
        );
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn codes_map_to_http_relevant_categories() {
        let id = InterventionId::new();
        assert_eq!(PlanningError::RecordBusy(id).code(), ErrorCode::RecordBusy);
        assert_eq!(PlanningError::NotFound(id).code(), ErrorCode::InterventionNotFound);
        assert_eq!(
            PlanningError::NoFocusedJobSite.code(),
            ErrorCode::NoFocusedJobSite
        );
    }

    #[test]
    fn only_already_deleted_is_a_warning() {
        assert!(DeleteOutcome::AlreadyDeleted.is_warning());
        assert!(!DeleteOutcome::Deleted.is_warning());
    }
}
