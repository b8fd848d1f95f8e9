//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers mutate the shared planning context; queries only read it.

pub mod handlers;

pub use handlers::planning::{
    CreateAssignmentHandler, DeleteInterventionHandler, HandleDropHandler, MoveAssignmentHandler,
    PlanningContext, PlanningQueries, RefreshScheduleHandler, SubmitVoiceNoteHandler,
    UpdateSelectionHandler,
};
