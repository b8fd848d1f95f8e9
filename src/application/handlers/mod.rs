//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod planning;

pub use planning::{
    // Context
    PlanningContext,
    // Commands and handlers
    CreateAssignmentCommand, CreateAssignmentHandler, CreateAssignmentResult,
    DeleteInterventionCommand, DeleteInterventionHandler,
    HandleDropCommand, HandleDropHandler, HandleDropResult,
    MoveAssignmentCommand, MoveAssignmentHandler, MoveAssignmentResult,
    RefreshScheduleCommand, RefreshScheduleHandler, RefreshScheduleResult,
    SelectionCommand, UpdateSelectionHandler,
    SubmitVoiceNoteCommand, SubmitVoiceNoteHandler, SubmitVoiceNoteResult,
    // Queries
    PlanningQueries,
};
