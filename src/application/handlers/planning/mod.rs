//! Planning command and query handlers.
//!
//! All handlers share one [`PlanningContext`] per session and talk to the
//! record store and the voice assistant only through ports.

mod context;

// Command handlers
mod create_assignment;
mod delete_intervention;
mod handle_drop;
mod move_assignment;
mod refresh_schedule;
mod submit_voice_note;
mod update_selection;

// Query handlers
mod queries;

#[cfg(test)]
mod test_support;

pub use context::{InFlightGuard, InFlightRegistry, PlanningContext};

pub use create_assignment::{
    CreateAssignmentCommand, CreateAssignmentHandler, CreateAssignmentResult,
};
pub use delete_intervention::{DeleteInterventionCommand, DeleteInterventionHandler};
pub use handle_drop::{HandleDropCommand, HandleDropHandler, HandleDropResult};
pub use move_assignment::{MoveAssignmentCommand, MoveAssignmentHandler, MoveAssignmentResult};
pub use refresh_schedule::{
    RefreshScheduleCommand, RefreshScheduleHandler, RefreshScheduleResult,
};
pub use submit_voice_note::{
    SubmitVoiceNoteCommand, SubmitVoiceNoteHandler, SubmitVoiceNoteResult,
};
pub use update_selection::{SelectionCommand, UpdateSelectionHandler};

pub use queries::PlanningQueries;
