//! HandleDropHandler - Dispatches a calendar drop to create or move.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::planning::{DragPayload, DropTarget, Intervention, PlanningError};

use super::{
    CreateAssignmentCommand, CreateAssignmentHandler, MoveAssignmentCommand,
    MoveAssignmentHandler, MoveAssignmentResult,
};

#[derive(Debug, Clone)]
pub struct HandleDropCommand {
    pub payload: DragPayload,
    pub target: DropTarget,
}

#[derive(Debug, Clone)]
pub enum HandleDropResult {
    /// Released outside any slot.
    Ignored,
    Created(Intervention),
    Moved(MoveAssignmentResult),
}

pub struct HandleDropHandler {
    create: Arc<CreateAssignmentHandler>,
    move_assignment: Arc<MoveAssignmentHandler>,
}

impl HandleDropHandler {
    pub fn new(
        create: Arc<CreateAssignmentHandler>,
        move_assignment: Arc<MoveAssignmentHandler>,
    ) -> Self {
        Self {
            create,
            move_assignment,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleDropCommand,
        metadata: CommandMetadata,
    ) -> Result<HandleDropResult, PlanningError> {
        let Some(target) = cmd.target else {
            tracing::debug!("drop outside any slot ignored");
            return Ok(HandleDropResult::Ignored);
        };

        match cmd.payload {
            DragPayload::NewAssignment(worker) => {
                let result = self
                    .create
                    .handle(CreateAssignmentCommand { worker, target }, metadata)
                    .await?;
                Ok(HandleDropResult::Created(result.intervention))
            }
            DragPayload::RescheduleAssignment(intervention) => {
                let result = self
                    .move_assignment
                    .handle(
                        MoveAssignmentCommand {
                            intervention_id: intervention.id,
                            target,
                        },
                        metadata,
                    )
                    .await?;
                Ok(HandleDropResult::Moved(result))
            }
        }
    }
}
