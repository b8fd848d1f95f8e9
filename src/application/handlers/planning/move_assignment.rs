//! MoveAssignmentHandler - Reschedules an intervention to another slot.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, InterventionId};
use crate::domain::planning::{
    EntityKind, Intervention, InterventionPatch, LocalChange, PlanningError, Slot,
};
use crate::ports::InterventionStore;

use super::{PlanningContext, RefreshScheduleCommand, RefreshScheduleHandler};

/// Command to move an intervention onto `target`.
#[derive(Debug, Clone)]
pub struct MoveAssignmentCommand {
    pub intervention_id: InterventionId,
    pub target: Slot,
}

#[derive(Debug, Clone)]
pub enum MoveAssignmentResult {
    /// Dropped on the slot it already occupies. Nothing was written.
    Unchanged,
    /// Saved. `refreshed` is false when the follow-up reload failed and the
    /// local copy is shown as is.
    Moved {
        intervention: Intervention,
        refreshed: bool,
    },
}

/// Handler for moving assignments.
///
/// Applies the new slot locally, persists it, then reloads the schedule so
/// server-side joins are current. Only one move per intervention runs at a
/// time.
pub struct MoveAssignmentHandler {
    interventions: Arc<dyn InterventionStore>,
    refresh: Arc<RefreshScheduleHandler>,
    context: Arc<PlanningContext>,
}

impl MoveAssignmentHandler {
    pub fn new(
        interventions: Arc<dyn InterventionStore>,
        refresh: Arc<RefreshScheduleHandler>,
        context: Arc<PlanningContext>,
    ) -> Self {
        Self {
            interventions,
            refresh,
            context,
        }
    }

    pub async fn handle(
        &self,
        cmd: MoveAssignmentCommand,
        metadata: CommandMetadata,
    ) -> Result<MoveAssignmentResult, PlanningError> {
        self.context.ensure_open()?;
        let _lock = self.context.lock_intervention(cmd.intervention_id)?;

        let current = self
            .context
            .state()
            .await
            .find_intervention(cmd.intervention_id)
            .cloned()
            .ok_or(PlanningError::NotFound(cmd.intervention_id))?;

        if cmd.target.same_slot_as(&current.start) {
            tracing::debug!(
                intervention_id = %cmd.intervention_id,
                slot = %cmd.target,
                "dropped on its own slot, nothing to do"
            );
            return Ok(MoveAssignmentResult::Unchanged);
        }

        let (start, end) = cmd.target.window();
        let patch = InterventionPatch::reschedule(start, end);
        let mut moved = current;
        patch.apply_to(&mut moved)?;
        let applied = self
            .context
            .apply_local(LocalChange::Update {
                id: cmd.intervention_id,
                patch: patch.clone(),
            })
            .await?;

        if let Err(err) = self
            .interventions
            .update(self.context.scope(), cmd.intervention_id, patch)
            .await
        {
            self.context.revert_local(applied).await;
            tracing::warn!(
                correlation_id = %metadata.correlation_id(),
                intervention_id = %cmd.intervention_id,
                error = %err,
                "move rejected by store, rolled back"
            );
            return Err(PlanningError::persistence(EntityKind::Intervention, &err));
        }

        let refreshed = match self
            .refresh
            .handle(RefreshScheduleCommand, metadata.clone())
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(
                    correlation_id = %metadata.correlation_id(),
                    intervention_id = %cmd.intervention_id,
                    error = %err,
                    "move saved but reload failed"
                );
                false
            }
        };

        // Deleted elsewhere before the reload: the move itself still succeeded
        let reloaded = self
            .context
            .state()
            .await
            .find_intervention(cmd.intervention_id)
            .cloned();
        let intervention = match reloaded {
            Some(intervention) => intervention,
            None => {
                tracing::debug!(
                    intervention_id = %cmd.intervention_id,
                    "moved intervention no longer in reloaded schedule"
                );
                moved
            }
        };

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            intervention_id = %cmd.intervention_id,
            slot = %cmd.target,
            "assignment moved"
        );

        Ok(MoveAssignmentResult::Moved {
            intervention,
            refreshed,
        })
    }
}
