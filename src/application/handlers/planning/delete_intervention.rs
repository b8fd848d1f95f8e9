//! DeleteInterventionHandler - Removes an intervention.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, InterventionId};
use crate::domain::planning::{DeleteOutcome, EntityKind, PlanningError};
use crate::ports::InterventionStore;

use super::PlanningContext;

#[derive(Debug, Clone)]
pub struct DeleteInterventionCommand {
    pub intervention_id: InterventionId,
}

/// Handler for deleting interventions.
///
/// The store is called first; local state only changes once the delete went
/// through. A delete that matched no row is reported as
/// [`DeleteOutcome::AlreadyDeleted`] and still clears the local copy.
pub struct DeleteInterventionHandler {
    interventions: Arc<dyn InterventionStore>,
    context: Arc<PlanningContext>,
}

impl DeleteInterventionHandler {
    pub fn new(interventions: Arc<dyn InterventionStore>, context: Arc<PlanningContext>) -> Self {
        Self {
            interventions,
            context,
        }
    }

    pub async fn handle(
        &self,
        cmd: DeleteInterventionCommand,
        metadata: CommandMetadata,
    ) -> Result<DeleteOutcome, PlanningError> {
        self.context.ensure_open()?;
        let id = cmd.intervention_id;
        let _lock = self.context.lock_intervention(id)?;

        let report = self
            .interventions
            .delete(self.context.scope(), id)
            .await
            .map_err(|err| {
                tracing::warn!(
                    correlation_id = %metadata.correlation_id(),
                    intervention_id = %id,
                    error = %err,
                    "delete rejected by store"
                );
                PlanningError::persistence(EntityKind::Intervention, &err)
            })?;

        self.context.remove_local(id).await;
        self.context.update_filter(|filter| filter.close_detail(id)).await;

        if report.is_noop() {
            tracing::warn!(
                correlation_id = %metadata.correlation_id(),
                intervention_id = %id,
                "delete matched no row"
            );
            return Ok(DeleteOutcome::AlreadyDeleted);
        }

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            intervention_id = %id,
            "intervention deleted"
        );
        Ok(DeleteOutcome::Deleted)
    }
}
