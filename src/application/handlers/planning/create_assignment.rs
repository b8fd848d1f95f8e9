//! CreateAssignmentHandler - Books a worker on the focused job-site.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, InterventionId};
use crate::domain::planning::{
    EntityKind, Intervention, LocalChange, PlanningError, Slot, Worker,
};
use crate::ports::InterventionStore;

use super::PlanningContext;

/// Command to assign a worker to a half-day slot.
#[derive(Debug, Clone)]
pub struct CreateAssignmentCommand {
    pub worker: Worker,
    pub target: Slot,
}

/// Result of a successful assignment.
#[derive(Debug, Clone)]
pub struct CreateAssignmentResult {
    pub intervention: Intervention,
}

/// Handler for creating assignments.
///
/// The intervention is shown immediately and removed again if the store
/// rejects it.
pub struct CreateAssignmentHandler {
    interventions: Arc<dyn InterventionStore>,
    context: Arc<PlanningContext>,
}

impl CreateAssignmentHandler {
    pub fn new(interventions: Arc<dyn InterventionStore>, context: Arc<PlanningContext>) -> Self {
        Self {
            interventions,
            context,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateAssignmentCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateAssignmentResult, PlanningError> {
        self.context.ensure_open()?;

        // 1. A focused job-site is required
        let job_site_id = self
            .context
            .filter()
            .await
            .focused_job_site()
            .ok_or(PlanningError::NoFocusedJobSite)?;

        // 2. Build the intervention with display joins
        let (start, end) = cmd.target.window();
        let job_site = self
            .context
            .state()
            .await
            .find_job_site(job_site_id)
            .cloned();
        let intervention = Intervention::new(
            InterventionId::new(),
            self.context.scope().tenant_id(),
            job_site_id,
            cmd.worker.id,
            start,
            end,
        )?
        .with_joins(job_site, Some(cmd.worker.clone()));
        let _lock = self.context.lock_intervention(intervention.id)?;

        // 3. Show it before the store confirms
        let applied = self
            .context
            .apply_local(LocalChange::Insert(intervention.clone()))
            .await?;

        // 4. Persist, rolling back on failure
        if let Err(err) = self
            .interventions
            .insert(self.context.scope(), intervention.without_joins())
            .await
        {
            self.context.revert_local(applied).await;
            tracing::warn!(
                correlation_id = %metadata.correlation_id(),
                intervention_id = %intervention.id,
                error = %err,
                "assignment rejected by store, rolled back"
            );
            return Err(PlanningError::persistence(EntityKind::Intervention, &err));
        }

        // 5. A refresh that ran while the insert was pending may have dropped it
        match self
            .context
            .apply_local(LocalChange::Insert(intervention.clone()))
            .await
        {
            Ok(_) => tracing::debug!(
                intervention_id = %intervention.id,
                "confirmed intervention restored after concurrent refresh"
            ),
            Err(PlanningError::Duplicate(_)) | Err(PlanningError::ContextClosed) => {}
            Err(err) => tracing::warn!(
                intervention_id = %intervention.id,
                error = %err,
                "confirmed intervention could not be restored locally"
            ),
        }

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            intervention_id = %intervention.id,
            worker_id = %cmd.worker.id,
            job_site_id = %job_site_id,
            slot = %cmd.target,
            "assignment created"
        );

        Ok(CreateAssignmentResult { intervention })
    }
}
