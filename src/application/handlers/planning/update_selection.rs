//! UpdateSelectionHandler - Focus, worker filter, detail view and navigation.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::foundation::{CommandMetadata, InterventionId, JobSiteId, WorkerId};
use crate::domain::planning::{PlanningError, PlanningFilter};

use super::PlanningContext;

/// One user interaction with the filter panel or the calendar header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SelectionCommand {
    Focus { job_site_id: JobSiteId },
    ClearFocus,
    SetShowAll { show_all: bool },
    ToggleWorker { worker_id: WorkerId },
    ClearWorkerFilter,
    OpenDetail { intervention_id: InterventionId },
    CloseDetail { intervention_id: InterventionId },
    GoTo { date: NaiveDate },
    Today,
    NextMonth,
    PreviousMonth,
    NextDay,
    PreviousDay,
}

/// Applies selection commands to the context's filter.
///
/// Ids are checked against the loaded state so the filter never points at
/// something the views cannot show.
pub struct UpdateSelectionHandler {
    context: Arc<PlanningContext>,
}

impl UpdateSelectionHandler {
    pub fn new(context: Arc<PlanningContext>) -> Self {
        Self { context }
    }

    pub async fn handle(
        &self,
        cmd: SelectionCommand,
        metadata: CommandMetadata,
    ) -> Result<PlanningFilter, PlanningError> {
        self.context.ensure_open()?;

        match &cmd {
            SelectionCommand::Focus { job_site_id } => {
                if self.context.state().await.find_job_site(*job_site_id).is_none() {
                    return Err(PlanningError::UnknownJobSite(*job_site_id));
                }
            }
            SelectionCommand::OpenDetail { intervention_id } => {
                if self
                    .context
                    .state()
                    .await
                    .find_intervention(*intervention_id)
                    .is_none()
                {
                    return Err(PlanningError::NotFound(*intervention_id));
                }
            }
            _ => {}
        }

        let filter = self
            .context
            .update_filter(|filter| match cmd.clone() {
                SelectionCommand::Focus { job_site_id } => filter.focus(job_site_id),
                SelectionCommand::ClearFocus => filter.clear_focus(),
                SelectionCommand::SetShowAll { show_all } => filter.set_show_all(show_all),
                SelectionCommand::ToggleWorker { worker_id } => {
                    filter.toggle_worker(worker_id);
                }
                SelectionCommand::ClearWorkerFilter => filter.clear_worker_filter(),
                SelectionCommand::OpenDetail { intervention_id } => {
                    filter.open_detail(intervention_id)
                }
                SelectionCommand::CloseDetail { intervention_id } => {
                    filter.close_detail(intervention_id)
                }
                SelectionCommand::GoTo { date } => filter.go_to(date),
                SelectionCommand::Today => filter.today(),
                SelectionCommand::NextMonth => filter.next_month(),
                SelectionCommand::PreviousMonth => filter.previous_month(),
                SelectionCommand::NextDay => filter.next_day(),
                SelectionCommand::PreviousDay => filter.previous_day(),
            })
            .await;

        tracing::debug!(
            correlation_id = %metadata.correlation_id(),
            command = ?cmd,
            anchor = %filter.anchor(),
            "selection updated"
        );

        Ok(filter)
    }
}
