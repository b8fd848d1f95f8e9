//! RefreshScheduleHandler - Reloads the three collections from the store.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::planning::{EntityKind, PlanningError, ScheduleSnapshot};
use crate::ports::{InterventionStore, JobSiteStore, WorkerStore};

use super::PlanningContext;

/// Command to reload the schedule.
#[derive(Debug, Clone, Default)]
pub struct RefreshScheduleCommand;

/// Sizes of the reloaded collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshScheduleResult {
    pub job_sites: usize,
    pub workers: usize,
    pub interventions: usize,
}

/// Fetches job-sites, workers and interventions concurrently and replaces
/// the context's state with the result.
///
/// The three reads are independent requests, so the collections may be
/// slightly out of step with each other. Any failed read leaves the state
/// untouched.
pub struct RefreshScheduleHandler {
    job_sites: Arc<dyn JobSiteStore>,
    workers: Arc<dyn WorkerStore>,
    interventions: Arc<dyn InterventionStore>,
    context: Arc<PlanningContext>,
}

impl RefreshScheduleHandler {
    pub fn new(
        job_sites: Arc<dyn JobSiteStore>,
        workers: Arc<dyn WorkerStore>,
        interventions: Arc<dyn InterventionStore>,
        context: Arc<PlanningContext>,
    ) -> Self {
        Self {
            job_sites,
            workers,
            interventions,
            context,
        }
    }

    pub async fn handle(
        &self,
        _cmd: RefreshScheduleCommand,
        metadata: CommandMetadata,
    ) -> Result<RefreshScheduleResult, PlanningError> {
        self.context.ensure_open()?;
        let scope = self.context.scope();

        let (job_sites, workers, interventions) = tokio::try_join!(
            async {
                self.job_sites
                    .fetch_all(scope)
                    .await
                    .map_err(|e| PlanningError::persistence(EntityKind::JobSite, &e))
            },
            async {
                self.workers
                    .fetch_all(scope)
                    .await
                    .map_err(|e| PlanningError::persistence(EntityKind::Worker, &e))
            },
            async {
                self.interventions
                    .fetch_all(scope)
                    .await
                    .map_err(|e| PlanningError::persistence(EntityKind::Intervention, &e))
            },
        )
        .map_err(|err| {
            tracing::warn!(
                correlation_id = %metadata.correlation_id(),
                error = %err,
                "schedule refresh failed"
            );
            err
        })?;

        let result = RefreshScheduleResult {
            job_sites: job_sites.len(),
            workers: workers.len(),
            interventions: interventions.len(),
        };

        self.context
            .replace_state(ScheduleSnapshot {
                job_sites,
                workers,
                interventions,
            })
            .await?;

        tracing::debug!(
            correlation_id = %metadata.correlation_id(),
            job_sites = result.job_sites,
            workers = result.workers,
            interventions = result.interventions,
            "schedule refreshed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::planning::test_support::{date, Fixture, MockStore};
    use crate::domain::planning::Period;

    fn handler(store: Arc<MockStore>, context: Arc<PlanningContext>) -> RefreshScheduleHandler {
        RefreshScheduleHandler::new(store.clone(), store.clone(), store, context)
    }

    #[tokio::test]
    async fn replaces_state_with_store_contents() {
        let f = Fixture::new();
        let stored = f.intervention(date(2024, 3, 4), Period::Am);
        let store = Arc::new(MockStore::with_snapshot(f.snapshot(vec![stored.clone()])));
        let context = f.context(vec![]);

        let result = handler(store.clone(), context.clone())
            .handle(RefreshScheduleCommand, CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(result.interventions, 1);
        assert_eq!(result.workers, 2);
        assert!(context.state().await.find_intervention(stored.id).is_some());
        assert_eq!(store.calls().len(), 3);
    }

    #[tokio::test]
    async fn failed_read_leaves_state_untouched() {
        let f = Fixture::new();
        let local = f.intervention(date(2024, 3, 4), Period::Am);
        let store = Arc::new(
            MockStore::with_snapshot(f.snapshot(vec![])).failing_fetch(EntityKind::Worker),
        );
        let context = f.context(vec![local.clone()]);

        let err = handler(store, context.clone())
            .handle(RefreshScheduleCommand, CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PlanningError::PersistenceFailed {
                entity: EntityKind::Worker,
                ..
            }
        ));
        assert!(context.state().await.find_intervention(local.id).is_some());
    }

    #[tokio::test]
    async fn closed_context_is_not_refreshed() {
        let f = Fixture::new();
        let store = Arc::new(MockStore::with_snapshot(f.snapshot(vec![])));
        let context = f.context(vec![]);
        context.close();

        let err = handler(store.clone(), context)
            .handle(RefreshScheduleCommand, CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err, PlanningError::ContextClosed);
        assert!(store.calls().is_empty());
    }
}
