//! In-memory record store.
//!
//! Implements the three store ports over shared tables, joining intervention
//! reads the way the hosted store does. Used by the binary for demo mode and
//! by tests, which can inject failures and count calls per operation.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    ClientId, DomainError, ErrorCode, InterventionId, JobSiteId, TenantId, TenantScope, WorkerId,
};
use crate::domain::planning::{
    Client, EntityKind, Intervention, InterventionPatch, JobSite, JobSitePatch, ScheduleSnapshot,
    Worker, WorkerPatch,
};
use crate::ports::{DeleteReport, InterventionStore, JobSiteStore, WorkerStore};

/// Store call kinds, used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    FetchAll,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct Tables {
    clients: Vec<Client>,
    job_sites: Vec<JobSite>,
    workers: Vec<Worker>,
    interventions: Vec<Intervention>,
}

type CallKey = (EntityKind, StoreOperation);

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
    failures: Mutex<HashMap<CallKey, String>>,
    calls: Mutex<HashMap<CallKey, usize>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with clients and a snapshot. Joins are stripped; reads
    /// rebuild them from the tables.
    pub fn seeded(clients: Vec<Client>, snapshot: ScheduleSnapshot) -> Self {
        let tables = Tables {
            clients,
            job_sites: snapshot
                .job_sites
                .into_iter()
                .map(|site| JobSite { client: None, ..site })
                .collect(),
            workers: snapshot.workers,
            interventions: snapshot
                .interventions
                .iter()
                .map(Intervention::without_joins)
                .collect(),
        };
        Self {
            tables: RwLock::new(tables),
            ..Self::default()
        }
    }

    // === Test Helpers ===

    /// Makes every later call of `operation` on `entity` fail with `message`.
    pub fn fail(&self, entity: EntityKind, operation: StoreOperation, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((entity, operation), message.into());
    }

    pub fn fail_inserts(&self, message: impl Into<String>) {
        let message = message.into();
        for entity in [EntityKind::JobSite, EntityKind::Worker, EntityKind::Intervention] {
            self.fail(entity, StoreOperation::Insert, message.clone());
        }
    }

    pub fn fail_updates(&self, message: impl Into<String>) {
        let message = message.into();
        for entity in [EntityKind::JobSite, EntityKind::Worker, EntityKind::Intervention] {
            self.fail(entity, StoreOperation::Update, message.clone());
        }
    }

    pub fn fail_deletes(&self, message: impl Into<String>) {
        let message = message.into();
        for entity in [EntityKind::JobSite, EntityKind::Worker, EntityKind::Intervention] {
            self.fail(entity, StoreOperation::Delete, message.clone());
        }
    }

    pub fn clear_failures(&self) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of calls made to `operation` on `entity`, failed ones included.
    pub fn call_count(&self, entity: EntityKind, operation: StoreOperation) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(entity, operation))
            .copied()
            .unwrap_or(0)
    }

    /// Insert, update and delete calls across all entities.
    pub fn mutation_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|((_, op), _)| *op != StoreOperation::FetchAll)
            .map(|(_, count)| count)
            .sum()
    }

    /// Removes an intervention row behind the engine's back, as another
    /// session or the voice workflow would.
    pub async fn remove_intervention_row(&self, id: InterventionId) -> Option<Intervention> {
        let mut tables = self.tables.write().await;
        let index = tables.interventions.iter().position(|i| i.id == id)?;
        Some(tables.interventions.remove(index))
    }

    /// Adds an intervention row behind the engine's back.
    pub async fn put_intervention_row(&self, intervention: Intervention) {
        self.tables
            .write()
            .await
            .interventions
            .push(intervention.without_joins());
    }

    pub async fn insert_client(&self, client: Client) {
        self.tables.write().await.clients.push(client);
    }

    pub async fn find_client(&self, id: ClientId) -> Option<Client> {
        self.tables
            .read()
            .await
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    // === Internals ===

    fn record_call(&self, entity: EntityKind, operation: StoreOperation) -> Result<(), DomainError> {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((entity, operation))
            .or_insert(0) += 1;

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(entity, operation))
            .cloned();
        match failure {
            Some(message) => {
                tracing::debug!(%entity, ?operation, %message, "injected store failure");
                Err(DomainError::database(message))
            }
            None => Ok(()),
        }
    }

    fn check_tenant(scope: &TenantScope, record_tenant: TenantId) -> Result<(), DomainError> {
        if scope.owns(record_tenant) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "Record belongs to another tenant",
            ))
        }
    }
}

fn joined_job_site(tables: &Tables, site: &JobSite) -> JobSite {
    JobSite {
        client: tables.clients.iter().find(|c| c.id == site.client_id).cloned(),
        ..site.clone()
    }
}

fn joined_intervention(tables: &Tables, intervention: &Intervention) -> Intervention {
    let job_site = tables
        .job_sites
        .iter()
        .find(|s| s.id == intervention.job_site_id)
        .map(|s| joined_job_site(tables, s));
    let worker = tables
        .workers
        .iter()
        .find(|w| w.id == intervention.worker_id)
        .cloned();
    intervention.clone().with_joins(job_site, worker)
}

fn duplicate(entity: EntityKind, id: impl std::fmt::Display) -> DomainError {
    DomainError::database(format!("duplicate key value violates unique constraint on {}", entity))
        .with_detail("id", id.to_string())
}

#[async_trait]
impl JobSiteStore for InMemoryRecordStore {
    async fn fetch_all(&self, scope: &TenantScope) -> Result<Vec<JobSite>, DomainError> {
        self.record_call(EntityKind::JobSite, StoreOperation::FetchAll)?;
        let tables = self.tables.read().await;
        Ok(tables
            .job_sites
            .iter()
            .filter(|s| scope.owns(s.tenant_id))
            .map(|s| joined_job_site(&tables, s))
            .collect())
    }

    async fn insert(&self, scope: &TenantScope, job_site: JobSite) -> Result<JobSite, DomainError> {
        self.record_call(EntityKind::JobSite, StoreOperation::Insert)?;
        Self::check_tenant(scope, job_site.tenant_id)?;
        let mut tables = self.tables.write().await;
        if tables.job_sites.iter().any(|s| s.id == job_site.id) {
            return Err(duplicate(EntityKind::JobSite, job_site.id));
        }
        let row = JobSite {
            client: None,
            ..job_site
        };
        let joined = joined_job_site(&tables, &row);
        tables.job_sites.push(row);
        tracing::debug!(job_site_id = %joined.id, "job-site inserted");
        Ok(joined)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: JobSiteId,
        patch: JobSitePatch,
    ) -> Result<(), DomainError> {
        self.record_call(EntityKind::JobSite, StoreOperation::Update)?;
        let mut tables = self.tables.write().await;
        let site = tables
            .job_sites
            .iter_mut()
            .find(|s| s.id == id && scope.owns(s.tenant_id))
            .ok_or_else(|| {
                DomainError::new(ErrorCode::JobSiteNotFound, format!("Job-site not found: {}", id))
            })?;
        patch.apply_to(site);
        Ok(())
    }

    async fn delete(&self, scope: &TenantScope, id: JobSiteId) -> Result<DeleteReport, DomainError> {
        self.record_call(EntityKind::JobSite, StoreOperation::Delete)?;
        let mut tables = self.tables.write().await;
        let before = tables.job_sites.len();
        tables
            .job_sites
            .retain(|s| !(s.id == id && scope.owns(s.tenant_id)));
        Ok(DeleteReport::new((before - tables.job_sites.len()) as u64))
    }
}

#[async_trait]
impl WorkerStore for InMemoryRecordStore {
    async fn fetch_all(&self, scope: &TenantScope) -> Result<Vec<Worker>, DomainError> {
        self.record_call(EntityKind::Worker, StoreOperation::FetchAll)?;
        let tables = self.tables.read().await;
        Ok(tables
            .workers
            .iter()
            .filter(|w| scope.owns(w.tenant_id))
            .cloned()
            .collect())
    }

    async fn insert(&self, scope: &TenantScope, worker: Worker) -> Result<Worker, DomainError> {
        self.record_call(EntityKind::Worker, StoreOperation::Insert)?;
        Self::check_tenant(scope, worker.tenant_id)?;
        let mut tables = self.tables.write().await;
        if tables.workers.iter().any(|w| w.id == worker.id) {
            return Err(duplicate(EntityKind::Worker, worker.id));
        }
        tables.workers.push(worker.clone());
        tracing::debug!(worker_id = %worker.id, "worker inserted");
        Ok(worker)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: WorkerId,
        patch: WorkerPatch,
    ) -> Result<(), DomainError> {
        self.record_call(EntityKind::Worker, StoreOperation::Update)?;
        let mut tables = self.tables.write().await;
        let worker = tables
            .workers
            .iter_mut()
            .find(|w| w.id == id && scope.owns(w.tenant_id))
            .ok_or_else(|| {
                DomainError::new(ErrorCode::WorkerNotFound, format!("Worker not found: {}", id))
            })?;
        patch.apply_to(worker);
        Ok(())
    }

    async fn delete(&self, scope: &TenantScope, id: WorkerId) -> Result<DeleteReport, DomainError> {
        self.record_call(EntityKind::Worker, StoreOperation::Delete)?;
        let mut tables = self.tables.write().await;
        let before = tables.workers.len();
        tables
            .workers
            .retain(|w| !(w.id == id && scope.owns(w.tenant_id)));
        Ok(DeleteReport::new((before - tables.workers.len()) as u64))
    }
}

#[async_trait]
impl InterventionStore for InMemoryRecordStore {
    async fn fetch_all(&self, scope: &TenantScope) -> Result<Vec<Intervention>, DomainError> {
        self.record_call(EntityKind::Intervention, StoreOperation::FetchAll)?;
        let tables = self.tables.read().await;
        Ok(tables
            .interventions
            .iter()
            .filter(|i| scope.owns(i.tenant_id))
            .map(|i| joined_intervention(&tables, i))
            .collect())
    }

    async fn insert(
        &self,
        scope: &TenantScope,
        intervention: Intervention,
    ) -> Result<Intervention, DomainError> {
        self.record_call(EntityKind::Intervention, StoreOperation::Insert)?;
        Self::check_tenant(scope, intervention.tenant_id)?;
        let mut tables = self.tables.write().await;
        if tables.interventions.iter().any(|i| i.id == intervention.id) {
            return Err(duplicate(EntityKind::Intervention, intervention.id));
        }
        let row = intervention.without_joins();
        let joined = joined_intervention(&tables, &row);
        tables.interventions.push(row);
        tracing::debug!(intervention_id = %joined.id, "intervention inserted");
        Ok(joined)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: InterventionId,
        patch: InterventionPatch,
    ) -> Result<(), DomainError> {
        self.record_call(EntityKind::Intervention, StoreOperation::Update)?;
        let mut tables = self.tables.write().await;
        let row = tables
            .interventions
            .iter_mut()
            .find(|i| i.id == id && scope.owns(i.tenant_id))
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::InterventionNotFound,
                    format!("Intervention not found: {}", id),
                )
            })?;
        patch
            .apply_to(row)
            .map_err(|e| DomainError::new(e.code(), e.to_string()))
    }

    async fn delete(
        &self,
        scope: &TenantScope,
        id: InterventionId,
    ) -> Result<DeleteReport, DomainError> {
        self.record_call(EntityKind::Intervention, StoreOperation::Delete)?;
        let mut tables = self.tables.write().await;
        let before = tables.interventions.len();
        tables
            .interventions
            .retain(|i| !(i.id == id && scope.owns(i.tenant_id)));
        let affected = (before - tables.interventions.len()) as u64;
        tracing::debug!(intervention_id = %id, affected, "intervention delete");
        Ok(DeleteReport::new(affected))
    }
}
