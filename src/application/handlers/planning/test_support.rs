//! Mock ports and fixtures shared by the planning handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Semaphore;

use super::PlanningContext;
use crate::domain::foundation::{
    ClientId, DomainError, InterventionId, JobSiteId, TenantId, TenantScope, WorkerId,
};
use crate::domain::planning::{
    slot_window, EntityKind, Intervention, InterventionPatch, JobSite, JobSitePatch, Period,
    PlanningFilter, ScheduleSnapshot, Worker, WorkerPatch,
};
use crate::domain::voice::VoiceNote;
use crate::ports::{
    DeleteReport, InterventionStore, JobSiteStore, VoiceAssistant, VoiceError, VoiceReply,
    WorkerStore,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct Fixture {
    pub tenant: TenantId,
    pub job_site: JobSite,
    pub other_job_site: JobSite,
    pub worker: Worker,
    pub other_worker: Worker,
}

impl Fixture {
    pub fn new() -> Self {
        let tenant = TenantId::new();
        let site = |description: &str| JobSite {
            id: JobSiteId::new(),
            tenant_id: tenant,
            client_id: ClientId::new(),
            description: description.to_string(),
            address: "7 Place Stanislas".to_string(),
            postal_code: "54000".to_string(),
            city: "Nancy".to_string(),
            start_date: date(2024, 3, 1),
            sold_hours: Some(10.0),
            created_at: None,
            client: None,
        };
        let worker = |first: &str| Worker {
            id: WorkerId::new(),
            tenant_id: tenant,
            last_name: "ROBERT".to_string(),
            first_name: first.to_string(),
            job_title: "Maçon".to_string(),
            photo_url: None,
            created_at: None,
        };
        Self {
            tenant,
            job_site: site("Réfection toiture"),
            other_job_site: site("Cuisine"),
            worker: worker("Alice"),
            other_worker: worker("Bruno"),
        }
    }

    pub fn scope(&self) -> TenantScope {
        TenantScope::new(self.tenant)
    }

    pub fn intervention(&self, day: NaiveDate, period: Period) -> Intervention {
        let (start, end) = slot_window(day, period);
        Intervention::new(
            InterventionId::new(),
            self.tenant,
            self.job_site.id,
            self.worker.id,
            start,
            end,
        )
        .unwrap()
    }

    pub fn snapshot(&self, interventions: Vec<Intervention>) -> ScheduleSnapshot {
        ScheduleSnapshot {
            job_sites: vec![self.job_site.clone(), self.other_job_site.clone()],
            workers: vec![self.worker.clone(), self.other_worker.clone()],
            interventions,
        }
    }

    pub fn context(&self, interventions: Vec<Intervention>) -> Arc<PlanningContext> {
        Arc::new(PlanningContext::with_snapshot(
            self.scope(),
            PlanningFilter::new(date(2024, 3, 1)),
            self.snapshot(interventions),
        ))
    }
}

/// Hand-written store mock implementing the three store ports.
#[derive(Default)]
pub struct MockStore {
    pub job_sites: Mutex<Vec<JobSite>>,
    pub workers: Mutex<Vec<Worker>>,
    pub interventions: Mutex<Vec<Intervention>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_insert: Mutex<Option<String>>,
    pub fail_update: Mutex<Option<String>>,
    pub fail_delete: Mutex<Option<String>>,
    pub fail_fetch: Mutex<Option<EntityKind>>,
    pub delete_affected: Mutex<Option<u64>>,
    pub insert_gate: Mutex<Option<Arc<Semaphore>>>,
    pub update_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: ScheduleSnapshot) -> Self {
        let store = Self::new();
        *store.job_sites.lock().unwrap() = snapshot.job_sites;
        *store.workers.lock().unwrap() = snapshot.workers;
        *store.interventions.lock().unwrap() = snapshot.interventions;
        store
    }

    pub fn failing_insert(self, message: &str) -> Self {
        *self.fail_insert.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn failing_update(self, message: &str) -> Self {
        *self.fail_update.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn failing_delete(self, message: &str) -> Self {
        *self.fail_delete.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn failing_fetch(self, entity: EntityKind) -> Self {
        *self.fail_fetch.lock().unwrap() = Some(entity);
        self
    }

    pub fn deleting_zero_rows(self) -> Self {
        *self.delete_affected.lock().unwrap() = Some(0);
        self
    }

    /// Holds every insert until a permit is added to the returned semaphore.
    pub fn gate_inserts(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.insert_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Holds every update until a permit is added to the returned semaphore.
    pub fn gate_updates(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.update_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !c.ends_with("fetch_all"))
            .count()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn check_fetch(&self, entity: EntityKind) -> Result<(), DomainError> {
        if *self.fail_fetch.lock().unwrap() == Some(entity) {
            return Err(DomainError::database(format!("{} fetch failed", entity)));
        }
        Ok(())
    }
}

#[async_trait]
impl JobSiteStore for MockStore {
    async fn fetch_all(&self, _scope: &TenantScope) -> Result<Vec<JobSite>, DomainError> {
        self.record("job_sites.fetch_all");
        self.check_fetch(EntityKind::JobSite)?;
        Ok(self.job_sites.lock().unwrap().clone())
    }

    async fn insert(&self, _scope: &TenantScope, job_site: JobSite) -> Result<JobSite, DomainError> {
        self.record("job_sites.insert");
        self.job_sites.lock().unwrap().push(job_site.clone());
        Ok(job_site)
    }

    async fn update(
        &self,
        _scope: &TenantScope,
        _id: JobSiteId,
        _patch: JobSitePatch,
    ) -> Result<(), DomainError> {
        self.record("job_sites.update");
        Ok(())
    }

    async fn delete(&self, _scope: &TenantScope, _id: JobSiteId) -> Result<DeleteReport, DomainError> {
        self.record("job_sites.delete");
        Ok(DeleteReport::new(1))
    }
}

#[async_trait]
impl WorkerStore for MockStore {
    async fn fetch_all(&self, _scope: &TenantScope) -> Result<Vec<Worker>, DomainError> {
        self.record("workers.fetch_all");
        self.check_fetch(EntityKind::Worker)?;
        Ok(self.workers.lock().unwrap().clone())
    }

    async fn insert(&self, _scope: &TenantScope, worker: Worker) -> Result<Worker, DomainError> {
        self.record("workers.insert");
        self.workers.lock().unwrap().push(worker.clone());
        Ok(worker)
    }

    async fn update(
        &self,
        _scope: &TenantScope,
        _id: WorkerId,
        _patch: WorkerPatch,
    ) -> Result<(), DomainError> {
        self.record("workers.update");
        Ok(())
    }

    async fn delete(&self, _scope: &TenantScope, _id: WorkerId) -> Result<DeleteReport, DomainError> {
        self.record("workers.delete");
        Ok(DeleteReport::new(1))
    }
}

#[async_trait]
impl InterventionStore for MockStore {
    async fn fetch_all(&self, _scope: &TenantScope) -> Result<Vec<Intervention>, DomainError> {
        self.record("interventions.fetch_all");
        self.check_fetch(EntityKind::Intervention)?;
        Ok(self.interventions.lock().unwrap().clone())
    }

    async fn insert(
        &self,
        _scope: &TenantScope,
        intervention: Intervention,
    ) -> Result<Intervention, DomainError> {
        self.record("interventions.insert");
        let gate = self.insert_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.unwrap();
        }
        if let Some(message) = self.fail_insert.lock().unwrap().clone() {
            return Err(DomainError::database(message));
        }
        self.interventions.lock().unwrap().push(intervention.clone());
        Ok(intervention)
    }

    async fn update(
        &self,
        _scope: &TenantScope,
        id: InterventionId,
        patch: InterventionPatch,
    ) -> Result<(), DomainError> {
        self.record("interventions.update");
        let gate = self.update_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.unwrap();
        }
        if let Some(message) = self.fail_update.lock().unwrap().clone() {
            return Err(DomainError::database(message));
        }
        let mut rows = self.interventions.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|i| i.id == id) {
            patch
                .apply_to(row)
                .map_err(|e| DomainError::new(e.code(), e.to_string()))?;
        }
        Ok(())
    }

    async fn delete(
        &self,
        _scope: &TenantScope,
        id: InterventionId,
    ) -> Result<DeleteReport, DomainError> {
        self.record("interventions.delete");
        if let Some(message) = self.fail_delete.lock().unwrap().clone() {
            return Err(DomainError::database(message));
        }
        let mut rows = self.interventions.lock().unwrap();
        let before = rows.len();
        rows.retain(|i| i.id != id);
        let affected = self
            .delete_affected
            .lock()
            .unwrap()
            .unwrap_or((before - rows.len()) as u64);
        Ok(DeleteReport::new(affected))
    }
}

/// Voice assistant mock returning a canned result.
pub struct MockVoiceAssistant {
    pub result: Result<VoiceReply, VoiceError>,
    pub submitted: Mutex<Vec<VoiceNote>>,
}

impl MockVoiceAssistant {
    pub fn replying(body: &str) -> Self {
        Self {
            result: Ok(VoiceReply {
                status: 200,
                body: body.to_string(),
            }),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: VoiceError) -> Self {
        Self {
            result: Err(error),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VoiceAssistant for MockVoiceAssistant {
    async fn submit(&self, note: &VoiceNote) -> Result<VoiceReply, VoiceError> {
        self.submitted.lock().unwrap().push(note.clone());
        self.result.clone()
    }
}
