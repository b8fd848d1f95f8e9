//! Worker store port.

use async_trait::async_trait;

use super::DeleteReport;
use crate::domain::foundation::{DomainError, TenantScope, WorkerId};
use crate::domain::planning::{Worker, WorkerPatch};

/// Tenant-scoped CRUD over workers ("collaborateurs").
///
/// Deleting a worker does not cascade to interventions referencing it.
#[async_trait]
pub trait WorkerStore: Send + Sync {
    async fn fetch_all(&self, scope: &TenantScope) -> Result<Vec<Worker>, DomainError>;

    async fn insert(&self, scope: &TenantScope, worker: Worker) -> Result<Worker, DomainError>;

    async fn update(
        &self,
        scope: &TenantScope,
        id: WorkerId,
        patch: WorkerPatch,
    ) -> Result<(), DomainError>;

    async fn delete(&self, scope: &TenantScope, id: WorkerId) -> Result<DeleteReport, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn WorkerStore) {}
    }
}
