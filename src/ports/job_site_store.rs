//! Job-site store port.
//!
//! Tenant-scoped CRUD over job-sites ("chantiers"). Rows of another tenant
//! are invisible: lookups miss and deletes affect zero rows.

use async_trait::async_trait;

use super::DeleteReport;
use crate::domain::foundation::{DomainError, JobSiteId, TenantScope};
use crate::domain::planning::{JobSite, JobSitePatch};

#[async_trait]
pub trait JobSiteStore: Send + Sync {
    /// All job-sites of the tenant, joined with their client, in store order.
    async fn fetch_all(&self, scope: &TenantScope) -> Result<Vec<JobSite>, DomainError>;

    /// Inserts a job-site whose id was chosen by the caller.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on duplicate id or persistence failure
    async fn insert(&self, scope: &TenantScope, job_site: JobSite) -> Result<JobSite, DomainError>;

    /// # Errors
    ///
    /// - `JobSiteNotFound` if no row of the tenant has this id
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        scope: &TenantScope,
        id: JobSiteId,
        patch: JobSitePatch,
    ) -> Result<(), DomainError>;

    async fn delete(&self, scope: &TenantScope, id: JobSiteId) -> Result<DeleteReport, DomainError>;
}
