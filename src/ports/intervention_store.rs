//! Intervention store port.
//!
//! The assignment engine's only persistence dependency.
//!
//! # Contract
//!
//! - `fetch_all` returns interventions joined with their job-site (itself
//!   joined with its client) and worker
//! - `insert` receives a caller-generated id so the record can be shown
//!   before the store confirms it
//! - `delete` reporting zero affected rows is not an error
//! - No transaction spans several entities

use async_trait::async_trait;

use super::DeleteReport;
use crate::domain::foundation::{DomainError, InterventionId, TenantScope};
use crate::domain::planning::{Intervention, InterventionPatch};

#[async_trait]
pub trait InterventionStore: Send + Sync {
    async fn fetch_all(&self, scope: &TenantScope) -> Result<Vec<Intervention>, DomainError>;

    /// # Errors
    ///
    /// - `DatabaseError` on duplicate id or persistence failure
    async fn insert(
        &self,
        scope: &TenantScope,
        intervention: Intervention,
    ) -> Result<Intervention, DomainError>;

    /// # Errors
    ///
    /// - `InterventionNotFound` if no row of the tenant has this id
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        scope: &TenantScope,
        id: InterventionId,
        patch: InterventionPatch,
    ) -> Result<(), DomainError>;

    async fn delete(
        &self,
        scope: &TenantScope,
        id: InterventionId,
    ) -> Result<DeleteReport, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervention_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn InterventionStore) {}
    }
}
