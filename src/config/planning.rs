//! Planning session configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::TenantId;

#[derive(Debug, Clone, Deserialize)]
pub struct PlanningConfig {
    /// Tenant served by this instance. A fresh one is generated when unset.
    pub tenant_id: Option<TenantId>,

    /// Identifier of the user the session acts for
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Fill the in-memory store with demo job-sites, workers and bookings
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

impl PlanningConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(())
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            user_id: default_user_id(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

fn default_user_id() -> String {
    "planner".to_string()
}

fn default_seed_demo_data() -> bool {
    true
}
