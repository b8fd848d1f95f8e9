//! Fixed-profile session provider.
//!
//! # Example
//!
//! ```ignore
//! let provider = StaticSessionProvider::new(Profile::new(user_id, tenant_id));
//!
//! let scope = TenantScope::for_profile(&provider.current_profile().await?.unwrap());
//! ```

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Profile, TenantId};
use crate::ports::SessionProvider;

/// Serves one profile until signed out.
#[derive(Debug, Default)]
pub struct StaticSessionProvider {
    profile: RwLock<Option<Profile>>,
}

impl StaticSessionProvider {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile: RwLock::new(Some(profile)),
        }
    }

    /// A provider with no signed-in user.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Sets or clears the acting-as-tenant override. Ignored for non super admins
    /// when the scope is resolved.
    pub fn set_override(&self, tenant_id: Option<TenantId>) {
        let mut guard = self.profile.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(profile) = guard.as_mut() {
            profile.override_tenant_id = tenant_id;
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_profile(&self) -> Result<Option<Profile>, DomainError> {
        Ok(self
            .profile
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn sign_out(&self) -> Result<(), DomainError> {
        let mut guard = self.profile.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(profile) = guard.take() {
            tracing::info!(user_id = %profile.user_id.as_str(), "signed out");
        }
        Ok(())
    }
}
