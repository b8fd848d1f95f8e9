//! Tenant context threaded into every store call.
//!
//! The hosted backend scopes rows by tenant ("entreprise"). Privileged
//! accounts may act as another tenant through an override stored on their
//! profile. Rather than reading that override from ambient session state,
//! callers resolve it once into a [`TenantScope`] and pass the scope
//! explicitly to each port.

use serde::{Deserialize, Serialize};

use super::{TenantId, UserId};

/// Role of a user inside their own tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Profile of the signed-in user, as exposed by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    #[serde(rename = "entreprise_id")]
    pub tenant_id: TenantId,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default, rename = "override_entreprise_id")]
    pub override_tenant_id: Option<TenantId>,
}

impl Profile {
    /// Creates a plain user profile belonging to `tenant_id`.
    pub fn new(user_id: UserId, tenant_id: TenantId) -> Self {
        Self {
            user_id,
            tenant_id,
            role: Role::User,
            is_super_admin: false,
            override_tenant_id: None,
        }
    }

    /// Whether this profile currently acts as a tenant other than its own.
    pub fn is_impersonating(&self) -> bool {
        self.is_super_admin && self.override_tenant_id.is_some()
    }
}

/// The tenant every query and mutation is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantScope {
    tenant_id: TenantId,
    acting_user: Option<UserId>,
}

impl TenantScope {
    /// Scope for a known tenant with no acting user (background jobs, tests).
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            acting_user: None,
        }
    }

    /// Resolves the effective tenant of a profile.
    ///
    /// The override only applies to super admins; for anyone else it is ignored.
    pub fn for_profile(profile: &Profile) -> Self {
        let tenant_id = match profile.override_tenant_id {
            Some(override_id) if profile.is_super_admin => override_id,
            _ => profile.tenant_id,
        };
        Self {
            tenant_id,
            acting_user: Some(profile.user_id.clone()),
        }
    }

    /// The tenant id rows must carry to be visible through this scope.
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// The user on whose behalf calls are made, if any.
    pub fn acting_user(&self) -> Option<&UserId> {
        self.acting_user.as_ref()
    }

    /// Does a tenant-scoped record belong to this scope?
    pub fn owns(&self, record_tenant: TenantId) -> bool {
        self.tenant_id == record_tenant
    }
}
