//! Session provider port.
//!
//! Exposes the signed-in user's profile. The planning core only needs it to
//! resolve a [`TenantScope`](crate::domain::foundation::TenantScope).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Profile};

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Profile of the current session, `None` when signed out.
    async fn current_profile(&self) -> Result<Option<Profile>, DomainError>;

    async fn sign_out(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn SessionProvider) {}
    }
}
