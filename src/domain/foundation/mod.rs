//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and the tenant context
//! that form the vocabulary of the planning domain.

mod command;
mod errors;
mod ids;
mod tenant;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ClientId, InterventionId, JobSiteId, TenantId, UserId, WorkerId};
pub use tenant::{Profile, Role, TenantScope};
pub use timestamp::Timestamp;
