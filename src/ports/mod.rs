//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the planning core and the outside world. Adapters implement these ports.
//!
//! ## Record Store Ports
//!
//! - `JobSiteStore` - Tenant-scoped job-site CRUD
//! - `WorkerStore` - Tenant-scoped worker CRUD
//! - `InterventionStore` - Tenant-scoped intervention CRUD with joined reads
//!
//! ## Session Ports
//!
//! - `SessionProvider` - Current profile and sign-out
//!
//! ## Voice Ports
//!
//! - `VoiceAssistant` - Submission of voice notes to the external workflow

mod delete_report;
mod intervention_store;
mod job_site_store;
mod session_provider;
mod voice_assistant;
mod worker_store;

pub use delete_report::DeleteReport;
pub use intervention_store::InterventionStore;
pub use job_site_store::JobSiteStore;
pub use session_provider::SessionProvider;
pub use voice_assistant::{VoiceAssistant, VoiceError, VoiceReply};
pub use worker_store::WorkerStore;
