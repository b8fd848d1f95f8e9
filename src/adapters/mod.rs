//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session providers
//! - `http` - axum routes over the planning handlers and the voice proxy
//! - `store` - Record store implementations (in-memory, demo seed)
//! - `voice` - Voice assistant webhook client

pub mod auth;
pub mod http;
pub mod store;
pub mod voice;

pub use auth::StaticSessionProvider;
pub use store::{demo_store, InMemoryRecordStore};
pub use voice::{WebhookConfig, WebhookVoiceAssistant};
