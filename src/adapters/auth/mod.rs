//! Session adapters.
//!
//! Implementations of the `SessionProvider` port:
//!
//! - `static_session` - Fixed profile for single-tenant deployments and tests

mod static_session;

pub use static_session::StaticSessionProvider;
