//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, errors, timestamps, tenancy)
//! - `planning` - Records, half-day slots, scheduling state and its projections
//! - `voice` - Voice note payloads and webhook reply interpretation

pub mod foundation;
pub mod planning;
pub mod voice;
