//! Chantier Planning - Field-service scheduling backend
//!
//! This crate implements the planning engine of a small-business field-service
//! application: job-sites, workers, and the drag-and-drop assignment of workers
//! to half-day slots, with optimistic updates against a hosted record store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
