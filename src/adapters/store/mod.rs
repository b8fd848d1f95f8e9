//! Record store adapters.

mod demo;
mod in_memory;

pub use demo::{demo_data, demo_store, DemoData};
pub use in_memory::{InMemoryRecordStore, StoreOperation};
