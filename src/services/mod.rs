//! Service layer for business logic.
//!
//! This module contains services that encapsulate the app-editing workflows
//! and coordinate between the models, the parser, and persistent storage.

pub mod apps;
pub mod store;

// Re-export commonly used types
pub use apps::{AppService, BlockUpdate, ImportSummary};
pub use store::{FileStore, KeyValueStore, MemoryStore};
