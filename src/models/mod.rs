//! Data models for apps, point tables, groups, files and variables.
//!
//! These are plain value types. They know nothing about the manifest format,
//! the store, or the command line.

pub mod app;
pub mod collection;
pub mod group;
pub mod point;

// Re-export all model types
pub use app::{AppConfiguration, FileEntry, SystemVariable};
pub use collection::AppCollection;
pub use group::{GroupEntry, GroupKind};
pub use point::{LabelMap, PointBlock, PointCategory, PointTable, SizeRule};
