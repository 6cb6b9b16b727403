//! CLI command handlers for PointMap.
//!
//! This module provides headless, scriptable access to the app collection:
//! editing point tables, exporting and importing single manifests, and
//! batch archive transfer.

pub mod app;
pub mod archive;
pub mod block;
pub mod common;
pub mod config;
pub mod export;
pub mod file;
pub mod group;
pub mod import;
pub mod inspect;
pub mod label;
pub mod var;

// Re-export types used by main.rs and tests
pub use app::AppArgs;
pub use archive::{ExportAllArgs, ImportAllArgs};
pub use block::BlockArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use export::ExportArgs;
pub use file::FileArgs;
pub use group::GroupArgs;
pub use import::ImportArgs;
pub use inspect::InspectArgs;
pub use label::LabelArgs;
pub use var::VarArgs;
