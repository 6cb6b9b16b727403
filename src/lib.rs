//! PointMap Library
//!
//! This library provides the core functionality of PointMap: the per-app
//! point table model, reading and writing `.dt` manifests, packing many apps
//! into a zip archive, and persisting the app collection.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod parser;
pub mod services;
