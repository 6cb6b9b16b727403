//! Parsing and serialization of manifest files and app archives.
//!
//! This module handles reading and writing single-app `.dt` manifests and
//! packing/unpacking the zip archives that bundle many of them.

pub mod archive;
pub mod manifest;
pub mod manifest_gen;
pub mod sections;

// Re-export commonly used functions
pub use archive::{pack_all, unpack_all, ArchiveImport, ImportWarning};
pub use manifest::{parse_manifest_file, parse_manifest_str};
pub use manifest_gen::{generate_manifest, manifest_file_name, save_manifest, ManifestLayout};
