//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the manifest/archive naming rules.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "PointMap";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "pointmap";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "POINTMAP_CONFIG_DIR";

/// File name of a manifest inside an archive app folder.
pub const MANIFEST_FILE_NAME: &str = "manifest.dt";

/// Suffix of a single exported manifest (`<app>_manifest.dt`).
pub const MANIFEST_FILE_SUFFIX: &str = "_manifest.dt";

/// Root folder of an exported archive.
pub const ARCHIVE_ROOT: &str = "Apps";

/// Default file name of an exported archive.
pub const ARCHIVE_FILE_NAME: &str = "Apps_Export.zip";

/// Store key under which the app collection is persisted.
pub const APPS_STORE_KEY: &str = "apps";
