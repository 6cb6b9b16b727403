//! Multi-app archive packing and unpacking.
//!
//! The writer stores one `Apps/<app>/manifest.dt` entry per app, written in
//! the full manifest layout. The reader accepts any entry whose path ends in
//! `manifest.dt` (case-insensitive) and derives the app name from the path.

use crate::constants::{ARCHIVE_ROOT, MANIFEST_FILE_NAME};
use crate::models::collection::validate_app_name;
use crate::models::{AppCollection, AppConfiguration};
use crate::parser::manifest::parse_manifest_str;
use crate::parser::manifest_gen::{generate_manifest, ManifestLayout};
use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;
use std::io::{Cursor, Read, Write};
use std::sync::LazyLock;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// `.../<app>/manifest.dt`
static FOLDER_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([^/]+)/manifest\.dt$").expect("folder name regex is valid")
});

/// `.../<app>_manifest.dt`
static FLAT_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([^/]+)_manifest\.dt$").expect("flat name regex is valid")
});

/// Trailing `_manifest.dt` or `manifest.dt` on a bare file name.
static SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)_?manifest\.dt$").expect("suffix regex is valid"));

/// A recoverable problem with a single archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// No app name could be derived from the entry path.
    UnnamedEntry {
        /// Entry path inside the archive
        path: String,
    },
    /// The derived app name cannot be stored or exported.
    InvalidName {
        /// Derived app name
        app: String,
        /// Entry path inside the archive
        path: String,
        /// Why the name was rejected
        reason: String,
    },
    /// The manifest had no content.
    EmptyManifest {
        /// Derived app name
        app: String,
        /// Entry path inside the archive
        path: String,
    },
    /// The entry could not be read as UTF-8 text.
    UnreadableEntry {
        /// Entry path inside the archive
        path: String,
        /// Underlying error
        reason: String,
    },
    /// A later entry replaced an app already imported from this archive.
    DuplicateApp {
        /// Derived app name
        app: String,
        /// Path of the entry that won
        path: String,
    },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnnamedEntry { path } => {
                write!(f, "Could not extract app name from '{path}'; entry skipped")
            }
            Self::InvalidName { app, path, reason } => {
                write!(f, "Invalid app name '{app}' from '{path}': {reason}; entry skipped")
            }
            Self::EmptyManifest { app, path } => {
                write!(f, "Manifest for '{app}' is empty ({path}); entry skipped")
            }
            Self::UnreadableEntry { path, reason } => {
                write!(f, "Could not read '{path}': {reason}; entry skipped")
            }
            Self::DuplicateApp { app, path } => {
                write!(f, "App '{app}' appears more than once; using {path}")
            }
        }
    }
}

/// Result of unpacking an archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveImport {
    /// Apps recovered from the archive
    pub apps: AppCollection,
    /// Entries that were skipped or overwritten
    pub warnings: Vec<ImportWarning>,
}

/// Packs every app into a zip archive.
///
/// # Errors
///
/// Returns an error if an app name cannot be used as an archive folder or the
/// archive cannot be written.
pub fn pack_all(apps: &AppCollection) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (name, config) in apps.iter() {
        let entry = format!("{ARCHIVE_ROOT}/{name}/{MANIFEST_FILE_NAME}");
        let manifest = generate_manifest(config, ManifestLayout::Full);
        add_file_to_zip(&mut zip, name, &entry, manifest.as_bytes(), options)?;
    }

    let cursor = zip.finish().context("Failed to finalize archive")?;
    Ok(cursor.into_inner())
}

/// Adds a manifest entry with zip-slip prevention.
fn add_file_to_zip<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    app_name: &str,
    entry: &str,
    content: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    if app_name.is_empty()
        || app_name.contains("..")
        || app_name.contains('/')
        || app_name.contains('\\')
    {
        anyhow::bail!("Invalid app name for archive entry: '{app_name}'");
    }

    zip.start_file(entry, options)
        .with_context(|| format!("Failed to start archive entry {entry}"))?;
    zip.write_all(content)
        .with_context(|| format!("Failed to write archive entry {entry}"))?;

    Ok(())
}

/// Unpacks every manifest in an archive.
///
/// Per-entry problems are collected as [`ImportWarning`]s and logged; the
/// import continues. Later entries with the same app name win.
///
/// # Errors
///
/// Fails only when the bytes are not a readable zip archive or the archive
/// holds no `manifest.dt` entry at all.
pub fn unpack_all(bytes: &[u8]) -> Result<ArchiveImport> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("Failed to open archive: not a valid zip file")?;

    let mut result = ArchiveImport::default();
    let mut manifest_entries = 0usize;

    for index in 0..archive.len() {
        let mut file = match archive.by_index(index) {
            Ok(file) => file,
            Err(e) => {
                result.warn(ImportWarning::UnreadableEntry {
                    path: format!("#{index}"),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let path = file.name().to_string();
        if file.is_dir() || !path.to_lowercase().ends_with(MANIFEST_FILE_NAME) {
            continue;
        }
        manifest_entries += 1;

        let app = derive_app_name(&path);
        if app.is_empty() {
            result.warn(ImportWarning::UnnamedEntry { path });
            continue;
        }
        if let Err(e) = validate_app_name(&app) {
            result.warn(ImportWarning::InvalidName {
                app,
                path,
                reason: e.to_string(),
            });
            continue;
        }

        let mut content = String::new();
        if let Err(e) = file.read_to_string(&mut content) {
            result.warn(ImportWarning::UnreadableEntry {
                path,
                reason: e.to_string(),
            });
            continue;
        }

        if content.trim().is_empty() {
            result.warn(ImportWarning::EmptyManifest { app, path });
            continue;
        }

        let config: AppConfiguration = parse_manifest_str(&content);
        if result.apps.replace(app.clone(), config).is_some() {
            result.warn(ImportWarning::DuplicateApp {
                app: app.clone(),
                path: path.clone(),
            });
        }
        tracing::info!(app = %app, entry = %path, "Imported app from archive");
    }

    if manifest_entries == 0 {
        anyhow::bail!("Invalid archive structure: no {MANIFEST_FILE_NAME} entries found");
    }

    Ok(result)
}

impl ArchiveImport {
    fn warn(&mut self, warning: ImportWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Derives an app name from an archive entry path.
///
/// Tries, in order: the parent folder of `manifest.dt`, the prefix of a flat
/// `<app>_manifest.dt`, and finally the bare file name with the manifest
/// suffix removed. May return an empty string.
pub fn derive_app_name(path: &str) -> String {
    if let Some(captures) = FOLDER_NAME_REGEX.captures(path) {
        return captures[1].trim().to_string();
    }

    if let Some(captures) = FLAT_NAME_REGEX.captures(path) {
        return captures[1].trim().to_string();
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    SUFFIX_REGEX.replace(file_name, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_derive_app_name() {
        assert_eq!(derive_app_name("Apps/Line1/manifest.dt"), "Line1");
        assert_eq!(derive_app_name("backup/Apps/Line2/MANIFEST.DT"), "Line2");
        assert_eq!(derive_app_name("Line3_manifest.dt"), "Line3");
        assert_eq!(derive_app_name("exports/Line4_manifest.dt"), "Line4");
        assert_eq!(derive_app_name("Line5manifest.dt"), "Line5");
        assert_eq!(derive_app_name("manifest.dt"), "");
        assert_eq!(derive_app_name("_manifest.dt"), "");
    }

    #[test]
    fn test_pack_layout() {
        let mut apps = AppCollection::new();
        apps.create("Line1").unwrap();
        apps.create("Line2").unwrap();

        let bytes = pack_all(&apps).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["Apps/Line1/manifest.dt", "Apps/Line2/manifest.dt"]);

        let mut content = String::new();
        archive
            .by_name("Apps/Line1/manifest.dt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.starts_with("[DI]"));
        assert!(content.ends_with("[/Registers]"));
    }

    #[test]
    fn test_pack_unpack_round_trip() {
        let mut apps = AppCollection::new();
        apps.create("Press").unwrap();
        let press = apps.get_mut("Press").unwrap();
        press.digital_inputs.block.size = 2;
        press.digital_inputs.labels.insert(1, "Guard".to_string());
        press.digital_inputs.labels.insert(2, "Palm".to_string());

        let imported = unpack_all(&pack_all(&apps).unwrap()).unwrap();
        assert!(imported.warnings.is_empty());
        assert_eq!(imported.apps.len(), 1);

        let press = imported.apps.get("Press").unwrap();
        assert_eq!(press.digital_inputs.block.size, 2);
        assert_eq!(press.digital_inputs.label(2), "Palm");
    }

    #[test]
    fn test_pack_rejects_traversal_names() {
        let apps: AppCollection =
            std::iter::once(("../evil".to_string(), AppConfiguration::default())).collect();
        assert!(pack_all(&apps).is_err());
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let bytes = zip_with(&[
            ("Apps/Line1/manifest.dt", "[DI]\n1,\"first\"\n[/DI]"),
            ("Line1_manifest.dt", "[DI]\n1,\"second\"\n2,\"x\"\n[/DI]"),
        ]);

        let imported = unpack_all(&bytes).unwrap();
        assert_eq!(imported.apps.len(), 1);
        let line1 = imported.apps.get("Line1").unwrap();
        assert_eq!(line1.digital_inputs.label(1), "second");
        assert_eq!(line1.digital_inputs.block.size, 2);
        assert_eq!(
            imported.warnings,
            vec![ImportWarning::DuplicateApp {
                app: "Line1".to_string(),
                path: "Line1_manifest.dt".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_and_unnamed_entries_are_skipped() {
        let bytes = zip_with(&[
            ("Apps/Empty/manifest.dt", "  \n"),
            ("manifest.dt", "[DI]\n1,\"x\"\n[/DI]"),
            ("Apps/Good/manifest.dt", "[DO]\n1,Lamp\n[/DO]"),
            ("Apps/readme.txt", "ignored"),
        ]);

        let imported = unpack_all(&bytes).unwrap();
        assert_eq!(imported.apps.names().collect::<Vec<_>>(), vec!["Good"]);
        assert_eq!(imported.warnings.len(), 2);
        assert!(matches!(
            imported.warnings[0],
            ImportWarning::EmptyManifest { ref app, .. } if app == "Empty"
        ));
        assert!(matches!(
            imported.warnings[1],
            ImportWarning::UnnamedEntry { .. }
        ));
    }

    #[test]
    fn test_path_like_names_are_skipped() {
        let bytes = zip_with(&[
            ("Apps/../manifest.dt", "[DI]\n1,\"x\"\n[/DI]"),
            ("Apps\\Line1\\manifest.dt", "[DI]\n1,\"y\"\n[/DI]"),
            ("Apps/Good/manifest.dt", "[DO]\n1,Lamp\n[/DO]"),
        ]);

        let imported = unpack_all(&bytes).unwrap();
        assert_eq!(imported.apps.names().collect::<Vec<_>>(), vec!["Good"]);
        assert_eq!(imported.warnings.len(), 2);
        assert!(matches!(
            imported.warnings[0],
            ImportWarning::InvalidName { ref app, .. } if app == ".."
        ));
        assert!(matches!(
            imported.warnings[1],
            ImportWarning::InvalidName { ref app, .. } if app == "Apps\\Line1\\"
        ));

        // Everything that was imported can be exported again
        let repacked = unpack_all(&pack_all(&imported.apps).unwrap()).unwrap();
        assert_eq!(repacked.apps.names().collect::<Vec<_>>(), vec!["Good"]);
    }

    #[test]
    fn test_unreadable_archives_are_fatal() {
        assert!(unpack_all(b"definitely not a zip").is_err());

        let no_manifests = zip_with(&[("Apps/notes.txt", "hello")]);
        let err = unpack_all(&no_manifests).unwrap_err();
        assert!(err.to_string().contains("no manifest.dt entries"));
    }
}
