//! App collection service.
//!
//! This module centralizes every operation that reads or changes the stored
//! app collection. Each operation loads the collection, works on a copy, and
//! saves the whole collection back in one step, so a failed operation never
//! leaves a half-applied change behind.

use anyhow::{Context, Result};
use std::path::Path;

use crate::constants::APPS_STORE_KEY;
use crate::models::{
    AppCollection, AppConfiguration, FileEntry, GroupEntry, GroupKind, PointBlock, PointCategory,
    SystemVariable,
};
use crate::parser::{self, ImportWarning, ManifestLayout};
use crate::services::store::KeyValueStore;

/// Partial update of a point block. `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockUpdate {
    /// New number of points
    pub size: Option<u32>,
    /// New first address
    pub start_point: Option<u32>,
    /// New rack (DI/DO/UI/UO only)
    pub rack: Option<u32>,
    /// New slot (DI/DO/UI/UO only)
    pub slot: Option<u32>,
}

/// Outcome of importing an archive into the store.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Names of all apps taken from the archive
    pub imported: Vec<String>,
    /// Names that replaced an app already in the store
    pub replaced: Vec<String>,
    /// Per-entry archive problems
    pub warnings: Vec<ImportWarning>,
}

/// Service for managing the app collection held in a [`KeyValueStore`].
pub struct AppService<S> {
    store: S,
}

impl<S: KeyValueStore> AppService<S> {
    /// Creates a service over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Loads the app collection; an empty store yields an empty collection.
    pub fn load_collection(&self) -> Result<AppCollection> {
        match self.store.load(APPS_STORE_KEY)? {
            Some(content) => {
                serde_json::from_str(&content).context("Failed to parse stored app collection")
            }
            None => Ok(AppCollection::new()),
        }
    }

    /// Saves the whole app collection.
    pub fn save_collection(&self, apps: &AppCollection) -> Result<()> {
        let content =
            serde_json::to_string_pretty(apps).context("Failed to serialize app collection")?;
        self.store.save(APPS_STORE_KEY, &content)
    }

    /// Creates a new app with default configuration.
    pub fn create_app(&self, name: &str) -> Result<String> {
        let mut apps = self.load_collection()?;
        let name = apps.create(name)?;
        self.save_collection(&apps)?;
        tracing::info!(app = %name, "Created app");
        Ok(name)
    }

    /// Deletes an app.
    pub fn delete_app(&self, name: &str) -> Result<()> {
        let mut apps = self.load_collection()?;
        if apps.remove(name).is_none() {
            anyhow::bail!("App '{name}' not found");
        }
        self.save_collection(&apps)?;
        tracing::info!(app = %name, "Deleted app");
        Ok(())
    }

    /// Returns a copy of an app's configuration.
    pub fn app(&self, name: &str) -> Result<AppConfiguration> {
        self.load_collection()?
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("App '{name}' not found"))
    }

    /// Applies `edit` to a copy of an app and stores the result.
    ///
    /// Nothing is saved if `edit` fails.
    pub fn update_app<T>(
        &self,
        name: &str,
        edit: impl FnOnce(&mut AppConfiguration) -> Result<T>,
    ) -> Result<T> {
        let mut apps = self.load_collection()?;
        let mut config = apps
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("App '{name}' not found"))?;

        let output = edit(&mut config)?;
        apps.replace(name, config);
        self.save_collection(&apps)?;
        Ok(output)
    }

    /// Changes a point block and regenerates its label keys from the new range.
    pub fn set_block(
        &self,
        name: &str,
        category: PointCategory,
        update: BlockUpdate,
    ) -> Result<PointBlock> {
        if !category.has_rack_slot() && (update.rack.is_some() || update.slot.is_some()) {
            anyhow::bail!("Category '{category}' has no rack/slot addressing");
        }

        self.update_app(name, |config| {
            let table = config.table_mut(category);
            if let Some(size) = update.size {
                table.block.size = size;
            }
            if let Some(start_point) = update.start_point {
                table.block.start_point = start_point;
            }
            if update.rack.is_some() {
                table.block.rack = update.rack;
            }
            if update.slot.is_some() {
                table.block.slot = update.slot;
            }
            table.normalize_labels();
            Ok(table.block.clone())
        })
    }

    /// Sets the label of one point. The point must lie inside the block.
    pub fn set_label(
        &self,
        name: &str,
        category: PointCategory,
        point: u32,
        label: &str,
    ) -> Result<()> {
        self.update_app(name, |config| {
            let table = config.table_mut(category);
            if !table.block.contains(point) {
                anyhow::bail!(
                    "Point {point} is outside the {category} range ({})",
                    describe_range(&table.block)
                );
            }
            table.labels.insert(point, label.to_string());
            Ok(())
        })
    }

    /// Appends a group entry.
    pub fn add_group(&self, name: &str, kind: GroupKind, entry: GroupEntry) -> Result<()> {
        self.update_app(name, |config| {
            config.groups_mut(kind).push(entry);
            Ok(())
        })
    }

    /// Removes every group entry with `number`, returning how many were removed.
    pub fn remove_group(&self, name: &str, kind: GroupKind, number: u32) -> Result<usize> {
        self.update_app(name, |config| {
            let groups = config.groups_mut(kind);
            let before = groups.len();
            groups.retain(|entry| entry.number != number);
            Ok(before - groups.len())
        })
    }

    /// Appends a file entry.
    pub fn add_file(&self, name: &str, file: FileEntry) -> Result<()> {
        if file.name.trim().is_empty() {
            anyhow::bail!("File name cannot be empty");
        }
        self.update_app(name, |config| {
            config.files.push(file);
            Ok(())
        })
    }

    /// Removes file entries by name, returning how many were removed.
    pub fn remove_file(&self, name: &str, file_name: &str) -> Result<usize> {
        self.update_app(name, |config| {
            let before = config.files.len();
            config.files.retain(|file| file.name != file_name);
            Ok(before - config.files.len())
        })
    }

    /// Appends a system variable. Duplicate keys are kept.
    pub fn add_variable(&self, name: &str, variable: SystemVariable) -> Result<()> {
        if variable.key.trim().is_empty() {
            anyhow::bail!("Variable key cannot be empty");
        }
        self.update_app(name, |config| {
            config.system_variables.push(variable);
            Ok(())
        })
    }

    /// Removes all system variables, returning how many were removed.
    pub fn clear_variables(&self, name: &str) -> Result<usize> {
        self.update_app(name, |config| {
            let count = config.system_variables.len();
            config.system_variables.clear();
            Ok(count)
        })
    }

    /// Replaces an app's configuration with a parsed manifest file.
    ///
    /// With no file selected this is a no-op and returns `Ok(None)`.
    pub fn import_manifest(
        &self,
        name: &str,
        source: Option<&Path>,
    ) -> Result<Option<AppConfiguration>> {
        let Some(path) = source else {
            tracing::debug!(app = %name, "No manifest selected; nothing imported");
            return Ok(None);
        };

        let parsed = parser::parse_manifest_file(path)?;
        self.update_app(name, |config| {
            *config = parsed.clone();
            Ok(())
        })?;

        tracing::info!(app = %name, file = %path.display(), "Imported manifest");
        Ok(Some(parsed))
    }

    /// Serializes one app's manifest.
    pub fn export_manifest(&self, name: &str, layout: ManifestLayout) -> Result<String> {
        let config = self.app(name)?;
        Ok(parser::generate_manifest(&config, layout))
    }

    /// Packs every app into archive bytes.
    pub fn export_all(&self) -> Result<Vec<u8>> {
        let apps = self.load_collection()?;
        parser::pack_all(&apps)
    }

    /// Unpacks archive bytes and merges the apps into the store.
    ///
    /// A fatal archive error leaves the stored collection untouched.
    pub fn import_all(&self, bytes: &[u8]) -> Result<ImportSummary> {
        let archive = parser::unpack_all(bytes)?;
        let mut apps = self.load_collection()?;

        let imported: Vec<String> = archive.apps.names().map(str::to_string).collect();
        let replaced = apps.merge_import(archive.apps);
        for name in &replaced {
            tracing::warn!(app = %name, "App already exists and was overwritten");
        }

        self.save_collection(&apps)?;
        tracing::info!(count = imported.len(), "Imported apps from archive");

        Ok(ImportSummary {
            imported,
            replaced,
            warnings: archive.warnings,
        })
    }
}

/// Human-readable address range of a block.
fn describe_range(block: &PointBlock) -> String {
    match block.end_point() {
        Some(end) => format!("{} - {end}", block.start_point),
        None => "empty".to_string(),
    }
}
