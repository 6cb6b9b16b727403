//! The named collection of apps.

use crate::models::app::AppConfiguration;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum accepted length of an app name.
pub const MAX_APP_NAME_LEN: usize = 100;

/// All apps, keyed by unique name.
///
/// Each configuration is exclusively owned by its name. Replacement is always
/// whole-value, so callers never observe a partially applied import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppCollection {
    apps: BTreeMap<String, AppConfiguration>,
}

impl AppCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new app with default configuration.
    ///
    /// The name is trimmed; empty and duplicate names are rejected.
    /// Returns the stored (trimmed) name.
    pub fn create(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        validate_app_name(name)?;

        if self.apps.contains_key(name) {
            anyhow::bail!("An app named '{name}' already exists");
        }

        self.apps
            .insert(name.to_string(), AppConfiguration::default());
        Ok(name.to_string())
    }

    /// Removes an app, returning its configuration.
    pub fn remove(&mut self, name: &str) -> Option<AppConfiguration> {
        self.apps.remove(name)
    }

    /// Looks up an app.
    pub fn get(&self, name: &str) -> Option<&AppConfiguration> {
        self.apps.get(name)
    }

    /// Looks up an app for editing.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut AppConfiguration> {
        self.apps.get_mut(name)
    }

    /// Returns true if an app with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    /// Inserts or replaces an app in one step, returning the previous value.
    pub fn replace(
        &mut self,
        name: impl Into<String>,
        config: AppConfiguration,
    ) -> Option<AppConfiguration> {
        self.apps.insert(name.into(), config)
    }

    /// Merges imported apps, overwriting existing names.
    ///
    /// Returns the names that replaced an existing app.
    pub fn merge_import(
        &mut self,
        imported: impl IntoIterator<Item = (String, AppConfiguration)>,
    ) -> Vec<String> {
        let mut overwritten = Vec::new();
        for (name, config) in imported {
            if self.apps.insert(name.clone(), config).is_some() {
                overwritten.push(name);
            }
        }
        overwritten
    }

    /// App names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    /// Iterates over `(name, configuration)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppConfiguration)> {
        self.apps.iter().map(|(name, config)| (name.as_str(), config))
    }

    /// Number of apps.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Returns true if there are no apps.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl FromIterator<(String, AppConfiguration)> for AppCollection {
    fn from_iter<T: IntoIterator<Item = (String, AppConfiguration)>>(iter: T) -> Self {
        Self {
            apps: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AppCollection {
    type Item = (String, AppConfiguration);
    type IntoIter = std::collections::btree_map::IntoIter<String, AppConfiguration>;

    fn into_iter(self) -> Self::IntoIter {
        self.apps.into_iter()
    }
}

/// Validates an (already trimmed) app name.
pub(crate) fn validate_app_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("App name cannot be empty");
    }

    if name.len() > MAX_APP_NAME_LEN {
        anyhow::bail!(
            "App name exceeds maximum length of {MAX_APP_NAME_LEN} characters (got {})",
            name.len()
        );
    }

    // Names become archive folder names
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        anyhow::bail!("App name '{name}' cannot contain path separators or be '.'/'..'");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_and_defaults() {
        let mut apps = AppCollection::new();
        let name = apps.create("  Line1 ").unwrap();

        assert_eq!(name, "Line1");
        assert_eq!(apps.get("Line1"), Some(&AppConfiguration::default()));
    }

    #[test]
    fn test_create_rejects_empty_and_duplicate() {
        let mut apps = AppCollection::new();
        assert!(apps.create("   ").is_err());

        apps.create("Line1").unwrap();
        let err = apps.create("Line1").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(apps.len(), 1);
    }

    #[test]
    fn test_create_rejects_path_like_names() {
        let mut apps = AppCollection::new();
        assert!(apps.create("a/b").is_err());
        assert!(apps.create("..").is_err());
        assert!(apps.create(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_merge_import_reports_overwrites() {
        let mut apps = AppCollection::new();
        apps.create("Line1").unwrap();

        let mut imported = AppConfiguration::default();
        imported.digital_inputs.block.size = 2;

        let overwritten = apps.merge_import(vec![
            ("Line1".to_string(), imported.clone()),
            ("Line2".to_string(), AppConfiguration::default()),
        ]);

        assert_eq!(overwritten, vec!["Line1".to_string()]);
        assert_eq!(apps.get("Line1"), Some(&imported));
        assert_eq!(apps.names().collect::<Vec<_>>(), vec!["Line1", "Line2"]);
    }

    #[test]
    fn test_remove() {
        let mut apps = AppCollection::new();
        apps.create("Line1").unwrap();
        assert!(apps.remove("Line1").is_some());
        assert!(apps.remove("Line1").is_none());
        assert!(apps.is_empty());
    }
}
