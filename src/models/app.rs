//! The per-app configuration aggregate.

use crate::models::group::{GroupEntry, GroupKind};
use crate::models::point::{PointCategory, PointTable};
use serde::{Deserialize, Serialize};

/// An auxiliary file reference with a "run on load" marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name as written in the manifest
    pub name: String,
    /// Whether the file runs on load
    pub run: bool,
}

impl FileEntry {
    /// Creates a file entry.
    pub fn new(name: impl Into<String>, run: bool) -> Self {
        Self {
            name: name.into(),
            run,
        }
    }
}

/// A `key = value` pair from the `SETVAR` section.
///
/// Keys are not unique; duplicates are kept in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemVariable {
    /// Variable name
    pub key: String,
    /// Variable value
    pub value: String,
}

impl SystemVariable {
    /// Creates a system variable.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Complete configuration of one app.
///
/// `Default` yields a new app: 16 points starting at 1 for every flat
/// category (rack/slot 0 where applicable) and no groups, files or variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfiguration {
    /// Digital inputs
    pub digital_inputs: PointTable,
    /// Digital outputs
    pub digital_outputs: PointTable,
    /// Registers
    pub registers: PointTable,
    /// Flags
    pub flags: PointTable,
    /// User inputs
    pub user_inputs: PointTable,
    /// User outputs
    pub user_outputs: PointTable,
    /// Group inputs, in manifest order
    #[serde(default)]
    pub group_inputs: Vec<GroupEntry>,
    /// Group outputs, in manifest order
    #[serde(default)]
    pub group_outputs: Vec<GroupEntry>,
    /// Auxiliary files
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// System variables, in manifest order
    #[serde(default)]
    pub system_variables: Vec<SystemVariable>,
}

impl Default for AppConfiguration {
    fn default() -> Self {
        Self {
            digital_inputs: PointTable::for_category(PointCategory::DigitalInput),
            digital_outputs: PointTable::for_category(PointCategory::DigitalOutput),
            registers: PointTable::for_category(PointCategory::Register),
            flags: PointTable::for_category(PointCategory::Flag),
            user_inputs: PointTable::for_category(PointCategory::UserInput),
            user_outputs: PointTable::for_category(PointCategory::UserOutput),
            group_inputs: Vec::new(),
            group_outputs: Vec::new(),
            files: Vec::new(),
            system_variables: Vec::new(),
        }
    }
}

impl AppConfiguration {
    /// Table for a category.
    pub const fn table(&self, category: PointCategory) -> &PointTable {
        match category {
            PointCategory::DigitalInput => &self.digital_inputs,
            PointCategory::DigitalOutput => &self.digital_outputs,
            PointCategory::Register => &self.registers,
            PointCategory::Flag => &self.flags,
            PointCategory::UserInput => &self.user_inputs,
            PointCategory::UserOutput => &self.user_outputs,
        }
    }

    /// Mutable table for a category.
    pub fn table_mut(&mut self, category: PointCategory) -> &mut PointTable {
        match category {
            PointCategory::DigitalInput => &mut self.digital_inputs,
            PointCategory::DigitalOutput => &mut self.digital_outputs,
            PointCategory::Register => &mut self.registers,
            PointCategory::Flag => &mut self.flags,
            PointCategory::UserInput => &mut self.user_inputs,
            PointCategory::UserOutput => &mut self.user_outputs,
        }
    }

    /// Group list for a kind.
    pub fn groups(&self, kind: GroupKind) -> &[GroupEntry] {
        match kind {
            GroupKind::Input => &self.group_inputs,
            GroupKind::Output => &self.group_outputs,
        }
    }

    /// Mutable group list for a kind.
    pub fn groups_mut(&mut self, kind: GroupKind) -> &mut Vec<GroupEntry> {
        match kind {
            GroupKind::Input => &mut self.group_inputs,
            GroupKind::Output => &mut self.group_outputs,
        }
    }
}
