//! Grouped I/O blocks (GI/GO).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a group block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Group inputs (`GI`)
    Input,
    /// Group outputs (`GO`)
    Output,
}

impl GroupKind {
    /// Section tag for this kind.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Input => "GI",
            Self::Output => "GO",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag().to_ascii_lowercase())
    }
}

impl FromStr for GroupKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gi" | "input" => Ok(Self::Input),
            "go" | "output" => Ok(Self::Output),
            other => anyhow::bail!("Unknown group kind '{other}'. Expected 'gi' or 'go'"),
        }
    }
}

/// A named, independently addressed group block.
///
/// Lists of group entries are ordered and, by convention only, unique by
/// `number`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    /// Identity within its list
    pub number: u32,
    /// Display name
    pub name: String,
    /// Physical rack
    pub rack: u32,
    /// Physical slot
    pub slot: u32,
    /// First point of the group
    pub start: u32,
    /// Number of points in the group
    pub length: u32,
}

impl GroupEntry {
    /// Creates an entry with zeroed addressing.
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            ..Self::default()
        }
    }
}
