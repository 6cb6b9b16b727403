//! Point categories, addressable point blocks and their label maps.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Mapping from point address to display label.
///
/// Keys are unique by construction; a label may be empty.
pub type LabelMap = BTreeMap<u32, String>;

/// Default number of points in a freshly created block.
pub const DEFAULT_BLOCK_SIZE: u32 = 16;

/// Default first address of a freshly created block.
pub const DEFAULT_START_POINT: u32 = 1;

/// The six flat point categories of a controller point table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointCategory {
    /// Digital inputs (`DI`)
    DigitalInput,
    /// Digital outputs (`DO`)
    DigitalOutput,
    /// Registers (`Registers`, `R` on input)
    Register,
    /// Flags (`FLAGS`)
    Flag,
    /// User inputs (`UI`)
    UserInput,
    /// User outputs (`UO`)
    UserOutput,
}

/// How a category's size is recovered when a manifest is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    /// Size is the number of parsed label lines.
    LabelCount,
    /// Size is the highest parsed address.
    MaxAddress,
}

impl PointCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::DigitalInput,
        Self::DigitalOutput,
        Self::Register,
        Self::Flag,
        Self::UserInput,
        Self::UserOutput,
    ];

    /// Section tag written for this category.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::DigitalInput => "DI",
            Self::DigitalOutput => "DO",
            Self::Register => "Registers",
            Self::Flag => "FLAGS",
            Self::UserInput => "UI",
            Self::UserOutput => "UO",
        }
    }

    /// Section tags accepted for this category when reading.
    pub const fn input_tags(self) -> &'static [&'static str] {
        match self {
            Self::DigitalInput => &["DI"],
            Self::DigitalOutput => &["DO"],
            Self::Register => &["R", "Registers"],
            Self::Flag => &["FLAGS"],
            Self::UserInput => &["UI"],
            Self::UserOutput => &["UO"],
        }
    }

    /// Short name used on the command line and in JSON output.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::DigitalInput => "di",
            Self::DigitalOutput => "do",
            Self::Register => "r",
            Self::Flag => "flags",
            Self::UserInput => "ui",
            Self::UserOutput => "uo",
        }
    }

    /// Whether blocks of this category carry physical rack/slot addressing.
    pub const fn has_rack_slot(self) -> bool {
        matches!(
            self,
            Self::DigitalInput | Self::DigitalOutput | Self::UserInput | Self::UserOutput
        )
    }

    /// Whether labels are wrapped in double quotes on write.
    ///
    /// Digital outputs are the one unquoted category.
    pub const fn quotes_labels(self) -> bool {
        !matches!(self, Self::DigitalOutput)
    }

    /// Size inference rule applied on read.
    pub const fn size_rule(self) -> SizeRule {
        match self {
            Self::Register => SizeRule::MaxAddress,
            _ => SizeRule::LabelCount,
        }
    }
}

impl fmt::Display for PointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for PointCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "di" => Ok(Self::DigitalInput),
            "do" => Ok(Self::DigitalOutput),
            "r" | "registers" => Ok(Self::Register),
            "flags" => Ok(Self::Flag),
            "ui" => Ok(Self::UserInput),
            "uo" => Ok(Self::UserOutput),
            other => anyhow::bail!(
                "Unknown point category '{other}'. Expected one of: di, do, r, flags, ui, uo"
            ),
        }
    }
}

/// A contiguous range of addressable points.
///
/// The address of the point at index `i` is `start_point + i`. Rack and slot
/// are only meaningful for DI/DO/UI/UO and stay `None` elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBlock {
    /// Number of points in the block
    pub size: u32,
    /// Address of the first point
    pub start_point: u32,
    /// Physical rack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack: Option<u32>,
    /// Physical slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u32>,
}

impl PointBlock {
    /// Creates the default block for a category.
    pub fn for_category(category: PointCategory) -> Self {
        let (rack, slot) = if category.has_rack_slot() {
            (Some(0), Some(0))
        } else {
            (None, None)
        };

        Self {
            size: DEFAULT_BLOCK_SIZE,
            start_point: DEFAULT_START_POINT,
            rack,
            slot,
        }
    }

    /// Last address covered by the block, or `None` for an empty block.
    pub fn end_point(&self) -> Option<u32> {
        if self.size == 0 {
            return None;
        }
        Some(self.start_point.saturating_add(self.size - 1))
    }

    /// Iterates over every address in the block, ascending.
    pub fn addresses(&self) -> impl Iterator<Item = u32> {
        let start = self.start_point;
        (0..self.size).map_while(move |i| start.checked_add(i))
    }

    /// Returns true if `address` falls inside the block.
    pub fn contains(&self, address: u32) -> bool {
        self.end_point()
            .is_some_and(|end| (self.start_point..=end).contains(&address))
    }
}

/// A point block together with its labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTable {
    /// Addressing of the points
    pub block: PointBlock,
    /// Labels keyed by address
    #[serde(default)]
    pub labels: LabelMap,
}

impl PointTable {
    /// Creates an empty, default-sized table for a category.
    pub fn for_category(category: PointCategory) -> Self {
        Self {
            block: PointBlock::for_category(category),
            labels: LabelMap::new(),
        }
    }

    /// Label for an address, or the empty string if none is set.
    pub fn label(&self, address: u32) -> &str {
        self.labels.get(&address).map_or("", String::as_str)
    }

    /// Regenerates label keys from the block range.
    ///
    /// Every address in range gets an entry (empty when previously missing)
    /// and labels outside the range are dropped.
    pub fn normalize_labels(&mut self) {
        let block = self.block.clone();
        self.labels.retain(|address, _| block.contains(*address));
        for address in block.addresses() {
            self.labels.entry(address).or_default();
        }
    }
}
