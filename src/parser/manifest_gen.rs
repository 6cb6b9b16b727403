//! Manifest (`.dt`) generation (serialization).
//!
//! Two section layouts exist. [`ManifestLayout::Full`] is what the archive
//! export writes; [`ManifestLayout::Reduced`] is the single-app export, which
//! only covers DI, DO, Registers and the group sections. The reader accepts
//! either.
//!
//! Labels are written verbatim. A label containing `"` is not escaped and will
//! not survive a round trip.

use crate::constants::MANIFEST_FILE_SUFFIX;
use crate::models::{AppConfiguration, FileEntry, GroupEntry, GroupKind, PointCategory, SystemVariable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Section selection and ordering used when writing a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestLayout {
    /// SETVAR, FILES, DI, DO, GI, GO, UI, UO, FLAGS, Registers
    #[default]
    Full,
    /// DI, DO, Registers, GI, GO
    Reduced,
}

impl fmt::Display for ManifestLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Reduced => f.write_str("reduced"),
        }
    }
}

impl FromStr for ManifestLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "reduced" => Ok(Self::Reduced),
            other => anyhow::bail!("Unknown manifest layout '{other}'. Expected 'full' or 'reduced'"),
        }
    }
}

/// One emitted section in layout order.
enum SectionSpec {
    SystemVariables,
    Files,
    Points(PointCategory),
    Groups(GroupKind),
}

const FULL_ORDER: [SectionSpec; 10] = [
    SectionSpec::SystemVariables,
    SectionSpec::Files,
    SectionSpec::Points(PointCategory::DigitalInput),
    SectionSpec::Points(PointCategory::DigitalOutput),
    SectionSpec::Groups(GroupKind::Input),
    SectionSpec::Groups(GroupKind::Output),
    SectionSpec::Points(PointCategory::UserInput),
    SectionSpec::Points(PointCategory::UserOutput),
    SectionSpec::Points(PointCategory::Flag),
    SectionSpec::Points(PointCategory::Register),
];

const REDUCED_ORDER: [SectionSpec; 5] = [
    SectionSpec::Points(PointCategory::DigitalInput),
    SectionSpec::Points(PointCategory::DigitalOutput),
    SectionSpec::Points(PointCategory::Register),
    SectionSpec::Groups(GroupKind::Input),
    SectionSpec::Groups(GroupKind::Output),
];

impl ManifestLayout {
    fn sections(self) -> &'static [SectionSpec] {
        match self {
            Self::Full => &FULL_ORDER,
            Self::Reduced => &REDUCED_ORDER,
        }
    }
}

/// Writes a manifest to disk.
///
/// This performs an atomic write using a temp file + rename pattern.
pub fn save_manifest(config: &AppConfiguration, layout: ManifestLayout, path: &Path) -> Result<()> {
    let manifest = generate_manifest(config, layout);
    atomic_write(path, &manifest)
}

/// File name used when a single app's manifest is exported.
pub fn manifest_file_name(app_name: &str) -> String {
    format!("{app_name}{MANIFEST_FILE_SUFFIX}")
}

/// Generates manifest text for one app.
///
/// Sections with nothing to write are omitted; the remaining sections are
/// separated by a blank line and the result carries no trailing whitespace.
pub fn generate_manifest(config: &AppConfiguration, layout: ManifestLayout) -> String {
    let sections: Vec<String> = layout
        .sections()
        .iter()
        .filter_map(|spec| match spec {
            SectionSpec::SystemVariables => generate_system_variables(&config.system_variables),
            SectionSpec::Files => generate_files(&config.files),
            SectionSpec::Points(category) => generate_point_section(config, *category, layout),
            SectionSpec::Groups(kind) => generate_group_section(config.groups(*kind), *kind),
        })
        .collect();

    sections.join("\n\n").trim().to_string()
}

/// Generates a flat point section, or `None` for an empty block.
fn generate_point_section(
    config: &AppConfiguration,
    category: PointCategory,
    layout: ManifestLayout,
) -> Option<String> {
    let table = config.table(category);
    let block = &table.block;
    let end = block.end_point()?;

    // The single-app exporter writes DO headers as `KEY:value` and omits RANGE
    let compact = layout == ManifestLayout::Reduced && category == PointCategory::DigitalOutput;
    let sep = if compact { ":" } else { ": " };
    let tag = category.tag();

    let mut output = String::new();
    output.push_str(&format!("[{tag}]\n"));

    if category.has_rack_slot() {
        output.push_str(&format!("RACK{sep}{}\n", block.rack.unwrap_or(0)));
        output.push_str(&format!("SLOT{sep}{}\n", block.slot.unwrap_or(0)));
    }

    output.push_str(&format!("START{sep}{}\n", block.start_point));

    if category.has_rack_slot() && !compact {
        output.push_str(&format!("RANGE: {} - {end}\n", block.start_point));
    }

    let spaced = layout == ManifestLayout::Reduced && category == PointCategory::DigitalInput;
    for address in block.addresses() {
        let label = table.label(address);
        let line = if !category.quotes_labels() {
            format!("{address},{label}\n")
        } else if spaced {
            format!("{address}, \"{label}\"\n")
        } else {
            format!("{address},\"{label}\"\n")
        };
        output.push_str(&line);
    }

    output.push_str(&format!("[/{tag}]"));
    Some(output)
}

/// Generates a GI/GO section: one self-contained block per entry.
fn generate_group_section(entries: &[GroupEntry], kind: GroupKind) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let tag = kind.tag();
    let mut output = format!("[{tag}]\n");

    for entry in entries {
        output.push_str(&format!("RACK: {}\n", entry.rack));
        output.push_str(&format!("SLOT: {}\n", entry.slot));
        output.push_str(&format!("START: {}\n", entry.start));
        output.push_str(&format!("LENGTH: {}\n", entry.length));
        output.push_str(&format!("RANGE: {0} - {0}\n", entry.number));
        output.push_str(&format!("{}, \"{}\"\n", entry.number, entry.name));
    }

    output.push_str(&format!("[/{tag}]"));
    Some(output)
}

fn generate_system_variables(variables: &[SystemVariable]) -> Option<String> {
    if variables.is_empty() {
        return None;
    }

    let mut output = String::from("[SETVAR]\n");
    for variable in variables {
        output.push_str(&format!("{} = {}\n", variable.key, variable.value));
    }
    output.push_str("[/SETVAR]");
    Some(output)
}

fn generate_files(files: &[FileEntry]) -> Option<String> {
    if files.is_empty() {
        return None;
    }

    let mut output = String::from("[FILES]\n");
    for file in files {
        let marker = if file.run { " RUN" } else { "" };
        output.push_str(&format!("{}{marker}\n", file.name));
    }
    output.push_str("[/FILES]");
    Some(output)
}

/// Writes content to a file atomically using temp file + rename.
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("dt.tmp");

    std::fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write to temporary file: {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::manifest::parse_manifest_str;

    fn empty_config() -> AppConfiguration {
        let mut config = AppConfiguration::default();
        for category in PointCategory::ALL {
            config.table_mut(category).block.size = 0;
        }
        config
    }

    #[test]
    fn test_reduced_di_section_exact() {
        let mut config = empty_config();
        config.digital_inputs.block.size = 3;
        config.digital_inputs.labels.insert(1, "A".to_string());
        config.digital_inputs.labels.insert(2, "B".to_string());
        config.digital_inputs.labels.insert(3, "C".to_string());

        let text = generate_manifest(&config, ManifestLayout::Reduced);
        assert_eq!(
            text,
            "[DI]\nRACK: 0\nSLOT: 0\nSTART: 1\nRANGE: 1 - 3\n1, \"A\"\n2, \"B\"\n3, \"C\"\n[/DI]"
        );
    }

    #[test]
    fn test_do_labels_are_unquoted() {
        let mut config = empty_config();
        config.digital_outputs.block.size = 2;
        config.digital_outputs.labels.insert(1, "Lamp".to_string());

        let reduced = generate_manifest(&config, ManifestLayout::Reduced);
        assert_eq!(reduced, "[DO]\nRACK:0\nSLOT:0\nSTART:1\n1,Lamp\n2,\n[/DO]");

        let full = generate_manifest(&config, ManifestLayout::Full);
        assert_eq!(
            full,
            "[DO]\nRACK: 0\nSLOT: 0\nSTART: 1\nRANGE: 1 - 2\n1,Lamp\n2,\n[/DO]"
        );
    }

    #[test]
    fn test_missing_labels_written_empty() {
        let mut config = empty_config();
        config.registers.block.size = 2;
        config.registers.block.start_point = 40;
        config.registers.labels.insert(41, "Speed".to_string());

        let text = generate_manifest(&config, ManifestLayout::Reduced);
        assert_eq!(text, "[Registers]\nSTART: 40\n40,\"\"\n41,\"Speed\"\n[/Registers]");
    }

    #[test]
    fn test_empty_blocks_are_omitted() {
        assert_eq!(generate_manifest(&empty_config(), ManifestLayout::Full), "");
        assert_eq!(generate_manifest(&empty_config(), ManifestLayout::Reduced), "");
    }

    #[test]
    fn test_group_section_repeats_headers() {
        let mut config = empty_config();
        config.group_inputs.push(GroupEntry {
            number: 1,
            name: "Feed".to_string(),
            rack: 2,
            slot: 3,
            start: 4,
            length: 8,
        });
        config.group_inputs.push(GroupEntry::new(2, "Drain"));

        let text = generate_manifest(&config, ManifestLayout::Reduced);
        assert_eq!(
            text,
            "[GI]\nRACK: 2\nSLOT: 3\nSTART: 4\nLENGTH: 8\nRANGE: 1 - 1\n1, \"Feed\"\n\
             RACK: 0\nSLOT: 0\nSTART: 0\nLENGTH: 0\nRANGE: 2 - 2\n2, \"Drain\"\n[/GI]"
        );
    }

    #[test]
    fn test_full_layout_section_order() {
        let mut config = AppConfiguration::default();
        config.system_variables.push(SystemVariable::new("$MODE", "AUTO"));
        config.files.push(FileEntry::new("setup.bat", true));
        config.group_inputs.push(GroupEntry::new(1, "Feed"));
        config.group_outputs.push(GroupEntry::new(2, "Valves"));

        let text = generate_manifest(&config, ManifestLayout::Full);
        let tags: Vec<&str> = text
            .lines()
            .filter(|line| line.starts_with('[') && !line.starts_with("[/"))
            .collect();

        assert_eq!(
            tags,
            vec![
                "[SETVAR]", "[FILES]", "[DI]", "[DO]", "[GI]", "[GO]", "[UI]", "[UO]", "[FLAGS]",
                "[Registers]"
            ]
        );
        assert!(text.contains("[SETVAR]\n$MODE = AUTO\n[/SETVAR]\n\n[FILES]\nsetup.bat RUN\n[/FILES]"));
    }

    #[test]
    fn test_reduced_layout_skips_extras() {
        let mut config = AppConfiguration::default();
        config.system_variables.push(SystemVariable::new("$MODE", "AUTO"));
        config.files.push(FileEntry::new("setup.bat", false));

        let text = generate_manifest(&config, ManifestLayout::Reduced);
        assert!(!text.contains("[SETVAR]"));
        assert!(!text.contains("[FILES]"));
        assert!(!text.contains("[UI]"));
        assert!(!text.contains("[FLAGS]"));
        assert!(text.starts_with("[DI]"));
        assert!(text.ends_with("[/Registers]"));
    }

    #[test]
    fn test_full_round_trip() {
        let mut config = AppConfiguration::default();
        config.digital_inputs.block.start_point = 5;
        config.digital_inputs.block.size = 2;
        config.digital_inputs.block.rack = Some(1);
        config.digital_inputs.labels.insert(5, "Start PB".to_string());
        config.digital_inputs.labels.insert(6, "Stop PB".to_string());
        config.digital_inputs.normalize_labels();
        for category in PointCategory::ALL {
            config.table_mut(category).normalize_labels();
        }
        config.group_outputs.push(GroupEntry {
            number: 3,
            name: "Valves".to_string(),
            rack: 1,
            slot: 1,
            start: 17,
            length: 8,
        });
        config.files.push(FileEntry::new("init.ls", true));
        config.system_variables.push(SystemVariable::new("$A", "1"));
        config.system_variables.push(SystemVariable::new("$A", "2"));

        let parsed = parse_manifest_str(&generate_manifest(&config, ManifestLayout::Full));
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("full".parse::<ManifestLayout>().unwrap(), ManifestLayout::Full);
        assert_eq!("Reduced".parse::<ManifestLayout>().unwrap(), ManifestLayout::Reduced);
        assert!("zip".parse::<ManifestLayout>().is_err());
        assert_eq!(manifest_file_name("Line1"), "Line1_manifest.dt");
    }
}
