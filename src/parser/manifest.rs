//! Manifest (`.dt`) parsing.
//!
//! The reader is permissive: unknown sections are ignored, unparseable lines
//! are skipped, and every field missing from the text keeps its default. The
//! only failures are at the file level (missing or unreadable input).

use crate::models::{
    AppConfiguration, FileEntry, GroupEntry, GroupKind, LabelMap, PointCategory, PointTable,
    SizeRule, SystemVariable,
};
use crate::parser::sections::split_sections;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// `<int>,"<text>"`, `<int>, "<text>"` or `<int>,<text>`.
static LABEL_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(\d+),\s*"?(.*?)"?$"#).expect("label line regex is valid"));

/// `KEY: value` or `KEY:value`.
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(RACK|SLOT|START|LENGTH|RANGE):\s*(.*)$").expect("header regex is valid")
});

/// `<a> - <b>` as written after `RANGE:`.
static RANGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*-\s*(\d+)").expect("range regex is valid"));

/// `<key> = <value>`, whitespace around `=` optional.
static SETVAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=]+)=\s*(.*)$").expect("setvar regex is valid"));

/// Header keys recognized inside point and group sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKey {
    Rack,
    Slot,
    Start,
    Length,
    Range,
}

/// Parses a manifest file from disk.
///
/// # Errors
///
/// Returns errors for:
/// - File not found
/// - Path is not a file
/// - File is not valid UTF-8 text
pub fn parse_manifest_file(path: &Path) -> Result<AppConfiguration> {
    if !path.exists() {
        anyhow::bail!("Manifest file not found: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("Path is not a file: {}", path.display());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;

    Ok(parse_manifest_str(&content))
}

/// Parses manifest text into a complete configuration.
///
/// Sections may appear in any order; both the full and the reduced export
/// layouts are accepted.
pub fn parse_manifest_str(content: &str) -> AppConfiguration {
    let sections = split_sections(content);
    let mut config = AppConfiguration::default();

    if let Some(body) = sections.get("SETVAR") {
        config.system_variables = parse_system_variables(body);
    }

    if let Some(body) = sections.get("FILES") {
        config.files = parse_files(body);
    }

    for category in PointCategory::ALL {
        if let Some(body) = sections.first_of(category.input_tags()) {
            apply_point_section(config.table_mut(category), category, body);
        }
    }

    for kind in [GroupKind::Input, GroupKind::Output] {
        if let Some(body) = sections.get(kind.tag()) {
            *config.groups_mut(kind) = parse_group_section(body);
        }
    }

    tracing::debug!(sections = ?sections.names(), "Parsed manifest");

    config
}

/// Non-blank, trimmed lines of a section body.
fn body_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Splits a header line into its key and raw value.
fn parse_header(line: &str) -> Option<(HeaderKey, &str)> {
    let captures = HEADER_REGEX.captures(line)?;
    let key = match &captures[1] {
        "RACK" => HeaderKey::Rack,
        "SLOT" => HeaderKey::Slot,
        "START" => HeaderKey::Start,
        "LENGTH" => HeaderKey::Length,
        _ => HeaderKey::Range,
    };
    Some((key, captures.get(2)?.as_str().trim()))
}

/// Leading integer of a header value.
fn header_number(value: &str) -> Option<u32> {
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..digits_end].parse().ok()
}

/// Parses a label line into its address and label.
fn parse_label_line(line: &str) -> Option<(u32, String)> {
    let captures = LABEL_LINE_REGEX.captures(line)?;
    let address = captures[1].parse().ok()?;
    Some((address, captures[2].to_string()))
}

/// Replaces a point table's block fields and labels from a section body.
///
/// Headers take their first occurrence. Size is inferred from the labels
/// according to the category's [`SizeRule`]; a `RANGE:` header never
/// overrides it.
fn apply_point_section(table: &mut PointTable, category: PointCategory, body: &str) {
    let mut labels = LabelMap::new();
    let mut rack = None;
    let mut slot = None;
    let mut start = None;
    let mut range = None;

    for line in body_lines(body) {
        if let Some((key, value)) = parse_header(line) {
            match key {
                HeaderKey::Rack => rack = rack.or_else(|| header_number(value)),
                HeaderKey::Slot => slot = slot.or_else(|| header_number(value)),
                HeaderKey::Start => start = start.or_else(|| header_number(value)),
                HeaderKey::Range => range = range.or_else(|| parse_range(value)),
                HeaderKey::Length => {}
            }
            continue;
        }

        if let Some((address, label)) = parse_label_line(line) {
            labels.insert(address, label);
        }
    }

    let size = match category.size_rule() {
        SizeRule::LabelCount => u32::try_from(labels.len()).unwrap_or(u32::MAX),
        SizeRule::MaxAddress => labels.last_key_value().map_or(0, |(address, _)| *address),
    };

    if let Some((first, last)) = range {
        let declared = last.saturating_sub(first).saturating_add(1);
        if declared != size {
            tracing::debug!(
                %category,
                declared,
                inferred = size,
                "RANGE header disagrees with parsed labels; keeping inferred size"
            );
        }
    }

    if category.has_rack_slot() {
        if rack.is_some() {
            table.block.rack = rack;
        }
        if slot.is_some() {
            table.block.slot = slot;
        }
    }
    if let Some(start) = start {
        table.block.start_point = start;
    }
    table.block.size = size;
    table.labels = labels;
}

/// Parses `RANGE:` values of the form `a - b`.
fn parse_range(value: &str) -> Option<(u32, u32)> {
    let captures = RANGE_REGEX.captures(value)?;
    Some((captures[1].parse().ok()?, captures[2].parse().ok()?))
}

/// Parses a GI/GO section body.
///
/// Header lines fill a running accumulator; each `<int>, "<name>"` line
/// completes the current entry and starts a fresh one. Headers after the
/// last name line are dropped.
fn parse_group_section(body: &str) -> Vec<GroupEntry> {
    let mut entries = Vec::new();
    let mut current = GroupEntry::default();

    for line in body_lines(body) {
        if let Some((key, value)) = parse_header(line) {
            if let Some(number) = header_number(value) {
                match key {
                    HeaderKey::Rack => current.rack = number,
                    HeaderKey::Slot => current.slot = number,
                    HeaderKey::Start => current.start = number,
                    HeaderKey::Length => current.length = number,
                    HeaderKey::Range => {}
                }
            }
            continue;
        }

        if let Some((number, name)) = parse_label_line(line) {
            current.number = number;
            current.name = name;
            entries.push(std::mem::take(&mut current));
        }
    }

    entries
}

/// Parses SETVAR lines, keeping order and duplicate keys.
fn parse_system_variables(body: &str) -> Vec<SystemVariable> {
    body_lines(body)
        .filter_map(|line| {
            let captures = SETVAR_REGEX.captures(line)?;
            Some(SystemVariable::new(captures[1].trim(), captures[2].trim()))
        })
        .collect()
}

/// Parses FILES lines: `<name>` or `<name> RUN`.
fn parse_files(body: &str) -> Vec<FileEntry> {
    body_lines(body)
        .map(|line| {
            let run = line.contains("RUN");
            let name = line.replacen(" RUN", "", 1).trim().to_string();
            FileEntry::new(name, run)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_line_quoting_styles() {
        assert_eq!(parse_label_line("1,\"Pump\""), Some((1, "Pump".to_string())));
        assert_eq!(parse_label_line("2, \"Fan\""), Some((2, "Fan".to_string())));
        assert_eq!(parse_label_line("3,Lamp"), Some((3, "Lamp".to_string())));
        assert_eq!(parse_label_line("4,\"\""), Some((4, String::new())));
        assert_eq!(parse_label_line("5,"), Some((5, String::new())));
        assert_eq!(parse_label_line("x,\"nope\""), None);
        assert_eq!(parse_label_line("RACK: 1"), None);
    }

    #[test]
    fn test_parse_header_spacing() {
        assert_eq!(parse_header("RACK: 2"), Some((HeaderKey::Rack, "2")));
        assert_eq!(parse_header("RACK:2"), Some((HeaderKey::Rack, "2")));
        assert_eq!(parse_header("LENGTH: 8"), Some((HeaderKey::Length, "8")));
        assert_eq!(parse_header("rack: 2"), None);
        assert_eq!(header_number("12abc"), Some(12));
        assert_eq!(header_number("abc"), None);
    }

    #[test]
    fn test_di_size_is_label_count() {
        let config = parse_manifest_str("[DI]\nSTART: 5\n5,\"a\"\n6,\"b\"\n8,\"c\"\n[/DI]");
        assert_eq!(config.digital_inputs.block.size, 3);
        assert_eq!(config.digital_inputs.block.start_point, 5);
        assert_eq!(config.digital_inputs.label(8), "c");
    }

    #[test]
    fn test_register_size_is_max_address() {
        let config = parse_manifest_str("[Registers]\nSTART: 1\n1,\"a\"\n2,\"b\"\n10,\"c\"\n[/Registers]");
        assert_eq!(config.registers.block.size, 10);
        assert_eq!(config.registers.labels.len(), 3);
    }

    #[test]
    fn test_r_tag_is_register_alias() {
        let config = parse_manifest_str("[R]\n4,\"a\"\n[/R]");
        assert_eq!(config.registers.block.size, 4);
        assert_eq!(config.registers.label(4), "a");
    }

    #[test]
    fn test_range_header_does_not_override_count() {
        let config = parse_manifest_str("[DO]\nRACK:1\nSLOT:2\nSTART:1\nRANGE: 1 - 16\n1,A\n2,B\n[/DO]");
        let block = &config.digital_outputs.block;
        assert_eq!(block.size, 2);
        assert_eq!(block.rack, Some(1));
        assert_eq!(block.slot, Some(2));
    }

    #[test]
    fn test_first_header_occurrence_wins() {
        let config = parse_manifest_str("[UI]\nSTART: 3\nSTART: 9\n3,\"a\"\n[/UI]");
        assert_eq!(config.user_inputs.block.start_point, 3);
    }

    #[test]
    fn test_missing_sections_keep_defaults() {
        let config = parse_manifest_str("[FLAGS]\nSTART: 7\n7,\"f\"\n[/FLAGS]");
        assert_eq!(config.flags.block.size, 1);
        assert_eq!(config.flags.block.start_point, 7);
        assert_eq!(config.flags.block.rack, None);

        let defaults = AppConfiguration::default();
        assert_eq!(config.digital_inputs, defaults.digital_inputs);
        assert_eq!(config.registers, defaults.registers);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let config = parse_manifest_str("[DI]\nRACK: x\ngarbage\n1,\"ok\"\n-3,\"neg\"\n[/DI]");
        assert_eq!(config.digital_inputs.block.size, 1);
        assert_eq!(config.digital_inputs.block.rack, Some(0));
    }

    #[test]
    fn test_group_accumulator() {
        let body = "RACK: 1\nSLOT: 2\nSTART: 3\nLENGTH: 4\nRANGE: 7 - 7\n7, \"Feed\"\n\
                    LENGTH: 2\n8, \"Drain\"\nRACK: 9";
        let entries = parse_group_section(body);

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            GroupEntry {
                number: 7,
                name: "Feed".to_string(),
                rack: 1,
                slot: 2,
                start: 3,
                length: 4,
            }
        );
        // Accumulator resets after each entry
        assert_eq!(entries[1].rack, 0);
        assert_eq!(entries[1].length, 2);
        assert_eq!(entries[1].name, "Drain");
    }

    #[test]
    fn test_system_variables_keep_duplicates() {
        let vars = parse_system_variables("$MODE = AUTO\n$SPEED=10\n$MODE =MANUAL\nno equals");
        assert_eq!(
            vars,
            vec![
                SystemVariable::new("$MODE", "AUTO"),
                SystemVariable::new("$SPEED", "10"),
                SystemVariable::new("$MODE", "MANUAL"),
            ]
        );
    }

    #[test]
    fn test_files_run_marker() {
        let files = parse_files("setup.bat RUN\nreadme.txt\n\n");
        assert_eq!(
            files,
            vec![
                FileEntry::new("setup.bat", true),
                FileEntry::new("readme.txt", false),
            ]
        );
    }

    #[test]
    fn test_files_run_marker_matches_substring() {
        use crate::parser::manifest_gen::{generate_manifest, ManifestLayout};

        // Any line containing RUN is marked; a name like RUNME.bat is not
        // distinguishable from a RUN marker.
        let files = parse_files("RUNME.bat\n");
        assert_eq!(files, vec![FileEntry::new("RUNME.bat", true)]);

        let written = generate_manifest(
            &AppConfiguration {
                files: vec![FileEntry::new("RUNME.bat", false)],
                ..AppConfiguration::default()
            },
            ManifestLayout::Full,
        );
        let reparsed = parse_manifest_str(&written);
        assert_eq!(reparsed.files, vec![FileEntry::new("RUNME.bat", true)]);
    }

    #[test]
    fn test_crlf_input() {
        let config = parse_manifest_str("[DI]\r\nSTART: 2\r\n2,\"a\"\r\n3,\"b\"\r\n[/DI]\r\n");
        assert_eq!(config.digital_inputs.block.start_point, 2);
        assert_eq!(config.digital_inputs.label(3), "b");
    }

    #[test]
    fn test_parse_manifest_file_missing() {
        let err = parse_manifest_file(Path::new("/definitely/not/here.dt")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
