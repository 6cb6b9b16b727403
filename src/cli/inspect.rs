//! Inspect a manifest file without touching the store.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::models::{AppConfiguration, GroupEntry, GroupKind, PointCategory, PointTable};
use crate::parser::parse_manifest_file;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Parse a manifest file and print its contents
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Path to a `.dt` manifest file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Point block summary for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct BlockSummary {
    /// Category short name
    pub category: &'static str,
    /// Section tag
    pub tag: &'static str,
    /// Number of points
    pub size: u32,
    /// First address
    pub start_point: u32,
    /// Last address, absent for an empty block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_point: Option<u32>,
    /// Rack, when the category has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack: Option<u32>,
    /// Slot, when the category has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<u32>,
    /// Number of non-empty labels
    pub labeled: usize,
}

impl BlockSummary {
    /// Summarizes one category's table.
    pub fn new(category: PointCategory, table: &PointTable) -> Self {
        Self {
            category: category.short_name(),
            tag: category.tag(),
            size: table.block.size,
            start_point: table.block.start_point,
            end_point: table.block.end_point(),
            rack: table.block.rack,
            slot: table.block.slot,
            labeled: table.labels.values().filter(|label| !label.is_empty()).count(),
        }
    }
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> CliResult<()> {
        let config = parse_manifest_file(&self.file).map_err(|e| {
            CliError::io(format!(
                "Failed to read manifest {}: {e:#}",
                self.file.display()
            ))
        })?;

        if self.json {
            print_json(&config)
        } else {
            print_configuration(&config);
            Ok(())
        }
    }
}

/// Prints a human-readable overview of one configuration.
pub fn print_configuration(config: &AppConfiguration) {
    println!("Points:");
    for category in PointCategory::ALL {
        let summary = BlockSummary::new(category, config.table(category));
        let range = summary
            .end_point
            .map_or_else(|| "empty".to_string(), |end| format!("{} - {end}", summary.start_point));
        let addressing = match (summary.rack, summary.slot) {
            (Some(rack), Some(slot)) => format!("  rack {rack} slot {slot}"),
            _ => String::new(),
        };
        println!(
            "  {:<10} size {:>3}  range {range}{addressing}  ({} labeled)",
            summary.tag, summary.size, summary.labeled
        );

        for (address, label) in &config.table(category).labels {
            if !label.is_empty() {
                println!("    {address:>5}  {label}");
            }
        }
    }

    for kind in [GroupKind::Input, GroupKind::Output] {
        let groups = config.groups(kind);
        if !groups.is_empty() {
            println!();
            println!("{} groups:", kind.tag());
            for group in groups {
                print_group(group);
            }
        }
    }

    if !config.files.is_empty() {
        println!();
        println!("Files:");
        for file in &config.files {
            let marker = if file.run { " (run)" } else { "" };
            println!("  {}{marker}", file.name);
        }
    }

    if !config.system_variables.is_empty() {
        println!();
        println!("System variables:");
        for variable in &config.system_variables {
            println!("  {} = {}", variable.key, variable.value);
        }
    }
}

fn print_group(group: &GroupEntry) {
    println!(
        "  {:>3}  {:<20} rack {} slot {} start {} length {}",
        group.number, group.name, group.rack, group.slot, group.start, group.length
    );
}
