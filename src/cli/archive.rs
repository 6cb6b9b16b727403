//! Batch export and import of every app through a zip archive.

use crate::cli::common::{load_config, open_service, print_json, CliError, CliResult};
use crate::constants::ARCHIVE_FILE_NAME;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Export every app into one zip archive
#[derive(Debug, Clone, Args)]
pub struct ExportAllArgs {
    /// Output path (defaults to <export dir>/Apps_Export.zip)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Import every app from a zip archive, overwriting same-named apps
#[derive(Debug, Clone, Args)]
pub struct ImportAllArgs {
    /// Archive to import
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Import-all response
#[derive(Debug, Clone, Serialize)]
pub struct ImportAllResponse {
    /// Names of imported apps
    pub imported: Vec<String>,
    /// Names that overwrote an existing app
    pub replaced: Vec<String>,
    /// Skipped or superseded archive entries
    pub warnings: Vec<String>,
}

impl ExportAllArgs {
    /// Execute the export-all command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let service = open_service(&config)?;

        let app_count = service.load_collection()?.len();
        let bytes = service
            .export_all()
            .map_err(|e| CliError::io(format!("Failed to build archive: {e:#}")))?;

        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| config.export.output_dir.join(ARCHIVE_FILE_NAME));
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CliError::io(format!(
                    "Failed to create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        fs::write(&output_path, bytes)
            .map_err(|e| CliError::io(format!("Failed to write archive: {e}")))?;

        println!("✓ Exported {app_count} app(s) to: {}", output_path.display());
        Ok(())
    }
}

impl ImportAllArgs {
    /// Execute the import-all command
    pub fn execute(&self) -> CliResult<()> {
        let bytes = fs::read(&self.file).map_err(|e| {
            CliError::io(format!(
                "Failed to read archive {}: {e}",
                self.file.display()
            ))
        })?;

        let service = open_service(&load_config()?)?;
        let summary = service
            .import_all(&bytes)
            .map_err(|e| CliError::io(format!("Failed to import archive: {e:#}")))?;

        if self.json {
            return print_json(&ImportAllResponse {
                imported: summary.imported,
                replaced: summary.replaced,
                warnings: summary.warnings.iter().map(ToString::to_string).collect(),
            });
        }

        println!("✓ Imported {} app(s):", summary.imported.len());
        for name in &summary.imported {
            let marker = if summary.replaced.contains(name) {
                " (overwritten)"
            } else {
                ""
            };
            println!("  {name}{marker}");
        }

        if !summary.warnings.is_empty() {
            println!();
            println!("Skipped entries ({}):", summary.warnings.len());
            for warning in &summary.warnings {
                println!("  {warning}");
            }
        }
        Ok(())
    }
}
