//! Export command for writing one app's manifest.

use crate::cli::common::{load_config, open_service, parse_layout, CliError, CliResult};
use crate::parser::{manifest_file_name, save_manifest};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Export one app to a `.dt` manifest file
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// Output path (defaults to <export dir>/<app>_manifest.dt)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Section layout (reduced or full; defaults to the configured layout)
    #[arg(long, value_name = "LAYOUT")]
    pub layout: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let layout = match &self.layout {
            Some(value) => parse_layout(value)?,
            None => config.export.layout,
        };

        let service = open_service(&config)?;
        let app = service.app(&self.app)?;

        let output_path = self.get_output_path(&config.export.output_dir);
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CliError::io(format!(
                    "Failed to create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        save_manifest(&app, layout, &output_path)
            .map_err(|e| CliError::io(format!("Failed to write manifest: {e:#}")))?;

        println!("✓ Exported '{}' ({layout}) to: {}", self.app, output_path.display());
        Ok(())
    }

    /// Get the output file path (either user-specified or derived from the app name)
    fn get_output_path(&self, export_dir: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| export_dir.join(manifest_file_name(&self.app)))
    }
}
