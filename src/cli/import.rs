//! Import command for replacing one app from a manifest file.

use crate::cli::common::{load_config, open_service, CliError, CliResult};
use crate::models::PointCategory;
use clap::Args;
use std::path::PathBuf;

/// Replace an app's configuration with a `.dt` manifest file
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// Manifest file to import; nothing changes when omitted
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl ImportArgs {
    /// Execute the import command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;

        // The app must exist even when no file is given.
        service.app(&self.app)?;

        let imported = service
            .import_manifest(&self.app, self.file.as_deref())
            .map_err(|e| CliError::io(format!("Failed to import manifest: {e:#}")))?;

        match (imported, &self.file) {
            (Some(config), Some(path)) => {
                let points: u32 = PointCategory::ALL
                    .into_iter()
                    .map(|category| config.table(category).block.size)
                    .sum();
                println!(
                    "✓ Imported {} into '{}' ({points} points, {} groups)",
                    path.display(),
                    self.app,
                    config.group_inputs.len() + config.group_outputs.len()
                );
            }
            _ => println!("No manifest file selected; '{}' is unchanged.", self.app),
        }
        Ok(())
    }
}
