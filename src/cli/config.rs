//! Configuration management CLI commands.

use crate::cli::common::{parse_layout, print_json, CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug, Clone)]
pub struct ConfigSetArgs {
    /// App store directory
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Directory for exported manifests and archives
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Default single-app export layout (reduced or full)
    #[arg(long, value_name = "LAYOUT")]
    layout: Option<String>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    config_file: String,
    paths: PathsOutput,
    export: ExportOutput,
}

#[derive(Serialize, Debug)]
struct PathsOutput {
    store_dir: String,
}

#[derive(Serialize, Debug)]
struct ExportOutput {
    output_dir: String,
    layout: String,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;
        let output = ConfigOutput::new(&config)?;

        if self.json {
            print_json(&output)
        } else {
            output_human_readable(&output);
            Ok(())
        }
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.store_dir.is_none() && self.export_dir.is_none() && self.layout.is_none() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --store-dir, --export-dir, or --layout",
            ));
        }

        let mut config = Config::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable configuration: {e:#}");
            Config::default()
        });

        if let Some(path) = &self.store_dir {
            if path.is_file() {
                return Err(CliError::validation(format!(
                    "Store directory path points to a file: {}",
                    path.display()
                )));
            }
            config.paths.store_dir = Some(path.clone());
        }

        if let Some(path) = &self.export_dir {
            std::fs::create_dir_all(path).map_err(|e| {
                CliError::io(format!(
                    "Failed to create export directory {}: {e}",
                    path.display()
                ))
            })?;
            config.export.output_dir.clone_from(path);
        }

        if let Some(layout) = &self.layout {
            config.export.layout = parse_layout(layout)?;
        }

        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");
        Ok(())
    }
}

impl ConfigOutput {
    fn new(config: &Config) -> CliResult<Self> {
        let config_file = Config::config_file_path()
            .map_err(|e| CliError::io(format!("Failed to resolve config path: {e:#}")))?;
        let store_dir = config
            .store_dir()
            .map_err(|e| CliError::io(format!("Failed to resolve store directory: {e:#}")))?;

        Ok(Self {
            config_file: config_file.to_string_lossy().to_string(),
            paths: PathsOutput {
                store_dir: store_dir.to_string_lossy().to_string(),
            },
            export: ExportOutput {
                output_dir: config.export.output_dir.to_string_lossy().to_string(),
                layout: config.export.layout.to_string(),
            },
        })
    }
}

/// Output configuration in human-readable format
fn output_human_readable(output: &ConfigOutput) {
    println!("Configuration ({})", output.config_file);
    println!();
    println!("Paths:");
    println!("  Store directory:  {}", output.paths.store_dir);
    println!();
    println!("Export:");
    println!("  Output directory: {}", output.export.output_dir);
    println!("  Layout:           {}", output.export.layout);
}
