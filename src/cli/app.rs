//! App management commands.

use crate::cli::common::{load_config, open_service, print_json, CliResult};
use crate::cli::inspect::{print_configuration, BlockSummary};
use crate::models::{AppConfiguration, PointCategory};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Create, delete, list and show apps
#[derive(Debug, Clone, Args)]
pub struct AppArgs {
    /// App subcommand
    #[command(subcommand)]
    pub command: AppCommand,
}

/// App subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum AppCommand {
    /// Create a new app with default configuration
    New(NewArgs),
    /// Delete an app
    Delete(DeleteArgs),
    /// List all apps
    List(ListArgs),
    /// Show one app's configuration
    Show(ShowArgs),
}

/// Create a new app
#[derive(Debug, Clone, Args)]
pub struct NewArgs {
    /// App name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Delete an app
#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    /// App name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// List all apps
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show one app
#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// App name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// App list response
#[derive(Debug, Clone, Serialize)]
pub struct AppListResponse {
    /// Apps in name order
    pub apps: Vec<AppListEntry>,
    /// Total number of apps
    pub count: usize,
}

/// One app in the list response
#[derive(Debug, Clone, Serialize)]
pub struct AppListEntry {
    /// App name
    pub name: String,
    /// Per-category block summaries
    pub blocks: Vec<BlockSummary>,
    /// Number of group inputs
    pub group_inputs: usize,
    /// Number of group outputs
    pub group_outputs: usize,
}

impl AppListEntry {
    fn new(name: &str, config: &AppConfiguration) -> Self {
        Self {
            name: name.to_string(),
            blocks: PointCategory::ALL
                .into_iter()
                .map(|category| BlockSummary::new(category, config.table(category)))
                .collect(),
            group_inputs: config.group_inputs.len(),
            group_outputs: config.group_outputs.len(),
        }
    }
}

/// App show response
#[derive(Debug, Clone, Serialize)]
pub struct AppShowResponse {
    /// App name
    pub name: String,
    /// Full configuration
    pub configuration: AppConfiguration,
}

impl AppArgs {
    /// Execute the app command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            AppCommand::New(args) => args.execute(),
            AppCommand::Delete(args) => args.execute(),
            AppCommand::List(args) => args.execute(),
            AppCommand::Show(args) => args.execute(),
        }
    }
}

impl NewArgs {
    /// Execute the new command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;
        let name = service.create_app(&self.name)?;
        println!("Created app '{name}'");
        Ok(())
    }
}

impl DeleteArgs {
    /// Execute the delete command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;
        service.delete_app(&self.name)?;
        println!("Deleted app '{}'", self.name);
        Ok(())
    }
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;
        let apps = service.load_collection()?;

        if self.json {
            let entries: Vec<AppListEntry> = apps
                .iter()
                .map(|(name, config)| AppListEntry::new(name, config))
                .collect();
            return print_json(&AppListResponse {
                count: entries.len(),
                apps: entries,
            });
        }

        if apps.is_empty() {
            println!("No apps found.");
            return Ok(());
        }

        println!("Apps ({}):", apps.len());
        for name in apps.names() {
            println!("  {name}");
        }
        Ok(())
    }
}

impl ShowArgs {
    /// Execute the show command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;
        let configuration = service.app(&self.name)?;

        if self.json {
            return print_json(&AppShowResponse {
                name: self.name.clone(),
                configuration,
            });
        }

        println!("App: {}", self.name);
        println!();
        print_configuration(&configuration);
        Ok(())
    }
}
