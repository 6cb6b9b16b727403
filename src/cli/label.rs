//! Point label commands.

use crate::cli::common::{load_config, open_service, parse_category, CliResult};
use clap::{Args, Subcommand};

/// Edit point labels
#[derive(Debug, Clone, Args)]
pub struct LabelArgs {
    /// Label subcommand
    #[command(subcommand)]
    pub command: LabelCommand,
}

/// Label subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum LabelCommand {
    /// Set the label of one point
    Set(LabelSetArgs),
}

/// Set the label of one point
#[derive(Debug, Clone, Args)]
pub struct LabelSetArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// Point category (di, do, r, flags, ui, uo)
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: String,

    /// Point address
    #[arg(short, long, value_name = "N")]
    pub point: u32,

    /// Label text (may be empty)
    #[arg(short, long, value_name = "TEXT", allow_hyphen_values = true)]
    pub label: String,
}

impl LabelArgs {
    /// Execute the label command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            LabelCommand::Set(args) => args.execute(),
        }
    }
}

impl LabelSetArgs {
    /// Execute the set command
    pub fn execute(&self) -> CliResult<()> {
        let category = parse_category(&self.category)?;
        let service = open_service(&load_config()?)?;
        service.set_label(&self.app, category, self.point, &self.label)?;
        println!(
            "Set {} {} of '{}' to \"{}\"",
            category.tag(),
            self.point,
            self.app,
            self.label
        );
        Ok(())
    }
}
