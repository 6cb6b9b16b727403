//! Group input/output commands.

use crate::cli::common::{load_config, open_service, parse_group_kind, CliError, CliResult};
use crate::models::GroupEntry;
use clap::{Args, Subcommand};

/// Manage group inputs (GI) and group outputs (GO)
#[derive(Debug, Clone, Args)]
pub struct GroupArgs {
    /// Group subcommand
    #[command(subcommand)]
    pub command: GroupCommand,
}

/// Group subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum GroupCommand {
    /// Append a group entry
    Add(GroupAddArgs),
    /// Remove group entries by number
    Remove(GroupRemoveArgs),
}

/// Append a group entry
#[derive(Debug, Clone, Args)]
pub struct GroupAddArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// Group kind (gi or go)
    #[arg(short, long, value_name = "KIND")]
    pub kind: String,

    /// Group number
    #[arg(short, long, value_name = "N")]
    pub number: u32,

    /// Group name
    #[arg(long, value_name = "TEXT")]
    pub name: String,

    /// Physical rack
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub rack: u32,

    /// Physical slot
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub slot: u32,

    /// First point of the group
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub start: u32,

    /// Number of points in the group
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub length: u32,
}

/// Remove group entries by number
#[derive(Debug, Clone, Args)]
pub struct GroupRemoveArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// Group kind (gi or go)
    #[arg(short, long, value_name = "KIND")]
    pub kind: String,

    /// Group number
    #[arg(short, long, value_name = "N")]
    pub number: u32,
}

impl GroupArgs {
    /// Execute the group command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            GroupCommand::Add(args) => args.execute(),
            GroupCommand::Remove(args) => args.execute(),
        }
    }
}

impl GroupAddArgs {
    /// Execute the add command
    pub fn execute(&self) -> CliResult<()> {
        let kind = parse_group_kind(&self.kind)?;
        let entry = GroupEntry {
            number: self.number,
            name: self.name.clone(),
            rack: self.rack,
            slot: self.slot,
            start: self.start,
            length: self.length,
        };

        let service = open_service(&load_config()?)?;
        service.add_group(&self.app, kind, entry)?;
        println!("Added {} {} to '{}'", kind.tag(), self.number, self.app);
        Ok(())
    }
}

impl GroupRemoveArgs {
    /// Execute the remove command
    pub fn execute(&self) -> CliResult<()> {
        let kind = parse_group_kind(&self.kind)?;
        let service = open_service(&load_config()?)?;
        let removed = service.remove_group(&self.app, kind, self.number)?;

        if removed == 0 {
            return Err(CliError::validation(format!(
                "No {} with number {} in '{}'",
                kind.tag(),
                self.number,
                self.app
            )));
        }

        println!("Removed {} {} from '{}'", kind.tag(), self.number, self.app);
        Ok(())
    }
}
