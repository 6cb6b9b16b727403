//! Auxiliary file commands.

use crate::cli::common::{load_config, open_service, CliError, CliResult};
use crate::models::FileEntry;
use clap::{Args, Subcommand};

/// Manage the FILES list
#[derive(Debug, Clone, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum FileCommand {
    /// Append a file entry
    Add(FileAddArgs),
    /// Remove file entries by name
    Remove(FileRemoveArgs),
}

/// Append a file entry
#[derive(Debug, Clone, Args)]
pub struct FileAddArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// File name
    #[arg(long, value_name = "FILE")]
    pub name: String,

    /// Mark the file to run on load
    #[arg(long)]
    pub run: bool,
}

/// Remove file entries by name
#[derive(Debug, Clone, Args)]
pub struct FileRemoveArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// File name
    #[arg(long, value_name = "FILE")]
    pub name: String,
}

impl FileArgs {
    /// Execute the file command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            FileCommand::Add(args) => args.execute(),
            FileCommand::Remove(args) => args.execute(),
        }
    }
}

impl FileAddArgs {
    /// Execute the add command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;
        service.add_file(&self.app, FileEntry::new(self.name.trim(), self.run))?;
        println!("Added file '{}' to '{}'", self.name.trim(), self.app);
        Ok(())
    }
}

impl FileRemoveArgs {
    /// Execute the remove command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;
        let removed = service.remove_file(&self.app, &self.name)?;
        if removed == 0 {
            return Err(CliError::validation(format!(
                "No file '{}' in '{}'",
                self.name, self.app
            )));
        }
        println!("Removed file '{}' from '{}'", self.name, self.app);
        Ok(())
    }
}
