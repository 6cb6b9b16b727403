//! System variable (SETVAR) commands.

use crate::cli::common::{load_config, open_service, CliResult};
use crate::models::SystemVariable;
use clap::{Args, Subcommand};

/// Manage SETVAR system variables
#[derive(Debug, Clone, Args)]
pub struct VarArgs {
    /// Variable subcommand
    #[command(subcommand)]
    pub command: VarCommand,
}

/// Variable subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum VarCommand {
    /// Append a variable (duplicate keys are kept)
    Add(VarAddArgs),
    /// Remove all variables
    Clear(VarClearArgs),
}

/// Append a variable
#[derive(Debug, Clone, Args)]
pub struct VarAddArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// Variable name
    #[arg(short, long, value_name = "KEY")]
    pub key: String,

    /// Variable value
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,
}

/// Remove all variables
#[derive(Debug, Clone, Args)]
pub struct VarClearArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,
}

impl VarArgs {
    /// Execute the var command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            VarCommand::Add(args) => args.execute(),
            VarCommand::Clear(args) => args.execute(),
        }
    }
}

impl VarAddArgs {
    /// Execute the add command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;
        let variable = SystemVariable::new(self.key.trim(), self.value.trim());
        service.add_variable(&self.app, variable)?;
        println!("Added {} = {} to '{}'", self.key.trim(), self.value.trim(), self.app);
        Ok(())
    }
}

impl VarClearArgs {
    /// Execute the clear command
    pub fn execute(&self) -> CliResult<()> {
        let service = open_service(&load_config()?)?;
        let removed = service.clear_variables(&self.app)?;
        println!("Cleared {removed} variable(s) from '{}'", self.app);
        Ok(())
    }
}
