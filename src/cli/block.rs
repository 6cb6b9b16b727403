//! Point block commands.

use crate::cli::common::{load_config, open_service, parse_category, CliError, CliResult};
use crate::services::BlockUpdate;
use clap::{Args, Subcommand};

/// Resize and re-address point blocks
#[derive(Debug, Clone, Args)]
pub struct BlockArgs {
    /// Block subcommand
    #[command(subcommand)]
    pub command: BlockCommand,
}

/// Block subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum BlockCommand {
    /// Change size, start point, rack or slot of a block
    Set(BlockSetArgs),
}

/// Change a point block
#[derive(Debug, Clone, Args)]
pub struct BlockSetArgs {
    /// App name
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// Point category (di, do, r, flags, ui, uo)
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: String,

    /// Number of points
    #[arg(long, value_name = "N")]
    pub size: Option<u32>,

    /// First point address
    #[arg(long, value_name = "N")]
    pub start: Option<u32>,

    /// Physical rack (di, do, ui, uo only)
    #[arg(long, value_name = "N")]
    pub rack: Option<u32>,

    /// Physical slot (di, do, ui, uo only)
    #[arg(long, value_name = "N")]
    pub slot: Option<u32>,
}

impl BlockArgs {
    /// Execute the block command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            BlockCommand::Set(args) => args.execute(),
        }
    }
}

impl BlockSetArgs {
    /// Execute the set command
    pub fn execute(&self) -> CliResult<()> {
        let category = parse_category(&self.category)?;
        let update = BlockUpdate {
            size: self.size,
            start_point: self.start,
            rack: self.rack,
            slot: self.slot,
        };

        if update == BlockUpdate::default() {
            return Err(CliError::validation(
                "At least one block option must be specified: --size, --start, --rack, or --slot",
            ));
        }

        let service = open_service(&load_config()?)?;
        let block = service.set_block(&self.app, category, update)?;

        let range = block
            .end_point()
            .map_or_else(|| "empty".to_string(), |end| format!("{} - {end}", block.start_point));
        println!(
            "Updated {} block of '{}': size {}, range {range}",
            category.tag(),
            self.app,
            block.size
        );
        Ok(())
    }
}
