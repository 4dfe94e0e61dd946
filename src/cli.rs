use clap::Parser;

use crate::command::Command;

#[derive(Parser)]
#[command(name = "osgi-rename", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Whether any subcommand asked for debug logging.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Command::Transform(args) => args.verbose,
        }
    }
}
