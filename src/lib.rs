#![doc = include_str!("../README.md")]

pub mod cli;
pub mod command;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod rewrite;
pub mod rules;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use command::Command;

    let cli = cli::Cli::parse();

    let level = if cli.verbose() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Transform(args) => command::transform::execute(args),
    }
}
