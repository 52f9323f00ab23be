//! planboard command-line front end.
//!
//! # Responsibility
//! - Resolve configuration (environment, then flags) and start logging.
//! - Route local commands through storage, auth and the app controller, and
//!   remote commands through the REST client.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;
mod local;
mod output;
mod remote;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    planboard_core::init_logging(&config.logging()).context("failed to start logging")?;
    info!(
        "event=cli_start module=cli status=ok command={} core_version={}",
        cli.command.name(),
        planboard_core::core_version()
    );

    match cli.command {
        Command::Remote(command) => remote::execute(command, &config),
        command => local::execute(command, &config, cli.lang.as_deref()),
    }
}
