//! # gin-mkdata CLI
//!
//! This is the binary entry point for the `gin-mkdata` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the provisioning command.
//! - Turning library errors into a non-zero exit with a readable message.
//!
//! The provisioning logic lives in the `gin_mkdata` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
