//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::Parser;
use gin_mkdata::defaults::DEFAULT_LOG_LEVEL;

use crate::commands;

/// gin-mkdata - Provision sample users and repositories for a gin store
#[derive(Parser, Debug)]
#[command(name = "gin-mkdata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    provision: commands::provision::ProvisionArgs,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        commands::provision::execute(self.provision)
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // Ignore a second initialisation; the first logger stays in place.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
