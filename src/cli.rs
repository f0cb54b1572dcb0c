//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Git Source Cache - Install git dependencies as pinned, cached snapshots
#[derive(Parser, Debug)]
#[command(name = "git-source-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install one git package and print its snapshot directory
    Install(commands::install::InstallArgs),

    /// Pin a git package to the commit its ref currently points at
    Resolve(commands::resolve::ResolveArgs),

    /// Install every dependency in a manifest and write the lock file
    Sync(commands::sync::SyncArgs),

    /// Inspect the package cache
    Cache(commands::cache::CacheArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Install(args) => commands::install::execute(args),
            Commands::Resolve(args) => commands::resolve::execute(args),
            Commands::Sync(args) => commands::sync::execute(args),
            Commands::Cache(args) => commands::cache::execute(args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
