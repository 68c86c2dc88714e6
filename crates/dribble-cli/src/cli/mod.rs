//! CLI for the dribble template prefetcher.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dribble_core::config::{self, ConfigUpdate, DribbleConfig};
use std::path::PathBuf;

use commands::{run_config, run_plan, run_prefetch};

/// Top-level CLI for the dribble prefetcher.
#[derive(Debug, Parser)]
#[command(name = "dribble")]
#[command(about = "dribble: prefetch route templates while the host is idle", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/dribble/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Per-invocation overrides merged over the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Route field to order templates by (ascending).
    #[arg(long, value_name = "FIELD")]
    pub priority_key: Option<String>,

    /// Quiet period in milliseconds before the next prefetch step.
    #[arg(long, value_name = "MS")]
    pub idle_timeout_ms: Option<u64>,
}

impl From<ConfigOverrides> for ConfigUpdate {
    fn from(o: ConfigOverrides) -> Self {
        ConfigUpdate {
            priority_key: o.priority_key,
            idle_timeout_ms: o.idle_timeout_ms,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Prefetch every template of a route table from a base URL.
    Prefetch {
        /// Route table (TOML, `[[route]]` entries with a `location`).
        #[arg(long, value_name = "FILE")]
        routes: PathBuf,

        /// Base URL that template locations are resolved against.
        #[arg(long, value_name = "URL")]
        base_url: String,

        /// Locations (one per line) to request as foreground traffic first.
        #[arg(long, value_name = "FILE")]
        foreground: Option<PathBuf>,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Show the order in which a route table's templates would be prefetched.
    Plan {
        /// Route table (TOML).
        #[arg(long, value_name = "FILE")]
        routes: PathBuf,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Print the effective configuration.
    Config {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let base = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", base);

        match cli.command {
            CliCommand::Prefetch {
                routes,
                base_url,
                foreground,
                overrides,
            } => {
                let cfg = effective(base, overrides);
                run_prefetch(cfg, &routes, &base_url, foreground.as_deref()).await?;
            }
            CliCommand::Plan { routes, overrides } => {
                run_plan(&effective(base, overrides), &routes)?;
            }
            CliCommand::Config { overrides } => run_config(&effective(base, overrides))?,
        }

        Ok(())
    }
}

/// Config file values with command-line overrides merged on top.
fn effective(mut base: DribbleConfig, overrides: ConfigOverrides) -> DribbleConfig {
    base.merge(overrides.into());
    base
}

#[cfg(test)]
mod tests;
