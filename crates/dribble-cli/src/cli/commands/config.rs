//! `dribble config` – print the effective configuration as TOML.

use anyhow::Result;
use dribble_core::config::DribbleConfig;

pub fn run_config(cfg: &DribbleConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
