use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Idle period used when neither the config file nor the CLI sets one.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 5000;

/// Prefetcher configuration loaded from `~/.config/dribble/config.toml`.
///
/// Handed to the scheduler by value at spawn time; it is never mutated
/// afterwards. To run with different settings, spawn a new scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DribbleConfig {
    /// Route field used to order targets (ascending). None = route order.
    pub priority_key: Option<String>,
    /// Quiet period with no foreground activity before the next prefetch step.
    pub idle_timeout_ms: u64,
}

impl Default for DribbleConfig {
    fn default() -> Self {
        Self {
            priority_key: None,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
        }
    }
}

/// Partial configuration. Fields left as None keep the current value on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub priority_key: Option<String>,
    #[serde(default)]
    pub idle_timeout_ms: Option<u64>,
}

impl DribbleConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Merge a partial update into this config and return the merged result.
    /// An empty update leaves everything as it was.
    pub fn merge(&mut self, update: ConfigUpdate) -> &Self {
        if let Some(key) = update.priority_key {
            self.priority_key = Some(key);
        }
        if let Some(ms) = update.idle_timeout_ms {
            self.idle_timeout_ms = ms;
        }
        self
    }

    /// Merge an untyped TOML value. Anything that is not a table is ignored.
    /// Known keys are applied one by one; a key with a value of the wrong type
    /// is skipped without affecting the others.
    pub fn merge_value(&mut self, value: toml::Value) -> &Self {
        let toml::Value::Table(table) = value else {
            tracing::debug!("ignoring non-table configuration value");
            return self;
        };
        let mut update = ConfigUpdate::default();
        for (key, value) in table {
            match (key.as_str(), value) {
                ("priority_key", toml::Value::String(s)) => update.priority_key = Some(s),
                ("idle_timeout_ms", toml::Value::Integer(ms)) if ms >= 0 => {
                    update.idle_timeout_ms = Some(ms as u64)
                }
                (key, value) => {
                    tracing::debug!(key, "ignoring configuration value {}", value);
                }
            }
        }
        self.merge(update)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dribble")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<DribbleConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: DribbleConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DribbleConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DribbleConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
