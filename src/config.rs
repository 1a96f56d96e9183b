use crate::export::check_file_name;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    #[serde(default = "default_file_name")]
    pub default_file_name: String,

    #[serde(default)]
    pub coordinate_precision: Option<usize>,

    #[serde(default = "default_replay_interval_ms")]
    pub replay_interval_ms: u64,

    #[serde(default = "default_feature_name")]
    pub feature_name: String,

    #[serde(default = "default_echo_status")]
    pub echo_status: bool,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_name() -> String {
    "coordinates".to_string()
}

fn default_replay_interval_ms() -> u64 {
    5
}

fn default_feature_name() -> String {
    "marker".to_string()
}

fn default_echo_status() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            default_file_name: default_file_name(),
            coordinate_precision: None,
            replay_interval_ms: default_replay_interval_ms(),
            feature_name: default_feature_name(),
            echo_status: default_echo_status(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location
    /// (~/.config/trail-recorder/config.json) when none is given.
    ///
    /// A missing file is replaced by a freshly written default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save(&config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("trail-recorder").join("config.json"))
    }

    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let name = &self.default_file_name;
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("default_file_name cannot be empty"));
        }

        check_file_name(&format!("{}.json", name))
            .context("default_file_name must be a plain file name")?;

        if self.replay_interval_ms == 0 {
            return Err(anyhow::anyhow!("replay_interval_ms must be greater than 0"));
        }

        if self.feature_name.is_empty() {
            return Err(anyhow::anyhow!("feature_name cannot be empty"));
        }

        Ok(())
    }
}
