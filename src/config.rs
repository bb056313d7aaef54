use anyhow::{anyhow, Result};
use log::{info, warn, LevelFilter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::delivery::DEFAULT_REPLY_TEXT;
use crate::view::DEFAULT_BREAKPOINT;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub breakpoint_columns: u16,
    pub reply_delay_ms: u64,
    pub typing_idle_ms: u64,
    pub reply_text: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            breakpoint_columns: DEFAULT_BREAKPOINT,
            reply_delay_ms: 1000,
            typing_idle_ms: 2000,
            reply_text: DEFAULT_REPLY_TEXT.to_string(),
            log_level: "debug".to_string(),
        }
    }
}

impl Config {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn typing_idle(&self) -> Duration {
        Duration::from_millis(self.typing_idle_ms)
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using debug", self.log_level);
            LevelFilter::Debug
        })
    }
}

static CONFIG_PATH_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

/// Use a specific config file instead of the one in the user's config dir.
/// Only the first call has an effect.
pub fn set_config_path_override(path: PathBuf) {
    if CONFIG_PATH_OVERRIDE.set(path).is_err() {
        warn!("Config path override already set");
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("parley");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

fn get_config_path() -> Result<PathBuf> {
    if let Some(path) = CONFIG_PATH_OVERRIDE.get() {
        return Ok(path.clone());
    }
    Ok(get_config_dir()?.join("config.json"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

/// Load a config file; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let config: Config = serde_json::from_str(&contents)
        .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
    info!("Loaded config from {}", path.display());

    Ok(config)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;

    info!("Config saved to {}", path.display());
    Ok(())
}
