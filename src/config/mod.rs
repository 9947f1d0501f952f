// Configuration management for Playra
// Handles loading/saving settings, with sensible defaults when config is missing

use crate::playlist::DEFAULT_PLAYLISTS;
use crate::store::JsonStore;
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folders offered for import when none is given explicitly
    pub music_directories: Vec<PathBuf>,
    /// Where the library snapshot lives
    pub store_path: PathBuf,
    /// Seed starter playlists when there is no saved state yet
    pub seed_default_playlists: bool,
    pub default_playlists: Vec<String>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    /// EnvFilter directive used when RUST_LOG is unset
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_directories: vec![
                dirs::audio_dir().unwrap_or_else(|| PathBuf::from("~/Music")),
            ],
            store_path: JsonStore::default_location(),
            seed_default_playlists: true,
            default_playlists: DEFAULT_PLAYLISTS.iter().map(|s| s.to_string()).collect(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: app_config_dir().join("logs"),
            filter: "info,playra=debug".to_string(),
        }
    }
}

impl Config {
    /// Load from the standard location, writing defaults there on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Store path with a leading `~` expanded
    pub fn resolved_store_path(&self) -> PathBuf {
        expand_home(&self.store_path)
    }

    /// Music folders with a leading `~` expanded
    pub fn resolved_music_directories(&self) -> Vec<PathBuf> {
        self.music_directories
            .iter()
            .map(|dir| expand_home(dir))
            .collect()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("playra");

        Ok(config_dir.join("config.toml"))
    }
}

fn app_config_dir() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("playra")
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
