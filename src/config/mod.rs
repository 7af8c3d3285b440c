use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::notify;
use crate::tui::theme::{Theme, ThemeConfig};

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub theme: ThemeOverrides,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// How long a notification stays on screen, in milliseconds. Default: 2000
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            duration_ms: default_duration_ms(),
        }
    }
}

fn default_duration_ms() -> u64 {
    notify::DEFAULT_LIFETIME.as_millis() as u64
}

impl NotificationConfig {
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppearanceConfig {
    /// Used instead of terminal detection when no theme has been saved yet.
    #[serde(default)]
    pub prefer_dark: Option<bool>,
}

/// `[theme.light]` / `[theme.dark]` colour overrides.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeOverrides {
    #[serde(default)]
    pub light: ThemeConfig,
    #[serde(default)]
    pub dark: ThemeConfig,
}

impl ThemeOverrides {
    pub fn light_theme(&self) -> Theme {
        self.light.build_on(Theme::light())
    }

    pub fn dark_theme(&self) -> Theme {
        self.dark.build_on(Theme::dark())
    }
}

/// Returns the base config directory: ~/.todolist/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".todolist"))
}

/// Returns the path to the `SQLite` database holding the key-value slots
pub fn db_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("todolist.db"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("todolist.log"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

pub fn default_export_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("export.json"))
}

/// Ensure all required directories exist
pub fn ensure_dirs() -> Result<()> {
    let base = base_dir()?;
    fs::create_dir_all(&base).context("failed to create ~/.todolist/")?;
    Ok(())
}

/// Load config from ~/.todolist/config.toml (or return defaults if it doesn't exist)
pub fn load() -> Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}
