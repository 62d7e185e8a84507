//! Configuration loading utilities
//!
//! A config file is looked up in priority order:
//! 1. Explicit path (`--config` flag or environment variable)
//! 2. Current working directory
//! 3. XDG config home
//! 4. System config directory
//!
//! When none exists the caller falls back to built-in defaults.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where a configuration was loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Explicit path provided via CLI or env var
    Explicit(PathBuf),
    /// Found in current working directory
    CurrentDir(PathBuf),
    /// Found in XDG config home (~/.config/climate-api/)
    XdgConfig(PathBuf),
    /// Found in system config (/etc/climate-api/)
    System(PathBuf),
    /// No config file found, using defaults
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Find a configuration file in the standard locations
///
/// # Arguments
/// * `env_var` - Environment variable holding an explicit path (e.g. `CLIMATE_API_CONFIG`)
/// * `filename` - Config filename to search for (e.g. `climate.toml`)
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    if let Ok(path) = env::var(env_var) {
        let p = PathBuf::from(path);
        if p.exists() {
            return ConfigSource::Explicit(p);
        }
    }

    let candidates = [
        ConfigSource::CurrentDir(PathBuf::from(filename)),
        ConfigSource::XdgConfig(xdg_config_path(filename)),
        ConfigSource::System(PathBuf::from("/etc").join(APP_NAME).join(filename)),
    ];

    candidates
        .into_iter()
        .find(|source| source.path().is_some_and(|p| p.exists()))
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_path(filename: &str) -> PathBuf {
    let base = match (env::var("XDG_CONFIG_HOME"), env::var("HOME")) {
        (Ok(xdg_config), _) => PathBuf::from(xdg_config),
        (Err(_), Ok(home)) => PathBuf::from(home).join(".config"),
        _ => PathBuf::from(".config"),
    };
    base.join(APP_NAME).join(filename)
}

/// Load and parse a TOML configuration file
///
/// Returns `T::default()` when the source is [`ConfigSource::Defaults`].
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    log::debug!("parsed config file {}", path.display());
    Ok(config)
}
