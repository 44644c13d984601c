use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::error::Error;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `ALBUMDECK__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ALBUMDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.audio.initial_volume) {
            return Err(Error::InvalidSettings(
                "audio.initial_volume must be within [0, 1]".to_string(),
            ));
        }
        if self.audio.tick_ms == 0 {
            return Err(Error::InvalidSettings(
                "audio.tick_ms must be >= 1".to_string(),
            ));
        }
        if !(self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0) {
            return Err(Error::InvalidSettings(
                "controls.volume_step must be within (0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Catalog file to read slugs from: the configured path or the default one.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog
            .path
            .clone()
            .or_else(|| config_dir().map(|d| d.join("albums.toml")))
    }

    /// Log file: the configured path or `$XDG_STATE_HOME/albumdeck/albumdeck.log`.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.file.clone().or_else(default_log_path)
    }
}

/// Resolve the config path from `ALBUMDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ALBUMDECK_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/albumdeck/config.toml`
/// or `~/.config/albumdeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

fn config_dir() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("albumdeck"))
}

/// `$XDG_STATE_HOME/albumdeck/albumdeck.log`, or `~/.local/state/albumdeck/albumdeck.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("albumdeck").join("albumdeck.log"))
}
