//! Harness configuration (`ferrite.toml`).
//!
//! Only the ambient knobs the harness itself needs: the default log filter
//! (overridable via `RUST_LOG`) and whether the status line shows pending
//! parser state. Unknown fields are ignored so the file can grow without
//! breaking older binaries; a missing or unparsable file falls back to
//! defaults.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}

impl LogConfig {
    fn default_filter() -> String {
        "info".to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    #[serde(default = "UiConfig::default_show_pending")]
    pub show_pending: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_pending: Self::default_show_pending(),
        }
    }
}

impl UiConfig {
    const fn default_show_pending() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("ferrite.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ferrite").join("ferrite.toml");
    }
    PathBuf::from("ferrite.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Ok(Config {
                raw: Some(content),
                file,
            }),
            // Parse error falls back to defaults rather than aborting.
            Err(_e) => Ok(Config::default()),
        }
    } else {
        Ok(Config::default())
    }
}
