use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::config::MonitorConfig;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = ".tmon.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load the config.
///
/// An explicit path must exist. The default `.tmon.toml` is optional and
/// falls back to built-in defaults when missing.
pub fn load_config(explicit: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound && !required => {
            return Ok(MonitorConfig::default());
        }
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };

    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}
