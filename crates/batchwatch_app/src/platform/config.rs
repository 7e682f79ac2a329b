//! Target aliases, stored as RON.
//!
//! ```ron
//! (
//!     aliases: {
//!         "myminio": (url: "http://127.0.0.1:9000", connect_timeout_secs: Some(5)),
//!     },
//! )
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use batchwatch_engine::{AdminError, AdminSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use watch_logging::watch_debug;

const DEFAULT_CONFIG_PATH: &str = ".batchwatch/config.ron";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct WatchConfig {
    #[serde(default)]
    pub aliases: BTreeMap<String, AliasEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AliasEntry {
    pub url: String,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("no alias named {0:?} is configured")]
    UnknownAlias(String),
    #[error("invalid endpoint for {target}")]
    Endpoint {
        target: String,
        #[source]
        source: AdminError,
    },
}

/// Loads `explicit`, or `~/.batchwatch/config.ron` when no path was given.
/// Only the default file may be missing.
pub(crate) fn load(explicit: Option<&Path>) -> Result<WatchConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match std::env::var_os("HOME") {
            Some(home) => (PathBuf::from(home).join(DEFAULT_CONFIG_PATH), false),
            None => return Ok(WatchConfig::default()),
        },
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            watch_debug!("No config file at {:?}; only URL targets will work", path);
            return Ok(WatchConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    watch_debug!("Loaded config from {:?}", path);
    Ok(config)
}

impl WatchConfig {
    /// Turns `myminio`, `myminio/` or `myminio/bucket` into admin settings.
    /// Literal `http://` and `https://` targets bypass the alias table.
    pub(crate) fn resolve_target(&self, target: &str) -> Result<AdminSettings, ConfigError> {
        let endpoint_error = |source| ConfigError::Endpoint {
            target: target.to_string(),
            source,
        };

        if target.starts_with("http://") || target.starts_with("https://") {
            return AdminSettings::new(target).map_err(endpoint_error);
        }

        let alias = target.split('/').next().unwrap_or(target).trim();
        let entry = self
            .aliases
            .get(alias)
            .ok_or_else(|| ConfigError::UnknownAlias(alias.to_string()))?;

        let mut settings = AdminSettings::new(&entry.url).map_err(endpoint_error)?;
        if let Some(secs) = entry.connect_timeout_secs {
            settings.connect_timeout = Duration::from_secs(secs);
        }
        Ok(settings)
    }
}
