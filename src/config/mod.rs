//! Config-store loading.
//!
//! The store is a TOML file of named connection profiles in the InfluxDB CLI
//! `configs` format: one table per profile with `url`, `token`, and `org`.
//! Extra keys (e.g. `active`) are ignored.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config store {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config store {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("profile '{name}' not found in {path}")]
    MissingProfile { name: String, path: PathBuf },

    #[error("profile '{name}' has an empty '{field}' value")]
    EmptyField { name: String, field: &'static str },
}

/// One named connection profile. Immutable for the life of the invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub url: String,
    pub token: String,
    pub org: String,
}

/// Load the named profile from the config store at `path`.
pub fn load_profile(path: &Path, name: &str) -> Result<Profile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let table: toml::Table = toml::from_str(&raw).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let value = table
        .get(name)
        .cloned()
        .ok_or_else(|| ConfigError::MissingProfile {
            name: name.to_string(),
            path: path.to_path_buf(),
        })?;

    let profile: Profile = value.try_into().map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    for (field, v) in [
        ("url", &profile.url),
        ("token", &profile.token),
        ("org", &profile.org),
    ] {
        if v.is_empty() {
            return Err(ConfigError::EmptyField {
                name: name.to_string(),
                field,
            });
        }
    }

    Ok(profile)
}
