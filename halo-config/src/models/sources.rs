use std::path::PathBuf;

use halo_model::ImageSet;
use serde::{Deserialize, Serialize};

use crate::util::{non_empty_var, parse_var};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub source: FileSourceConfig,
    #[serde(default)]
    pub retry: FileRetryConfig,
    #[serde(default)]
    pub probe: FileProbeConfig,
    pub image_set: Option<ImageSet>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileSourceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Human-readable, e.g. `"10s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileRetryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileProbeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Environment-derived configuration values.
///
/// Durations are kept as raw strings so a malformed value is reported with
/// its variable name instead of being silently ignored.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub source_url: Option<String>,
    pub source_timeout: Option<String>,
    pub retry_backoff: Option<String>,
    pub max_retries: Option<u32>,
    pub probe_timeout: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            config_path: non_empty_var(&lookup, "HALO_CONFIG_PATH")
                .map(PathBuf::from),
            server_host: non_empty_var(&lookup, "SERVER_HOST"),
            server_port: parse_var(&lookup, "SERVER_PORT"),
            source_url: non_empty_var(&lookup, "HALO_SOURCE_URL"),
            source_timeout: non_empty_var(&lookup, "HALO_SOURCE_TIMEOUT"),
            retry_backoff: non_empty_var(&lookup, "HALO_RETRY_BACKOFF"),
            max_retries: parse_var(&lookup, "HALO_MAX_RETRIES"),
            probe_timeout: non_empty_var(&lookup, "HALO_PROBE_TIMEOUT"),
        }
    }
}
