pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

use halo_core::RetryPolicy;
use halo_model::ImageSet;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub retry: RetryConfig,
    pub probe: ProbeConfig,
    /// Document served by the descriptor endpoint.
    pub image_set: ImageSet,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where the watch client fetches the image set from.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryConfig {
    /// Convert into the policy applied by the slot store. Guard rails
    /// reject budgets that do not fit; anything larger saturates.
    pub fn policy(&self) -> RetryPolicy {
        let max_retries = u8::try_from(self.max_retries).unwrap_or(u8::MAX);
        RetryPolicy::new(max_retries, self.backoff)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProbeConfig {
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
    pub image_set_source: ImageSetSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageSetSource {
    #[default]
    Default,
    File(PathBuf),
}
