pub mod error;

use once_cell::sync::Lazy;
use std::{fs, path::PathBuf};

use self::error::ConfigLoadError;
use crate::{
    constants::{
        DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PROBE_TIMEOUT,
        DEFAULT_SOURCE_TIMEOUT, DEFAULT_SOURCE_URL, EXPECTED_MAX_RETRIES,
        default_image_set,
    },
    models::{
        Config, ConfigMetadata, ImageSetSource, ProbeConfig, RetryConfig,
        ServerConfig, SourceConfig,
        sources::{EnvConfig, FileConfig},
    },
    util::parse_duration,
    validation::{self, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![PathBuf::from("halo.toml"), PathBuf::from("config/halo.toml")]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env` into the process environment, then resolve the
    /// configuration from the file and the environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Resolve against an already gathered environment. Does not touch
    /// `.env` or the process environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            self.compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env_config.config_path {
            source.env = Some(from_env.clone());
        }

        if source.is_empty() {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .cloned();
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| {
                ConfigLoadError::Parse {
                    path: path.clone(),
                    source: err,
                }
            })?;

        tracing::debug!(
            path = %path.display(),
            ?provenance,
            "loaded configuration file"
        );
        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No halo.toml detected; serving the built-in image set",
                "Set HALO_CONFIG_PATH or create halo.toml with an [image_set] section",
            );
        }

        let FileConfig {
            server: file_server,
            source: file_source,
            retry: file_retry,
            probe: file_probe,
            image_set: file_image_set,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let source = SourceConfig {
            url: env
                .source_url
                .or(file_source.url)
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            timeout: resolve_duration(
                "source.timeout",
                env.source_timeout.or(file_source.timeout),
                DEFAULT_SOURCE_TIMEOUT,
            )?,
        };

        let retry = RetryConfig {
            max_retries: env
                .max_retries
                .or(file_retry.max_retries)
                .unwrap_or(EXPECTED_MAX_RETRIES),
            backoff: resolve_duration(
                "retry.backoff",
                env.retry_backoff.or(file_retry.backoff),
                halo_core::BACKOFF_DELAY,
            )?,
        };

        let probe = ProbeConfig {
            timeout: resolve_duration(
                "probe.timeout",
                env.probe_timeout.or(file_probe.timeout),
                DEFAULT_PROBE_TIMEOUT,
            )?,
        };

        let (image_set, image_set_source) =
            match (file_image_set, config_path.as_ref()) {
                (Some(set), Some(path)) => {
                    (set, ImageSetSource::File(path.clone()))
                }
                _ => (default_image_set(), ImageSetSource::Default),
            };

        let config = Config {
            server,
            source,
            retry,
            probe,
            image_set,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded: false,
                image_set_source,
            },
        };

        let guard_warnings = validation::apply_guard_rails(&config)?;
        warnings.extend(guard_warnings);

        Ok((config, warnings))
    }
}

fn resolve_duration(
    field: &'static str,
    raw: Option<String>,
    default: std::time::Duration,
) -> Result<std::time::Duration, ConfigLoadError> {
    match raw {
        Some(raw) => parse_duration(field, &raw),
        None => Ok(default),
    }
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn is_empty(&self) -> bool {
        self.explicit.is_none() && self.env.is_none() && self.default.is_none()
    }

    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        if let Some(path) = &self.default {
            return Some((path.clone(), ConfigPathProvenance::Default));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}
