use halo_model::{CLUSTER_POSITIONS, ModelError};
use thiserror::Error;

use crate::constants::EXPECTED_MAX_RETRIES;
use crate::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("retry.max_retries must not exceed {limit}, got {value}")]
    RetryBudgetTooLarge { value: u32, limit: u32 },
    #[error("retry.backoff must be greater than zero")]
    ZeroBackoff,
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
    #[error("invalid image_set: {0}")]
    InvalidImageSet(#[from] ModelError),
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let limit = u32::from(u8::MAX);
    if config.retry.max_retries > limit {
        return Err(ConfigGuardRailError::RetryBudgetTooLarge {
            value: config.retry.max_retries,
            limit,
        });
    }
    if config.retry.backoff.is_zero() {
        return Err(ConfigGuardRailError::ZeroBackoff);
    }
    if config.source.timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroTimeout {
            field: "source.timeout",
        });
    }
    if config.probe.timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroTimeout {
            field: "probe.timeout",
        });
    }

    config.image_set.validate()?;

    if config.retry.max_retries != EXPECTED_MAX_RETRIES {
        warnings.push_with_hint(
            format!(
                "retry.max_retries is {}; clients expect {EXPECTED_MAX_RETRIES}",
                config.retry.max_retries
            ),
            "Status texts report the retry count against a budget of 3",
        );
    }

    let set = &config.image_set;
    if set.count_mismatch() {
        warnings.push_with_hint(
            format!(
                "image_set.count is {} but {} images are listed",
                set.count,
                set.slot_count()
            ),
            "Clients size the cluster from the images list; count is informational",
        );
    }

    if set.slot_count() > CLUSTER_POSITIONS {
        warnings.push(format!(
            "image_set lists {} images; the cluster shows {CLUSTER_POSITIONS} positions",
            set.slot_count()
        ));
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::default_image_set;
    use crate::models::{
        ConfigMetadata, ProbeConfig, RetryConfig, ServerConfig, SourceConfig,
    };
    use halo_model::ResourceDescriptor;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            source: SourceConfig {
                url: "http://localhost:3000/api/images".into(),
                timeout: Duration::from_secs(10),
            },
            retry: RetryConfig {
                max_retries: 3,
                backoff: Duration::from_secs(5),
            },
            probe: ProbeConfig {
                timeout: Duration::from_secs(10),
            },
            image_set: default_image_set(),
            metadata: ConfigMetadata::default(),
        }
    }

    #[test]
    fn defaults_pass_without_warnings() {
        let warnings = apply_guard_rails(&config()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn oversized_budget_is_rejected() {
        let mut config = config();
        config.retry.max_retries = 300;
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::RetryBudgetTooLarge { value: 300, .. })
        ));
    }

    #[test]
    fn zero_backoff_is_rejected() {
        let mut config = config();
        config.retry.backoff = Duration::ZERO;
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::ZeroBackoff)
        ));
    }

    #[test]
    fn loadable_image_without_url_is_rejected() {
        let mut config = config();
        config.image_set.images[0] = ResourceDescriptor::ready("");
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidImageSet(
                ModelError::EmptyLocator { index: 0 }
            ))
        ));
    }

    #[test]
    fn unusual_sets_produce_warnings() {
        let mut config = config();
        config.retry.max_retries = 5;
        config.image_set.count = 9;
        for i in 0..2 {
            config
                .image_set
                .images
                .push(ResourceDescriptor::ready(format!("https://img/{i}")));
        }

        let warnings = apply_guard_rails(&config).unwrap();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.message.contains("count is 9")));
        assert!(warnings.iter().any(|w| w.message.contains("6 images")));
    }
}
