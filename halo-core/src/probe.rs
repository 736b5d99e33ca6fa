//! Load outcome sources.
//!
//! The slot store only consumes a binary succeeded/failed signal per attempt.
//! [`HttpProbe`] produces that signal by requesting the resource and looking
//! at the response status; the body is never decoded.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::Result;

/// Binary result of one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOutcome {
    Succeeded,
    Failed,
}

impl LoadOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, LoadOutcome::Succeeded)
    }
}

#[async_trait]
pub trait LoadProbe: Send + Sync + fmt::Debug {
    async fn probe(&self, locator: &str) -> LoadOutcome;
}

/// Requests the resource over HTTP; any 2xx response counts as loaded.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LoadProbe for HttpProbe {
    async fn probe(&self, locator: &str) -> LoadOutcome {
        match self.client.get(locator).send().await {
            Ok(response) if response.status().is_success() => {
                LoadOutcome::Succeeded
            }
            Ok(response) => {
                debug!(
                    locator,
                    status = response.status().as_u16(),
                    "image load rejected"
                );
                LoadOutcome::Failed
            }
            Err(err) => {
                debug!(locator, error = %err, "image load failed");
                LoadOutcome::Failed
            }
        }
    }
}
