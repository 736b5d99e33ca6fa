//! Client for the descriptor endpoint.

use std::time::Duration;

use halo_model::ImageSet;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{HaloError, Result};
use crate::page::PageState;

/// Fetches the image set document once per call. There is no automatic
/// retry here; a failed fetch is surfaced to the caller as is.
#[derive(Debug, Clone)]
pub struct ImageSetClient {
    client: Client,
    url: Url,
}

impl ImageSetClient {
    /// Build a client for `url`. A missing scheme defaults to `http://`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, url)
    }

    pub fn with_client(client: Client, url: &str) -> Result<Self> {
        let url = Url::parse(&normalize(url))?;
        info!(source = %url, "image set client ready");
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// GET the document. Non-2xx answers become
    /// [`HaloError::SourceUnavailable`], a `null` body becomes
    /// [`HaloError::NoData`].
    pub async fn fetch(&self) -> Result<ImageSet> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string();
            warn!(status = status.as_u16(), %reason, "image set fetch rejected");
            return Err(HaloError::SourceUnavailable {
                status: status.as_u16(),
                reason,
            });
        }

        let body = response.bytes().await?;
        let set: Option<ImageSet> = serde_json::from_slice(&body)?;
        let set = set.ok_or(HaloError::NoData)?;
        set.validate()?;

        if set.count_mismatch() {
            debug!(
                advertised = set.count,
                actual = set.slot_count(),
                "image set count disagrees with payload; using payload length"
            );
        }
        Ok(set)
    }

    /// Fetch and fold the outcome into a [`PageState`].
    pub async fn load_page(&self) -> PageState {
        PageState::from_fetch(self.fetch().await)
    }
}

fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
