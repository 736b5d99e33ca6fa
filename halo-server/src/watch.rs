//! Terminal client for a running image set endpoint.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use halo_core::{
    ClusterSession, ClusterView, ImageSetClient, LoadProbe, PageState,
    RetryPolicy,
};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    pub policy: RetryPolicy,
    /// Caption printed under the set name; overrides the document's own.
    pub location: Option<String>,
    /// Keep running after every slot has settled.
    pub follow: bool,
}

/// Fetch the image set and print the cluster after every change until all
/// slots have settled (or until interrupted with `follow`).
///
/// Returns `Ok(None)` when the source has no data. A failed fetch is printed
/// and returned as an error; there is no automatic re-fetch.
pub async fn watch<W: Write>(
    client: &ImageSetClient,
    probe: Arc<dyn LoadProbe>,
    options: &WatchOptions,
    out: &mut W,
) -> anyhow::Result<Option<ClusterView>> {
    writeln!(out, "{}", PageState::Loading)?;

    let page = client.load_page().await;
    let mut set = match page {
        PageState::Ready(set) => set,
        PageState::Failed(_) => {
            writeln!(out, "{page}")?;
            anyhow::bail!("{page}");
        }
        PageState::Empty | PageState::Loading => {
            writeln!(out, "{page}")?;
            return Ok(None);
        }
    };

    if let Some(location) = &options.location {
        set.location = Some(location.clone());
    }

    let session = ClusterSession::start(set, probe, options.policy)
        .context("failed to start cluster session")?;
    let mut views = session.subscribe();
    let mut last = views.borrow_and_update().clone();
    writeln!(out, "{last}")?;

    loop {
        if last.is_settled() && !options.follow {
            break;
        }

        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                last = views.borrow_and_update().clone();
                writeln!(out, "{last}")?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; stopping cluster session");
                break;
            }
        }
    }

    session.shutdown().await?;
    Ok(Some(last))
}
