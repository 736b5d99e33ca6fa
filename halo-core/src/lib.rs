//! # Halo Core
//!
//! Load tracking for a small cluster of remote images rendered as status
//! indicators.
//!
//! ## Overview
//!
//! Each image occupies a slot. A slot starts pending, and every failed load
//! arms a fixed backoff after which the slot becomes eligible for another
//! attempt. Once the retry budget is spent the slot is marked failed for good.
//!
//! - **Slot store**: pure reducer over an immutable slot table, plus the
//!   per-slot backoff timers it owns
//! - **Status projection**: maps a descriptor and slot state to one of a
//!   closed set of display variants with a human-readable explanation
//! - **Error aggregation**: one flag per render pass
//! - **Cluster session**: background task that issues load attempts and
//!   publishes a render-ready view
//! - **Descriptor client**: fetches the image set document over HTTP
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use halo_core::{ClusterSession, HttpProbe, ImageSetClient, RetryPolicy};
//!
//! async fn watch_cluster() -> halo_core::Result<()> {
//!     let client = ImageSetClient::new(
//!         "http://localhost:3000/api/images",
//!         Duration::from_secs(10),
//!     )?;
//!     let set = client.fetch().await?;
//!     let probe = Arc::new(HttpProbe::new(Duration::from_secs(10))?);
//!     let session = ClusterSession::start(set, probe, RetryPolicy::default())?;
//!
//!     let mut views = session.subscribe();
//!     while views.changed().await.is_ok() {
//!         println!("{}", *views.borrow());
//!     }
//!     session.shutdown().await
//! }
//! ```

#![allow(missing_docs)]

/// Aggregate error flag over all slots
pub mod aggregate;

/// Cluster session and the view it publishes
pub mod cluster;

/// Error types and error handling utilities
pub mod error;

/// Page-level state of the descriptor fetch
pub mod page;

/// Load outcome sources
pub mod probe;

/// Per-slot state store, reducer and backoff scheduler
pub mod slots;

/// HTTP client for the image set document
pub mod source;

/// Projection of slot state onto display statuses
pub mod status;

pub use aggregate::has_error;
pub use cluster::{ClusterSession, ClusterView};
pub use error::{HaloError, Result};
pub use page::PageState;
pub use probe::{HttpProbe, LoadOutcome, LoadProbe};
pub use slots::{BACKOFF_DELAY, RetryPolicy, SlotStore};
pub use source::ImageSetClient;
pub use status::{project, project_all};

pub use halo_model;
