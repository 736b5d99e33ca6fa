//! Drives one avatar cluster: issues load attempts, feeds their outcomes and
//! backoff expiries into a [`SlotStore`](crate::slots::SlotStore) and
//! publishes a render-ready [`ClusterView`] after every event.

mod session;
mod view;

pub use session::ClusterSession;
pub use view::ClusterView;
