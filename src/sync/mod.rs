//! Campaign sync store - a local cache of remote campaigns.
//!
//! The store keeps an ordered snapshot of the campaigns last fetched from a
//! `RemoteCampaignService` and mediates every mutation through it:
//!
//! - `refresh` replaces the snapshot wholesale, throttled by
//!   `SyncConfig::minimum_refresh_interval` unless forced;
//! - `delete` and `update` patch the snapshot once the service confirms;
//! - `create` does not touch the snapshot, since the service assigns the id.
//!   A later refresh picks the new campaign up (see `schedule_refresh`).
//!
//! All operations run one at a time, in arrival order. A refresh requested
//! while another refresh is pending is rejected with `SyncError::Busy`.
//!
//! ## Example
//!
//! ```ignore
//! use campaign_sync::{CampaignSyncStore, InMemoryCampaignService};
//!
//! let store = CampaignSyncStore::new(InMemoryCampaignService::new());
//! let outcome = store.refresh(false).await;
//! for campaign in outcome.items.iter() {
//!     println!("{}: {}", campaign.id, campaign.summary());
//! }
//! ```

mod config;
mod scheduler;
mod store;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::campaign::Campaign;
use crate::error::SyncError;
use crate::remote::{RemoteError, RemoteOp};

pub use config::{ConfigError, SyncConfig};
pub use scheduler::ScheduledRefresh;
pub use store::CampaignSyncStore;

/// What the store is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreState {
    #[default]
    Idle,
    Refreshing,
    Mutating,
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreState::Idle => "idle",
            StoreState::Refreshing => "refreshing",
            StoreState::Mutating => "mutating",
        };
        f.write_str(name)
    }
}

/// Result of a `refresh` call.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// The snapshot after the call.
    pub items: Arc<Vec<Campaign>>,
    /// Errors raised by this call (empty on success or when throttled).
    pub errors: Vec<SyncError>,
    /// Whether the remote service was actually asked.
    pub fetched: bool,
}

impl RefreshOutcome {
    fn cached(items: Arc<Vec<Campaign>>) -> Self {
        Self {
            items,
            errors: Vec::new(),
            fetched: false,
        }
    }

    fn rejected(items: Arc<Vec<Campaign>>, error: SyncError) -> Self {
        Self {
            items,
            errors: vec![error],
            fetched: false,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run a remote call, bounded by `limit` if set.
async fn call_remote<T, F>(op: RemoteOp, limit: Option<Duration>, call: F) -> Result<T, SyncError>
where
    F: Future<Output = Result<T, RemoteError>>,
{
    let result = match limit {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Transport(format!(
                "remote call timed out after {:?}",
                limit
            ))),
        },
        None => call.await,
    };

    result.map_err(|e| {
        tracing::warn!(op = %op, error = %e, "remote call failed");
        SyncError::from(e)
    })
}
