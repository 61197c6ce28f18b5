//! Deferred refreshes tied to the store's lifetime.
//!
//! After a mutation the service may need a moment before a listing reflects
//! it. A scheduled refresh waits, then refreshes through a weak reference, so
//! tearing the store down cancels the follow-up instead of keeping the store
//! alive or applying a result nobody will read.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CampaignSyncStore, RefreshOutcome};
use crate::remote::RemoteCampaignService;

/// Handle to a refresh running on a background task.
///
/// Dropping the handle detaches the task; use `abort` to cancel it.
pub struct ScheduledRefresh {
    handle: JoinHandle<Option<RefreshOutcome>>,
}

impl ScheduledRefresh {
    pub(super) fn spawn<S>(
        store: Weak<CampaignSyncStore<S>>,
        delay: Duration,
        forced: bool,
    ) -> Self
    where
        S: RemoteCampaignService + 'static,
    {
        let handle = tokio::spawn(run(store, delay, forced));
        Self { handle }
    }

    /// Wait for the refresh. `None` if the store was dropped first or the task
    /// was aborted.
    pub async fn wait(self) -> Option<RefreshOutcome> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                warn!(error = %e, "scheduled refresh task failed");
                None
            }
        }
    }

    /// Cancel the refresh. A refresh already past its fetch may still apply.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn run<S>(
    weak: Weak<CampaignSyncStore<S>>,
    delay: Duration,
    forced: bool,
) -> Option<RefreshOutcome>
where
    S: RemoteCampaignService + 'static,
{
    tokio::time::sleep(delay).await;

    let pending = {
        let Some(store) = weak.upgrade() else {
            debug!("store dropped before scheduled refresh");
            return None;
        };
        match store.begin_refresh(forced) {
            Ok(pending) => pending,
            Err(outcome) => return Some(outcome),
        }
    };

    let fetched = pending.fetch().await;

    match weak.upgrade() {
        Some(store) => Some(store.finish_refresh(fetched)),
        None => {
            debug!("store dropped during scheduled refresh, discarding result");
            None
        }
    }
}
