use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{call_remote, RefreshOutcome, ScheduledRefresh, StoreState, SyncConfig};
use crate::campaign::{Campaign, CampaignDraft};
use crate::error::SyncError;
use crate::lock::{InMemoryLock, LockGuard};
use crate::remote::{RemoteCampaignService, RemoteOp};

/// Local, ordered cache of the campaigns held by a remote service.
///
/// Generic over `S`, the remote service. The snapshot returned by `items()` is
/// an `Arc` that is swapped, never edited, so readers always see a complete
/// list.
pub struct CampaignSyncStore<S> {
    service: Arc<S>,
    config: SyncConfig,
    items: RwLock<Arc<Vec<Campaign>>>,
    errors: Mutex<Vec<SyncError>>,
    last_refresh: Mutex<Option<Instant>>,
    /// Held from refresh acceptance until its result is applied.
    refresh_gate: Arc<InMemoryLock>,
    /// One operation at a time, FIFO.
    queue: Arc<AsyncMutex<()>>,
    state: Arc<Mutex<StoreState>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks the store's state while an operation holds the queue. Resets to
/// `Idle` on drop, including when the operation's future is dropped.
struct Phase {
    state: Arc<Mutex<StoreState>>,
}

impl Phase {
    fn enter(state: &Arc<Mutex<StoreState>>, phase: StoreState) -> Self {
        *lock(state) = phase;
        Phase {
            state: Arc::clone(state),
        }
    }
}

impl Drop for Phase {
    fn drop(&mut self) {
        *lock(&self.state) = StoreState::Idle;
    }
}

/// An accepted refresh waiting for its turn in the queue.
///
/// Owns everything it needs to reach the service, so it can run without a
/// strong reference to the store.
pub(super) struct PendingRefresh<S> {
    gate: LockGuard<InMemoryLock>,
    queue: Arc<AsyncMutex<()>>,
    state: Arc<Mutex<StoreState>>,
    service: Arc<S>,
    timeout: Option<Duration>,
}

impl<S: RemoteCampaignService> PendingRefresh<S> {
    pub(super) async fn fetch(self) -> FetchedRefresh {
        let slot = self.queue.lock_owned().await;
        let phase = Phase::enter(&self.state, StoreState::Refreshing);
        let result = call_remote(RemoteOp::List, self.timeout, self.service.list_campaigns()).await;
        FetchedRefresh {
            result,
            _phase: phase,
            _slot: slot,
            _gate: self.gate,
        }
    }
}

/// A refresh result that still holds its queue slot, so nothing can run
/// between the fetch and its application.
pub(super) struct FetchedRefresh {
    result: Result<Vec<Campaign>, SyncError>,
    // Field order is drop order: state resets before the slot is released.
    _phase: Phase,
    _slot: OwnedMutexGuard<()>,
    _gate: LockGuard<InMemoryLock>,
}

impl<S: RemoteCampaignService> CampaignSyncStore<S> {
    /// Create a store with the default configuration.
    pub fn new(service: S) -> Self {
        Self::with_config(service, SyncConfig::default())
    }

    pub fn with_config(service: S, config: SyncConfig) -> Self {
        Self {
            service: Arc::new(service),
            config,
            items: RwLock::new(Arc::new(Vec::new())),
            errors: Mutex::new(Vec::new()),
            last_refresh: Mutex::new(None),
            refresh_gate: Arc::new(InMemoryLock::new()),
            queue: Arc::new(AsyncMutex::new(())),
            state: Arc::new(Mutex::new(StoreState::Idle)),
        }
    }

    /// The remote service, e.g. for an editor that saves through it directly.
    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Current snapshot, in fetch order.
    pub fn items(&self) -> Arc<Vec<Campaign>> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&items)
    }

    /// Errors accumulated since the last successful refresh, oldest first.
    pub fn errors(&self) -> Vec<SyncError> {
        lock(&self.errors).clone()
    }

    pub fn state(&self) -> StoreState {
        *lock(&self.state)
    }

    /// When the last accepted refresh started.
    pub fn last_refresh_time(&self) -> Option<Instant> {
        *lock(&self.last_refresh)
    }

    /// True if no refresh was ever accepted, or the last one started at least
    /// `minimum_refresh_interval` ago.
    pub fn can_refresh(&self) -> bool {
        match self.last_refresh_time() {
            None => true,
            Some(started) => started.elapsed() >= self.config.minimum_refresh_interval(),
        }
    }

    /// Fetch the campaign list and replace the snapshot.
    ///
    /// A non-forced refresh inside the throttle window returns the cached
    /// snapshot without calling the service. A refresh while another one is
    /// pending returns `[SyncError::Busy]`. On failure the snapshot is kept.
    pub async fn refresh(&self, forced: bool) -> RefreshOutcome {
        let pending = match self.begin_refresh(forced) {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let fetched = pending.fetch().await;
        self.finish_refresh(fetched)
    }

    /// Ask the service to create a campaign.
    ///
    /// The snapshot is not touched: the service assigns the id, so the new
    /// campaign shows up with the next refresh.
    pub async fn create(&self, draft: CampaignDraft) -> Vec<SyncError> {
        let _slot = self.queue.lock().await;
        let _phase = Phase::enter(&self.state, StoreState::Mutating);

        let title = draft.title.clone();
        let created = call_remote(
            RemoteOp::Create,
            self.config.remote_timeout(),
            self.service.create_campaign(draft),
        )
        .await;

        match created {
            Ok(()) => {
                info!(title = ?title, "campaign created, awaiting next refresh");
                Vec::new()
            }
            Err(e) => self.fail(e),
        }
    }

    /// Ask the service to replace `campaign`; on success replace the entry with
    /// the same id in the snapshot, keeping its position.
    pub async fn update(&self, campaign: Campaign) -> Vec<SyncError> {
        let _slot = self.queue.lock().await;
        let _phase = Phase::enter(&self.state, StoreState::Mutating);

        let updated = call_remote(
            RemoteOp::Update,
            self.config.remote_timeout(),
            self.service.update_campaign(campaign.clone()),
        )
        .await;

        match updated {
            Ok(()) => {
                let id = campaign.id.clone();
                let replaced = self.patch_items(|items| {
                    match items.iter_mut().find(|c| c.id == campaign.id) {
                        Some(slot) => {
                            *slot = campaign;
                            true
                        }
                        None => false,
                    }
                });
                debug!(id = %id, replaced, "campaign updated");
                Vec::new()
            }
            Err(e) => self.fail(e),
        }
    }

    /// Ask the service to delete `campaign`; on success remove its entry from
    /// the snapshot.
    pub async fn delete(&self, campaign: &Campaign) -> Vec<SyncError> {
        let _slot = self.queue.lock().await;
        let _phase = Phase::enter(&self.state, StoreState::Mutating);

        let deleted = call_remote(
            RemoteOp::Delete,
            self.config.remote_timeout(),
            self.service.delete_campaign(&campaign.id),
        )
        .await;

        match deleted {
            Ok(()) => {
                let removed = self.patch_items(|items| {
                    match items.iter().position(|c| c.id == campaign.id) {
                        Some(position) => {
                            items.remove(position);
                            true
                        }
                        None => false,
                    }
                });
                info!(id = %campaign.id, removed, "campaign deleted");
                Vec::new()
            }
            Err(e) => self.fail(e),
        }
    }

    /// Throttle and gate checks for a refresh. `Err` carries the outcome to
    /// return without calling the service.
    pub(super) fn begin_refresh(&self, forced: bool) -> Result<PendingRefresh<S>, RefreshOutcome> {
        if !forced && !self.can_refresh() {
            debug!("refresh throttled, returning cached campaigns");
            return Err(RefreshOutcome::cached(self.items()));
        }

        let gate = match LockGuard::try_acquire(&self.refresh_gate) {
            Ok(Some(gate)) => gate,
            Ok(None) => {
                warn!(forced, "refresh rejected, another refresh is in flight");
                return Err(RefreshOutcome::rejected(self.items(), SyncError::Busy));
            }
            Err(e) => {
                let error = SyncError::from(e);
                lock(&self.errors).push(error.clone());
                return Err(RefreshOutcome::rejected(self.items(), error));
            }
        };

        *lock(&self.last_refresh) = Some(Instant::now());
        debug!(forced, "refresh accepted");

        Ok(PendingRefresh {
            gate,
            queue: Arc::clone(&self.queue),
            state: Arc::clone(&self.state),
            service: Arc::clone(&self.service),
            timeout: self.config.remote_timeout(),
        })
    }

    pub(super) fn finish_refresh(&self, fetched: FetchedRefresh) -> RefreshOutcome {
        match fetched.result {
            Ok(campaigns) => {
                let count = campaigns.len();
                let items = Arc::new(campaigns);
                *self.items.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&items);
                lock(&self.errors).clear();
                info!(count, "refresh applied");
                RefreshOutcome {
                    items,
                    errors: Vec::new(),
                    fetched: true,
                }
            }
            Err(e) => {
                lock(&self.errors).push(e.clone());
                RefreshOutcome {
                    items: self.items(),
                    errors: vec![e],
                    fetched: true,
                }
            }
        }
    }

    /// Copy-on-write edit of the snapshot. The new list is published only if
    /// `edit` reports a change.
    fn patch_items(&self, edit: impl FnOnce(&mut Vec<Campaign>) -> bool) -> bool {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = (**items).clone();
        let changed = edit(&mut next);
        if changed {
            *items = Arc::new(next);
        }
        changed
    }

    fn fail(&self, error: SyncError) -> Vec<SyncError> {
        lock(&self.errors).push(error.clone());
        vec![error]
    }
}

impl<S: RemoteCampaignService + 'static> CampaignSyncStore<S> {
    /// Refresh after `delay` on a background task.
    ///
    /// The task only holds a weak reference: if the store is dropped before
    /// the refresh starts or while it is in flight, the result is discarded.
    pub fn schedule_refresh(self: &Arc<Self>, delay: Duration, forced: bool) -> ScheduledRefresh {
        debug!(?delay, forced, "refresh scheduled");
        ScheduledRefresh::spawn(Arc::downgrade(self), delay, forced)
    }

    /// `create`, then on success schedule a forced refresh after
    /// `post_mutation_refresh_delay` so the new campaign shows up.
    pub async fn create_and_schedule_refresh(
        self: &Arc<Self>,
        draft: CampaignDraft,
    ) -> (Vec<SyncError>, Option<ScheduledRefresh>) {
        let errors = self.create(draft).await;
        if !errors.is_empty() {
            return (errors, None);
        }
        let refresh = self.schedule_refresh(self.config.post_mutation_refresh_delay(), true);
        (errors, Some(refresh))
    }
}
