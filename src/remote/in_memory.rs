//! InMemoryCampaignService - ordered in-memory backend for testing and development.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::{RemoteCampaignService, RemoteError, RemoteOp};
use crate::campaign::{Campaign, CampaignDraft};

const ID_PREFIX: &str = "campaign-";

#[derive(Default)]
struct State {
    campaigns: Vec<Campaign>,
    next_id: u64,
    calls: HashMap<RemoteOp, usize>,
    queued_failures: HashMap<RemoteOp, VecDeque<RemoteError>>,
    persistent_failures: HashMap<RemoteOp, RemoteError>,
    latency: Option<Duration>,
}

impl State {
    /// Store `campaign`, moving `next_id` past any `campaign-<n>` id it carries.
    fn push(&mut self, campaign: Campaign) {
        if let Some(n) = campaign
            .id
            .strip_prefix(ID_PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
        {
            self.next_id = self.next_id.max(n);
        }
        self.campaigns.push(campaign);
    }
}

/// In-memory campaign service keeping campaigns in creation order.
///
/// Ids are assigned as `campaign-<n>`, never reusing one already present.
/// Clone-friendly via Arc: clones share
/// storage, counters and injected failures, so a test can keep one handle
/// while the store owns another.
#[derive(Clone, Default)]
pub struct InMemoryCampaignService {
    state: Arc<RwLock<State>>,
}

impl InMemoryCampaignService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service pre-populated with `campaigns`, kept in order.
    pub fn with_campaigns(campaigns: impl IntoIterator<Item = Campaign>) -> Self {
        let service = Self::new();
        {
            let mut state = service.write();
            for campaign in campaigns {
                state.push(campaign);
            }
            let next_id = state.next_id.max(state.campaigns.len() as u64);
            state.next_id = next_id;
        }
        service
    }

    /// Delay every call by `latency` before it touches storage.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.write().latency = Some(latency);
        self
    }

    /// Make the next call of `op` fail with `error`. Queued failures are
    /// consumed in order, one per call.
    pub fn fail_next(&self, op: RemoteOp, error: RemoteError) {
        self.write()
            .queued_failures
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Make every call of `op` fail with `error` until `recover` is called.
    pub fn fail_always(&self, op: RemoteOp, error: RemoteError) {
        self.write().persistent_failures.insert(op, error);
    }

    /// Clear injected failures for `op`.
    pub fn recover(&self, op: RemoteOp) {
        let mut state = self.write();
        state.persistent_failures.remove(&op);
        state.queued_failures.remove(&op);
    }

    /// Number of calls made for `op`, including failed ones.
    pub fn calls(&self, op: RemoteOp) -> usize {
        self.read_state(|s| s.calls.get(&op).copied().unwrap_or(0))
    }

    /// Snapshot of the stored campaigns.
    pub fn campaigns(&self) -> Vec<Campaign> {
        self.read_state(|s| s.campaigns.clone())
    }

    /// Insert a campaign directly, bypassing call accounting. Simulates another
    /// client writing to the shared store.
    pub fn insert_external(&self, campaign: Campaign) {
        self.write().push(campaign);
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read_state<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    async fn begin(&self, op: RemoteOp) -> Result<(), RemoteError> {
        let latency = {
            let mut state = self.write();
            *state.calls.entry(op).or_insert(0) += 1;
            state.latency
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.write();
        if let Some(error) = state.persistent_failures.get(&op) {
            return Err(error.clone());
        }
        if let Some(error) = state
            .queued_failures
            .get_mut(&op)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteCampaignService for InMemoryCampaignService {
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, RemoteError> {
        self.begin(RemoteOp::List).await?;
        Ok(self.campaigns())
    }

    async fn create_campaign(&self, draft: CampaignDraft) -> Result<(), RemoteError> {
        self.begin(RemoteOp::Create).await?;
        let mut state = self.write();
        state.next_id += 1;
        let id = format!("{}{}", ID_PREFIX, state.next_id);
        state.campaigns.push(Campaign::from_draft(id, draft));
        Ok(())
    }

    async fn update_campaign(&self, campaign: Campaign) -> Result<(), RemoteError> {
        self.begin(RemoteOp::Update).await?;
        let mut state = self.write();
        let slot = state
            .campaigns
            .iter_mut()
            .find(|c| c.id == campaign.id)
            .ok_or_else(|| RemoteError::NotFound {
                id: campaign.id.clone(),
            })?;
        *slot = campaign;
        Ok(())
    }

    async fn delete_campaign(&self, id: &str) -> Result<(), RemoteError> {
        self.begin(RemoteOp::Delete).await?;
        let mut state = self.write();
        let position = state
            .campaigns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| RemoteError::NotFound { id: id.to_string() })?;
        state.campaigns.remove(position);
        Ok(())
    }
}
