//! Shared fixtures for sync store tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use campaign_sync::{Campaign, CampaignSyncStore, InMemoryCampaignService, StoreState, SyncConfig};

pub const INTERVAL: Duration = Duration::from_secs(5);

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn campaigns(ids: &[&str]) -> Vec<Campaign> {
    ids.iter()
        .map(|id| Campaign::new(*id).with_title(format!("Campaign {}", id)))
        .collect()
}

pub fn config() -> SyncConfig {
    SyncConfig::default().with_minimum_refresh_interval(INTERVAL)
}

pub fn store_with(
    ids: &[&str],
) -> (InMemoryCampaignService, CampaignSyncStore<InMemoryCampaignService>) {
    init_tracing();
    let service = InMemoryCampaignService::with_campaigns(campaigns(ids));
    let store = CampaignSyncStore::with_config(service.clone(), config());
    (service, store)
}

pub fn ids(items: &[Campaign]) -> Vec<&str> {
    items.iter().map(|c| c.id.as_str()).collect()
}

/// Yield to spawned tasks until the store reaches `state`.
pub async fn wait_for_state(
    store: &Arc<CampaignSyncStore<InMemoryCampaignService>>,
    state: StoreState,
) {
    for _ in 0..1_000 {
        if store.state() == state {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("store never reached {}", state);
}
