//! Deferred refreshes and their tie to the store's lifetime.

use std::sync::Arc;
use std::time::Duration;

use campaign_sync::{
    CampaignDraft, CampaignSyncStore, InMemoryCampaignService, RemoteError, RemoteOp,
};

use crate::support::{config, init_tracing};

fn shared_store(
    service: &InMemoryCampaignService,
) -> Arc<CampaignSyncStore<InMemoryCampaignService>> {
    init_tracing();
    Arc::new(CampaignSyncStore::with_config(service.clone(), config()))
}

#[tokio::test(start_paused = true)]
async fn create_then_scheduled_refresh_shows_new_campaign() {
    let service = InMemoryCampaignService::new();
    let store = shared_store(&service);

    let (errors, scheduled) = store
        .create_and_schedule_refresh(CampaignDraft::test_campaign())
        .await;
    assert!(errors.is_empty());
    assert!(store.items().is_empty());

    let outcome = scheduled.expect("refresh scheduled").wait().await.unwrap();
    assert!(outcome.fetched);
    assert_eq!(outcome.items.len(), 1);
    assert_eq!(store.items().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_create_schedules_nothing() {
    let service = InMemoryCampaignService::new();
    service.fail_next(RemoteOp::Create, RemoteError::Rejected("invalid".into()));
    let store = shared_store(&service);

    let (errors, scheduled) = store.create_and_schedule_refresh(CampaignDraft::new()).await;

    assert_eq!(errors.len(), 1);
    assert!(scheduled.is_none());
}

#[tokio::test(start_paused = true)]
async fn scheduled_refresh_waits_for_delay() {
    let service = InMemoryCampaignService::new();
    let store = shared_store(&service);

    let scheduled = store.schedule_refresh(Duration::from_secs(2), false);

    tokio::time::sleep(Duration::from_millis(1_999)).await;
    assert_eq!(service.calls(RemoteOp::List), 0);
    assert!(!scheduled.is_finished());

    assert!(scheduled.wait().await.is_some());
    assert_eq!(service.calls(RemoteOp::List), 1);
}

#[tokio::test(start_paused = true)]
async fn store_dropped_before_refresh_cancels_it() {
    let service = InMemoryCampaignService::new();
    let store = shared_store(&service);

    let scheduled = store.schedule_refresh(Duration::from_secs(2), true);
    drop(store);

    assert!(scheduled.wait().await.is_none());
    assert_eq!(service.calls(RemoteOp::List), 0);
}

#[tokio::test(start_paused = true)]
async fn store_dropped_during_refresh_discards_result() {
    let service = InMemoryCampaignService::new().with_latency(Duration::from_secs(1));
    let store = shared_store(&service);

    let scheduled = store.schedule_refresh(Duration::ZERO, true);
    for _ in 0..1_000 {
        if service.calls(RemoteOp::List) == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(service.calls(RemoteOp::List), 1);

    drop(store);
    assert!(scheduled.wait().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn aborted_refresh_returns_none() {
    let service = InMemoryCampaignService::new();
    let store = shared_store(&service);

    let scheduled = store.schedule_refresh(Duration::from_secs(10), true);
    scheduled.abort();

    assert!(scheduled.wait().await.is_none());
    assert_eq!(service.calls(RemoteOp::List), 0);
    assert!(store.can_refresh());
}
