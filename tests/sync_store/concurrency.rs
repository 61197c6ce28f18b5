//! Overlapping operations: busy rejection, FIFO serialization, cancellation.

use std::sync::Arc;
use std::time::Duration;

use campaign_sync::{
    Campaign, CampaignSyncStore, InMemoryCampaignService, RemoteOp, StoreState, SyncError,
};

use crate::support::{campaigns, config, ids, init_tracing, wait_for_state};

fn slow_store(
    ids: &[&str],
) -> (InMemoryCampaignService, Arc<CampaignSyncStore<InMemoryCampaignService>>) {
    init_tracing();
    let service = InMemoryCampaignService::with_campaigns(campaigns(ids))
        .with_latency(Duration::from_millis(100));
    let store = Arc::new(CampaignSyncStore::with_config(service.clone(), config()));
    (service, store)
}

#[tokio::test(start_paused = true)]
async fn overlapping_refresh_is_rejected_as_busy() {
    let (service, store) = slow_store(&["1", "2"]);

    let in_flight = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.refresh(true).await })
    };
    wait_for_state(&store, StoreState::Refreshing).await;

    let rejected = store.refresh(true).await;
    assert_eq!(rejected.errors, vec![SyncError::Busy]);
    assert!(!rejected.fetched);
    assert!(rejected.items.is_empty());

    let completed = in_flight.await.unwrap();
    assert!(completed.is_ok());
    assert_eq!(completed.items.len(), 2);
    assert_eq!(service.calls(RemoteOp::List), 1);

    // Busy is reported to the extra caller only.
    assert!(store.errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn non_forced_refresh_during_refresh_returns_cache() {
    let (service, store) = slow_store(&["1"]);

    let in_flight = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.refresh(true).await })
    };
    wait_for_state(&store, StoreState::Refreshing).await;

    let throttled = store.refresh(false).await;
    assert!(throttled.errors.is_empty());
    assert!(!throttled.fetched);

    in_flight.await.unwrap();
    assert_eq!(service.calls(RemoteOp::List), 1);
}

#[tokio::test(start_paused = true)]
async fn delete_queued_behind_refresh_is_not_overwritten() {
    let (_service, store) = slow_store(&["1", "2", "3"]);

    let refresh = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.refresh(true).await })
    };
    wait_for_state(&store, StoreState::Refreshing).await;

    // The listing in flight still contains "2"; the delete must land after it.
    let errors = store.delete(&Campaign::new("2")).await;
    assert!(errors.is_empty());

    let refreshed = refresh.await.unwrap();
    assert_eq!(ids(&refreshed.items), vec!["1", "2", "3"]);
    assert_eq!(ids(&store.items()), vec!["1", "3"]);
}

#[tokio::test(start_paused = true)]
async fn refresh_waits_for_running_mutation() {
    let (service, store) = slow_store(&["1", "2"]);
    store.refresh(true).await;

    let delete = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.delete(&Campaign::new("1")).await })
    };
    wait_for_state(&store, StoreState::Mutating).await;

    let outcome = store.refresh(true).await;

    assert!(delete.await.unwrap().is_empty());
    assert_eq!(ids(&outcome.items), vec!["2"]);
    assert_eq!(service.calls(RemoteOp::List), 2);
}

#[tokio::test(start_paused = true)]
async fn dropped_refresh_releases_the_gate() {
    let (service, store) = slow_store(&["1"]);

    let abandoned = tokio::time::timeout(Duration::from_millis(10), store.refresh(true)).await;
    assert!(abandoned.is_err());
    assert_eq!(store.state(), StoreState::Idle);
    assert!(store.items().is_empty());

    let outcome = store.refresh(true).await;
    assert!(outcome.is_ok());
    assert_eq!(ids(&outcome.items), vec!["1"]);
    assert_eq!(service.calls(RemoteOp::List), 2);
}

#[tokio::test(start_paused = true)]
async fn busy_refresh_keeps_last_refresh_time() {
    let (service, store) = slow_store(&["1"]);

    let in_flight = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.refresh(true).await })
    };
    wait_for_state(&store, StoreState::Refreshing).await;
    let stamped = store.last_refresh_time();
    assert!(stamped.is_some());

    tokio::time::sleep(Duration::from_millis(10)).await;
    let rejected = store.refresh(true).await;
    assert_eq!(rejected.errors, vec![SyncError::Busy]);
    assert_eq!(store.last_refresh_time(), stamped);

    in_flight.await.unwrap();
    assert_eq!(store.last_refresh_time(), stamped);
    assert_eq!(service.calls(RemoteOp::List), 1);
}

#[tokio::test(start_paused = true)]
async fn update_queued_behind_refresh_lands_last() {
    let (_service, store) = slow_store(&["1", "2"]);

    let refresh = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.refresh(true).await })
    };
    wait_for_state(&store, StoreState::Refreshing).await;

    let renamed = Campaign::new("2").with_title("Renamed");
    assert!(store.update(renamed).await.is_empty());
    refresh.await.unwrap();

    let items = store.items();
    assert_eq!(ids(&items), vec!["1", "2"]);
    assert_eq!(items[1].title.as_deref(), Some("Renamed"));
}
