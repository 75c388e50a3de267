//! `?wait=true&value=...&maxWait=...` end to end.

use crate::common::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn wait_config(default_secs: u64, max_secs: u64) -> WaitConfig {
    WaitConfig {
        default_secs,
        max_secs,
        ..WaitConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn differing_value_returns_immediately() {
    let store = store_with(sample_tree());
    let start = Instant::now();
    let resp = get(
        router(&store),
        "/2015-07-25/hosts/h1/state?wait=true&value=inactive&maxWait=30",
    )
    .await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "active");
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn unchanged_value_returns_current_after_max_wait() {
    let store = store_with(sample_tree());
    let start = Instant::now();
    let resp = get(
        router(&store),
        "/2015-07-25/hosts/h1/state?wait=true&value=active&maxWait=5",
    )
    .await;
    let elapsed = start.elapsed();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "active");
    assert!(elapsed >= Duration::from_secs(5), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(6), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn max_wait_is_capped() {
    let store = store_with(sample_tree());
    let app = router_with(&store, wait_config(1, 2), false);
    let start = Instant::now();
    get(app, "/2015-07-25/version?wait=true&value=1&maxWait=50").await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn unparseable_max_wait_uses_default() {
    let store = store_with(sample_tree());
    let app = router_with(&store, wait_config(3, 120), false);
    let start = Instant::now();
    get(app, "/2015-07-25/version?wait=true&value=1&maxWait=soon").await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(3), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn wait_without_value_is_a_plain_lookup() {
    let store = store_with(sample_tree());
    let start = Instant::now();
    let resp = get(router(&store), "/2015-07-25/hosts/h1/state?wait=true").await;
    assert_eq!(resp.body, "active");
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn publish_wakes_the_waiter() {
    let store = store_with(json!({"v1": {"state": "old"}}));
    let app = router(&store);
    let start = Instant::now();
    let waiter = tokio::spawn(async move {
        get(app, "/v1/state?wait=true&value=old&maxWait=60").await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    store.publish(snapshot(json!({"v1": {"state": "new"}})));

    let resp = waiter.await.unwrap();
    assert_eq!(resp.body, "new");
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn latest_is_re_resolved_while_waiting() {
    let store = store_with(json!({"2015-07-25": {"v": "a"}}));
    let app = router(&store);
    let waiter = tokio::spawn(async move {
        get(app, "/latest/v?wait=true&value=a&maxWait=60").await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    store.publish(snapshot(json!({
        "2015-07-25": {"v": "a"},
        "2016-07-29": {"v": "b"}
    })));

    assert_eq!(waiter.await.unwrap().body, "b");
}

#[tokio::test(start_paused = true)]
async fn missing_path_times_out_as_not_found() {
    let store = store_with(sample_tree());
    let start = Instant::now();
    let resp = get(
        router(&store),
        "/2015-07-25/nowhere?wait=true&value=x&maxWait=2",
    )
    .await;
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, "Not found\n");
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn path_appearing_during_wait_is_returned() {
    let store = store_with(json!({"v1": {}}));
    let app = router(&store);
    let waiter = tokio::spawn(async move {
        get(app, "/v1/added?wait=true&value=&maxWait=60").await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    store.publish(snapshot(json!({"v1": {"added": "here"}})));

    let resp = waiter.await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "here");
}

#[tokio::test(start_paused = true)]
async fn many_waiters_all_wake() {
    let store = store_with(json!({"v1": {"n": 1}}));
    let mut waiters = Vec::new();
    for _ in 0..8 {
        let app = router(&store);
        waiters.push(tokio::spawn(async move {
            get(app, "/v1/n?wait=true&value=1&maxWait=60").await
        }));
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    store.publish(snapshot(json!({"v1": {"n": 2}})));

    for waiter in waiters {
        assert_eq!(waiter.await.unwrap().body, "2");
    }
}

#[tokio::test(start_paused = true)]
async fn aborted_request_releases_the_waiter() {
    let store = store_with(json!({"v1": {"n": 1}}));
    let app = router(&store);
    let waiter = tokio::spawn(async move {
        get(app, "/v1/n?wait=true&value=1&maxWait=60").await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.subscribers(), 1);
    assert!(Arc::strong_count(&store) > 1);

    waiter.abort();
    assert!(waiter.await.unwrap_err().is_cancelled());
    assert_eq!(store.subscribers(), 0);
    assert_eq!(Arc::strong_count(&store), 1);
}

#[tokio::test]
async fn requests_run_on_spawned_tasks() {
    let store = store_with(sample_tree());
    let app = router(&store);
    let resp = tokio::spawn(async move { get(app, "/2015-07-25/version").await })
        .await
        .unwrap();
    assert_eq!(resp.body, "1");
}
