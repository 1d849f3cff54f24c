//! Cache behavior observed through the client: TTL expiry, LRU eviction,
//! targeted invalidation, and the disabled mode.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use salter_core::{CacheKey, ClientConfig, HttpResponse};

use salter_tests::{client_with, offline_client, transport};

#[tokio::test]
async fn entries_expire_after_their_ttl() {
    let (_transport, client) = offline_client();
    let loads = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new("ttl_probe");

    for _ in 0..2 {
        let counting = loads.clone();
        client
            .cached_call(key.clone(), Duration::from_millis(60), move || async move {
                counting.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"v": 1}))
            })
            .await
            .unwrap();
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;

    let counting = loads.clone();
    client
        .cached_call(key, Duration::from_millis(60), move || async move {
            counting.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"v": 2}))
        })
        .await
        .unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn least_recently_used_entry_is_evicted_at_capacity() {
    let config = ClientConfig::default().with_cache_max_entries(2);
    let client = client_with(transport(), config);
    let loads = Arc::new(AtomicUsize::new(0));

    let load = |name: &str| {
        let key = CacheKey::new(name);
        let counting = loads.clone();
        let client = &client;
        async move {
            client
                .cached_call(key, Duration::from_secs(60), move || async move {
                    counting.fetch_add(1, Ordering::SeqCst);
                    Ok(json!(1))
                })
                .await
                .unwrap();
        }
    };

    load("a").await;
    load("b").await;
    // Touch "a" so "b" becomes the least recently used entry.
    load("a").await;
    load("c").await;
    assert_eq!(loads.load(Ordering::SeqCst), 3);

    // "a" survived the eviction, "b" did not.
    load("a").await;
    assert_eq!(loads.load(Ordering::SeqCst), 3);
    load("b").await;
    assert_eq!(loads.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn invalidating_one_key_leaves_the_rest_cached() {
    let (transport, client) = offline_client();
    transport.push_response(Ok(HttpResponse::ok_json(r#"{"isOpen":"OPEN"}"#)));
    transport.push_response(Ok(HttpResponse::ok_json("[{\"index\":\"NEPSE Index\"}]")));
    transport.push_response(Ok(HttpResponse::ok_json(r#"{"isOpen":"CLOSE"}"#)));

    client.market_status().await.unwrap();
    client.nepse_index().await.unwrap();
    assert_eq!(transport.calls(), 2);

    client.invalidate(&CacheKey::new("market_status")).await;

    let status = client.market_status().await.unwrap();
    assert_eq!(status["isOpen"], "CLOSE");
    client.nepse_index().await.unwrap();
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn parameterized_keys_cache_independently() {
    let (transport, client) = offline_client();
    transport.push_response(Ok(HttpResponse::ok_json(r#"{"securityId":131}"#)));
    transport.push_response(Ok(HttpResponse::ok_json(r#"{"securityId":132}"#)));

    let first = client.security_details(131).await.unwrap();
    let second = client.security_details(132).await.unwrap();
    assert_eq!(first["securityId"], 131);
    assert_eq!(second["securityId"], 132);
    assert_eq!(transport.calls(), 2);

    // Same parameters hit the cache.
    client.security_details(131).await.unwrap();
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn disabled_cache_bypasses_storage_entirely() {
    let config = ClientConfig::default().with_cache_enabled(false);
    let client = client_with(transport(), config);
    let loads = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let counting = loads.clone();
        client
            .cached_call(
                CacheKey::new("bypass"),
                Duration::from_secs(60),
                move || async move {
                    counting.fetch_add(1, Ordering::SeqCst);
                    Ok(json!(1))
                },
            )
            .await
            .unwrap();
    }
    assert_eq!(loads.load(Ordering::SeqCst), 3);
}
