//! End-to-end behavior of the token lifecycle: single-flight refresh,
//! forced invalidation on upstream rejection, and timeout recovery.

use std::sync::Arc;
use std::time::Duration;

use salter_core::scramble::scramble_seed;
use salter_core::{AuthError, ClientConfig, HttpResponse, StaticTransport, UpstreamError};

use salter_tests::{client_with, offline_client, seed, ACCESS, REFRESH, SALTS};

#[tokio::test]
async fn concurrent_token_requests_share_one_seed_fetch() {
    let transport =
        Arc::new(StaticTransport::new(seed()).with_seed_delay(Duration::from_millis(50)));
    let client = Arc::new(client_with(transport.clone(), ClientConfig::default()));

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move { client.ensure_token().await }));
    }
    for task in tasks {
        let token = task.await.unwrap().unwrap();
        assert_eq!(token.value(), ACCESS);
    }
    assert_eq!(transport.seed_calls(), 1);
}

#[tokio::test]
async fn unauthorized_call_forces_a_fresh_derivation() {
    let (transport, client) = offline_client();

    // Establish a token that is nowhere near its nominal expiry.
    client.ensure_token().await.unwrap();
    assert_eq!(transport.seed_calls(), 1);

    // The upstream rejects it anyway; the client must invalidate and retry
    // with a re-derived token.
    transport.push_response(Err(UpstreamError::unauthorized(401)));
    transport.push_response(Ok(HttpResponse::ok_json(r#"{"isOpen":"OPEN"}"#)));

    let status = client.market_status().await.unwrap();
    assert_eq!(status["isOpen"], "OPEN");
    assert_eq!(transport.seed_calls(), 2);
}

#[tokio::test]
async fn timed_out_refresh_does_not_wedge_the_manager() {
    let transport =
        Arc::new(StaticTransport::new(seed()).with_seed_delay(Duration::from_millis(200)));
    let client = client_with(transport.clone(), ClientConfig::default());

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), client.ensure_token()).await;
    assert!(timed_out.is_err());

    // The abandoned refresh resolved the state machine; a later caller gets
    // a token through a new refresh rather than hanging.
    let token = client.ensure_token().await.unwrap();
    assert_eq!(token.value(), ACCESS);
    assert_eq!(transport.seed_calls(), 2);
}

#[tokio::test]
async fn seed_fetch_failure_surfaces_as_auth_error() {
    let transport = Arc::new(StaticTransport::without_seed());
    let client = client_with(transport.clone(), ClientConfig::default());

    let err = client.ensure_token().await.unwrap_err();
    assert!(matches!(err, AuthError::Seed(_)));

    // Not stuck: every subsequent attempt retries the seed endpoint.
    assert!(client.ensure_token().await.is_err());
    assert_eq!(transport.seed_calls(), 2);
}

#[tokio::test]
async fn transform_drift_surfaces_as_derivation_error() {
    // A seed whose access token lost its JWT structure models the upstream
    // rotating its transform out from under the bundled tables.
    let mut drifted = scramble_seed(ACCESS, REFRESH, SALTS);
    drifted.access_token = drifted.access_token.replace('.', "!");
    let transport = Arc::new(StaticTransport::new(drifted));
    let client = client_with(transport, ClientConfig::default());

    let err = client.ensure_token().await.unwrap_err();
    assert!(matches!(err, AuthError::Derivation(_)));
}

#[tokio::test]
async fn safety_margin_refreshes_before_nominal_expiry() {
    let transport = Arc::new(StaticTransport::new(seed()));
    let config = ClientConfig::default()
        .with_token_validity(Duration::from_millis(50))
        .with_token_safety_margin(Duration::from_millis(40));
    let client = client_with(transport.clone(), config);

    client.ensure_token().await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    // Nominal expiry (50ms) has not passed, but the margin has eaten the
    // remaining validity.
    client.ensure_token().await.unwrap();
    assert_eq!(transport.seed_calls(), 2);
}
