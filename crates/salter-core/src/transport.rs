//! Transport abstraction over the upstream HTTP API.
//!
//! The core never talks to the network directly; it goes through the
//! [`Transport`] trait so tests can inject deterministic doubles. The
//! production implementation is [`ReqwestTransport`].

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::UpstreamError;
use crate::scramble::SeedPayload;

/// Minimal HTTP method set needed by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request envelope handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: 10_000,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Apply the upstream's `Salter` authorization scheme.
    pub fn with_token(self, token: &str) -> Self {
        self.with_header("authorization", format!("Salter {token}"))
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.with_header("content-type", "application/json")
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Response envelope returned by a transport. Only successful statuses reach
/// callers; error statuses are mapped to [`UpstreamError`] by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Maps a non-success status to the matching error kind. 401/403 carry the
/// distinguished unauthorized kind that triggers token invalidation upstream.
fn status_to_error(response: &HttpResponse) -> UpstreamError {
    match response.status {
        401 | 403 => UpstreamError::unauthorized(response.status),
        status => UpstreamError::status(status, format!("upstream returned status {status}")),
    }
}

/// Upstream transport contract.
pub trait Transport: Send + Sync {
    /// Fetch a fresh seed payload from the authentication endpoint.
    fn fetch_seed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<SeedPayload, UpstreamError>> + Send + 'a>>;

    /// Execute a data request. Implementations resolve non-success statuses
    /// to errors so callers only see decoded-worthy responses.
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, UpstreamError>> + Send + 'a>>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Arc<reqwest::Client>,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport with the session defaults the upstream expects:
    /// browser user agent, Referer/Origin pinned to the base URL, and
    /// certificate validation relaxed because the exchange serves an
    /// incomplete chain.
    pub fn new(config: &ClientConfig) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Ok(value) = reqwest::header::HeaderValue::from_str(&config.base_url) {
            headers.insert(reqwest::header::REFERER, value.clone());
            headers.insert(reqwest::header::ORIGIN, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .danger_accept_invalid_certs(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, UpstreamError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = builder.timeout(Duration::from_millis(request.timeout_ms));
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::timeout(format!("request timeout: {e}"))
            } else {
                UpstreamError::network(format!("request failed: {e}"))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::invalid_body(format!("failed to read body: {e}")))?;

        let response = HttpResponse { status, body };
        if response.is_success() {
            Ok(response)
        } else {
            Err(status_to_error(&response))
        }
    }
}

impl Transport for ReqwestTransport {
    fn fetch_seed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<SeedPayload, UpstreamError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/api/authenticate/prove", self.base_url);
            let response = self.send(HttpRequest::get(url)).await?;
            serde_json::from_str(&response.body)
                .map_err(|e| UpstreamError::invalid_body(format!("malformed seed payload: {e}")))
        })
    }

    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, UpstreamError>> + Send + 'a>> {
        Box::pin(self.send(request))
    }
}

/// Offline transport with a canned seed and scripted responses.
///
/// Responses are consumed in order; once the script is exhausted every call
/// returns an empty JSON object. Call counters make duplicate-fetch
/// assertions possible.
#[derive(Debug, Default)]
pub struct StaticTransport {
    seed: Option<SeedPayload>,
    seed_delay: Duration,
    seed_calls: AtomicUsize,
    call_count: AtomicUsize,
    responses: Mutex<VecDeque<Result<HttpResponse, UpstreamError>>>,
}

impl StaticTransport {
    pub fn new(seed: SeedPayload) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// A transport whose seed fetches always fail, for auth-failure paths.
    pub fn without_seed() -> Self {
        Self::default()
    }

    /// Hold every seed fetch for `delay`, widening the window in which
    /// concurrent refreshes would be observable.
    pub fn with_seed_delay(mut self, delay: Duration) -> Self {
        self.seed_delay = delay;
        self
    }

    /// Queue the next `execute` outcome.
    pub fn push_response(&self, response: Result<HttpResponse, UpstreamError>) {
        self.responses
            .lock()
            .expect("response queue poisoned")
            .push_back(response);
    }

    pub fn seed_calls(&self) -> usize {
        self.seed_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Transport for StaticTransport {
    fn fetch_seed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<SeedPayload, UpstreamError>> + Send + 'a>> {
        Box::pin(async move {
            self.seed_calls.fetch_add(1, Ordering::SeqCst);
            if !self.seed_delay.is_zero() {
                tokio::time::sleep(self.seed_delay).await;
            }
            self.seed
                .clone()
                .ok_or_else(|| UpstreamError::network("no seed configured"))
        })
    }

    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, UpstreamError>> + Send + 'a>> {
        Box::pin(async move {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let next = self
                .responses
                .lock()
                .expect("response queue poisoned")
                .pop_front();
            next.unwrap_or_else(|| Ok(HttpResponse::ok_json("{}")))
        })
    }
}
