//! # salter-core
//!
//! Client library for Nepal Stock Exchange (NEPSE) market data.
//!
//! The exchange's public API requires a rotating, obfuscated token: the
//! authentication endpoint returns a JWT pair with filler characters
//! injected at positions derived from five salts. This crate reconstructs
//! the clean token, manages its refresh lifecycle, and memoizes endpoint
//! responses so repeated reads do not hammer the upstream.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | Token lifecycle manager with single-flight refresh |
//! | [`blocking`] | Synchronous adapter over the async client |
//! | [`cache`] | TTL + LRU response cache and request fingerprints |
//! | [`client`] | High-level endpoint facade |
//! | [`config`] | Client configuration |
//! | [`error`] | Error taxonomy |
//! | [`scramble`] | Token descrambling engine (versioned index rules) |
//! | [`transport`] | HTTP transport trait, reqwest impl, offline double |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use salter_core::{ClientConfig, NepseClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NepseClient::new(ClientConfig::default());
//!     let status = client.market_status().await?;
//!     println!("market: {}", status["isOpen"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    miss    ┌───────────────┐
//! │  NepseClient │───────────▶│  TokenManager │──┐
//! │ (cached_call)│            │ (single-flight│  │
//! └──────┬───────┘            │    refresh)   │  │
//!        │ hit                └───────────────┘  │
//!        ▼                                       ▼
//! ┌──────────────┐            ┌───────────────────┐
//! │  CacheStore  │            │     Transport     │
//! │  (TTL + LRU) │◀───store───│ (reqwest / double)│
//! └──────────────┘            └───────────────────┘
//! ```
//!
//! All state is process-lifetime only; nothing is persisted to disk.

pub mod auth;
pub mod blocking;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod scramble;
pub mod transport;

pub use auth::{Token, TokenManager, TokenState};
pub use cache::{CacheKey, CacheStore};
pub use client::NepseClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{
    AuthError, ClientError, TokenDerivationError, UpstreamError, UpstreamErrorKind,
};
pub use scramble::{derive, SeedPayload, TokenPair, TRANSFORM_VERSION};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, StaticTransport, Transport,
};
