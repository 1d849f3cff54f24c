//! Error taxonomy for the client.
//!
//! Derivation failures and upstream failures are kept distinct so callers can
//! tell transform drift (re-derive will not help) from transient network
//! trouble (retry after backoff may help). Cache operations never error;
//! absence of a cached value is an ordinary outcome, not a failure.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Failures while descrambling a seed payload into a usable token.
///
/// These signal that either the seed was malformed or the upstream transform
/// has drifted from the tables bundled with this crate. They are not retried
/// automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenDerivationError {
    #[error("seed salt '{name}' must be a positive integer, got {value}")]
    InvalidSalt { name: &'static str, value: i64 },
    #[error("scrambled token is too short: {len} chars, need at least {min}")]
    TokenTooShort { len: usize, min: usize },
    #[error("drop index {index} is out of range for token of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("transform produced duplicate drop index {index}")]
    DuplicateIndex { index: usize },
    #[error("token is structurally invalid: {reason}")]
    MalformedToken { reason: &'static str },
}

/// Upstream failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// Connection-level failure (DNS, TLS, reset).
    Network,
    /// The request exceeded its timeout budget.
    Timeout,
    /// 401/403-class rejection; the held token should be invalidated.
    Unauthorized,
    /// Any other non-success HTTP status.
    Status,
    /// The response body could not be decoded.
    InvalidBody,
}

/// Structured transport/upstream error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    kind: UpstreamErrorKind,
    message: String,
    status: Option<u16>,
}

impl UpstreamError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::Network,
            message: message.into(),
            status: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::Timeout,
            message: message.into(),
            status: None,
        }
    }

    pub fn unauthorized(status: u16) -> Self {
        Self {
            kind: UpstreamErrorKind::Unauthorized,
            message: format!("upstream rejected the request with status {status}"),
            status: Some(status),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::Status,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::InvalidBody,
            message: message.into(),
            status: None,
        }
    }

    pub const fn kind(&self) -> UpstreamErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn http_status(&self) -> Option<u16> {
        self.status
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.kind, UpstreamErrorKind::Unauthorized)
    }

    /// Whether a retry with the same request could plausibly succeed.
    pub const fn retryable(&self) -> bool {
        matches!(
            self.kind,
            UpstreamErrorKind::Network | UpstreamErrorKind::Timeout
        )
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            UpstreamErrorKind::Network => "upstream.network",
            UpstreamErrorKind::Timeout => "upstream.timeout",
            UpstreamErrorKind::Unauthorized => "upstream.unauthorized",
            UpstreamErrorKind::Status => "upstream.status",
            UpstreamErrorKind::InvalidBody => "upstream.invalid_body",
        }
    }
}

impl Display for UpstreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for UpstreamError {}

/// Failure to produce a valid token inside `ensure_token`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("seed fetch failed: {0}")]
    Seed(#[from] UpstreamError),
    #[error("token derivation failed: {0}")]
    Derivation(#[from] TokenDerivationError),
}

/// Top-level error surfaced by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// The unauthorized signal used to decide whether to force a token refresh.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Upstream(err) if err.is_unauthorized())
    }
}
