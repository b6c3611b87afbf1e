//! Error types for the resource browser engine
//!
//! Provides unified error handling using thiserror.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{ErrorResponse, ResourceKind, Scope};

// == Cache Error Enum ==
/// Errors raised by the cache store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A single entry is larger than the whole cache budget
    #[error("Entry for key '{key}' is {size} bytes, cache limit is {max} bytes")]
    EntryTooLarge { key: String, size: usize, max: usize },
}

// == Failure Kind ==
/// Classification of a failed remote call.
///
/// `Timeout` and `Network` are transient; everything else is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Timeout,
    Network,
    QuotaExceeded,
    PermissionDenied,
    Unauthenticated,
    NotFound,
    ServiceNotEnabled,
    Unexpected,
}

impl FailureKind {
    /// Returns true if a failure of this kind is worth another attempt.
    pub fn is_retryable(self) -> bool {
        matches!(self, FailureKind::Timeout | FailureKind::Network)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network",
            FailureKind::QuotaExceeded => "quota exceeded",
            FailureKind::PermissionDenied => "permission denied",
            FailureKind::Unauthenticated => "unauthenticated",
            FailureKind::NotFound => "not found",
            FailureKind::ServiceNotEnabled => "service not enabled",
            FailureKind::Unexpected => "unexpected",
        };
        f.write_str(name)
    }
}

// == Call Error ==
/// Typed failure surfaced by the resilient call executor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed ({kind}): {cause}")]
pub struct CallError {
    /// Failure classification
    pub kind: FailureKind,
    /// Label of the operation that failed
    pub operation: String,
    /// Human-readable cause
    pub cause: String,
}

impl CallError {
    pub fn new(kind: FailureKind, operation: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            kind,
            operation: operation.into(),
            cause: cause.into(),
        }
    }
}

// == State Error ==
/// Errors raised by the resource state manager.
#[derive(Error, Debug)]
pub enum StateError {
    /// The scope shape does not fit the resource kind
    #[error("Scope {scope} is not valid for {kind}")]
    ScopeMismatch { kind: ResourceKind, scope: Scope },

    /// No fetcher registered for the resource kind
    #[error("No fetcher registered for {0}")]
    NoFetcher(ResourceKind),

    /// The fetcher raised; passed through unchanged
    #[error(transparent)]
    Fetch(#[from] anyhow::Error),
}

// == API Error ==
/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Path segment does not name a resource kind
    #[error("Unknown resource kind '{0}'")]
    UnknownKind(String),

    #[error(transparent)]
    State(#[from] StateError),
}

// == Config Error ==
/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for StateError {
    fn into_response(self) -> Response {
        let status = match &self {
            StateError::ScopeMismatch { .. } => StatusCode::BAD_REQUEST,
            StateError::NoFetcher(_) => StatusCode::NOT_IMPLEMENTED,
            StateError::Fetch(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::UnknownKind(_) => {
                let body = Json(ErrorResponse::new(self.to_string()));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::State(err) => err.into_response(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for state manager operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// Result type of HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
