//! Failure classification.
//!
//! Turns the evidence a remote client gives us (a status code and a message)
//! into one of the fixed [`FailureKind`]s, plus a readable cause.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

use crate::error::FailureKind;

static PERMISSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Permission ['"]([^'"]+)['"]"#).expect("valid regex"));

static API_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z]+\.googleapis\.com)").expect("valid regex"));

static API_BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"API \[([^\]]+)\]").expect("valid regex"));

// == Remote Code ==
/// Status category reported by a remote client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCode {
    /// Service unavailable / connection dropped
    Unavailable,
    /// Server-side deadline exceeded
    DeadlineExceeded,
    /// Quota or rate limit exhausted
    ResourceExhausted,
    PermissionDenied,
    Forbidden,
    Unauthenticated,
    NotFound,
    /// Any other error reported by the provider API
    Api,
    /// Not an API error at all
    Unknown,
}

// == Remote Error ==
/// Failure evidence handed to the executor by an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub code: RemoteCode,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: RemoteCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// == Classify ==
/// Maps failure evidence to a failure kind.
pub fn classify(err: &RemoteError) -> FailureKind {
    match err.code {
        RemoteCode::Unavailable | RemoteCode::DeadlineExceeded => FailureKind::Network,
        RemoteCode::ResourceExhausted => FailureKind::QuotaExceeded,
        RemoteCode::PermissionDenied | RemoteCode::Forbidden => FailureKind::PermissionDenied,
        RemoteCode::Unauthenticated => FailureKind::Unauthenticated,
        RemoteCode::NotFound => FailureKind::NotFound,
        RemoteCode::Api if is_service_disabled(&err.message) => FailureKind::ServiceNotEnabled,
        RemoteCode::Api | RemoteCode::Unknown => FailureKind::Unexpected,
    }
}

fn is_service_disabled(message: &str) -> bool {
    message.contains("has not been used") || message.contains("API has not been enabled")
}

// == Describe ==
/// Builds the human-readable cause for a classified failure.
///
/// `quota_wait` is the hint given to the user for quota failures.
pub fn describe_failure(kind: FailureKind, err: &RemoteError, quota_wait: Duration) -> String {
    match kind {
        FailureKind::PermissionDenied => match extract_permission(&err.message) {
            Some(permission) => format!(
                "Missing permission: {}. Grant this permission in IAM or contact your administrator.",
                permission
            ),
            None => err.message.clone(),
        },
        FailureKind::ServiceNotEnabled => {
            let api = extract_api_name(&err.message);
            format!(
                "Cloud API not enabled: {}. Enable it at: https://console.cloud.google.com/apis/library/{}. Error: {}",
                api, api, err.message
            )
        }
        FailureKind::QuotaExceeded => format!(
            "API quota exceeded. Please wait {}s or request a quota increase. Error: {}",
            quota_wait.as_secs(),
            err.message
        ),
        FailureKind::Unauthenticated => format!(
            "Authentication failed. Please run 'gcloud auth application-default login'. Error: {}",
            err.message
        ),
        _ => err.message.clone(),
    }
}

/// Pulls the permission name out of messages like `Permission 'compute.instances.list' denied`.
fn extract_permission(message: &str) -> Option<String> {
    PERMISSION_RE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_api_name(message: &str) -> String {
    [&*API_HOST_RE, &*API_BRACKET_RE]
        .into_iter()
        .find_map(|re| re.captures(message).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "the required API".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(code: RemoteCode, message: &str) -> FailureKind {
        classify(&RemoteError::new(code, message))
    }

    #[test]
    fn test_transient_codes_are_network() {
        assert_eq!(kind_of(RemoteCode::Unavailable, "503"), FailureKind::Network);
        assert_eq!(kind_of(RemoteCode::DeadlineExceeded, "504"), FailureKind::Network);
    }

    #[test]
    fn test_terminal_codes() {
        assert_eq!(kind_of(RemoteCode::ResourceExhausted, ""), FailureKind::QuotaExceeded);
        assert_eq!(kind_of(RemoteCode::PermissionDenied, ""), FailureKind::PermissionDenied);
        assert_eq!(kind_of(RemoteCode::Forbidden, ""), FailureKind::PermissionDenied);
        assert_eq!(kind_of(RemoteCode::Unauthenticated, ""), FailureKind::Unauthenticated);
        assert_eq!(kind_of(RemoteCode::NotFound, ""), FailureKind::NotFound);
        assert_eq!(kind_of(RemoteCode::Unknown, "boom"), FailureKind::Unexpected);
    }

    #[test]
    fn test_api_error_service_not_enabled() {
        let message = "Cloud SQL Admin API has not been used in project 123 before or it is disabled";
        assert_eq!(kind_of(RemoteCode::Api, message), FailureKind::ServiceNotEnabled);
        assert_eq!(kind_of(RemoteCode::Api, "bad request"), FailureKind::Unexpected);
    }

    #[test]
    fn test_describe_permission_extracts_name() {
        let err = RemoteError::new(
            RemoteCode::PermissionDenied,
            "Permission 'compute.instances.list' denied on resource",
        );
        let cause = describe_failure(FailureKind::PermissionDenied, &err, Duration::from_secs(60));
        assert!(cause.starts_with("Missing permission: compute.instances.list."));

        let err = RemoteError::new(RemoteCode::Forbidden, "caller lacks access");
        let cause = describe_failure(FailureKind::PermissionDenied, &err, Duration::from_secs(60));
        assert_eq!(cause, "caller lacks access");
    }

    #[test]
    fn test_describe_service_not_enabled_extracts_api() {
        let err = RemoteError::new(
            RemoteCode::Api,
            "sqladmin.googleapis.com has not been used in project 42",
        );
        let cause = describe_failure(FailureKind::ServiceNotEnabled, &err, Duration::ZERO);
        assert!(cause.contains("Cloud API not enabled: sqladmin.googleapis.com."));

        let err = RemoteError::new(RemoteCode::Api, "API [Secret Manager] has not been enabled");
        let cause = describe_failure(FailureKind::ServiceNotEnabled, &err, Duration::ZERO);
        assert!(cause.contains("Cloud API not enabled: Secret Manager."));

        let err = RemoteError::new(RemoteCode::Api, "API has not been enabled");
        let cause = describe_failure(FailureKind::ServiceNotEnabled, &err, Duration::ZERO);
        assert!(cause.contains("the required API"));
    }

    #[test]
    fn test_describe_quota_mentions_wait() {
        let err = RemoteError::new(RemoteCode::ResourceExhausted, "rate limited");
        let cause = describe_failure(FailureKind::QuotaExceeded, &err, Duration::from_secs(60));
        assert!(cause.contains("wait 60s"));
        assert!(cause.ends_with("rate limited"));
    }
}
