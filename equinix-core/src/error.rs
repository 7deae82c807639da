//! Unified error type definition

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

pub use equinix_api::ApiError;
use equinix_api::Connection;

/// Why a convergence poll ended without reaching a target state.
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum WaitError {
    /// Budget exhausted before any target state was observed
    #[error("timeout after {}s (last state: {})", .timeout.as_secs(), .last_state.as_deref().unwrap_or("none"))]
    Timeout {
        timeout: Duration,
        attempts: u32,
        last_state: Option<String>,
    },

    /// The state lookup itself failed; polling stops on the first failure
    #[error("{0}")]
    FetchFailed(ApiError),

    /// Only raised by strict polls
    #[error("unexpected state '{state}', expected one of [{}]", .expected.join(", "))]
    UnexpectedState { state: String, expected: Vec<String> },

    /// The operation's cancellation token fired
    #[error("cancelled")]
    Cancelled,

    #[error("invalid poll configuration: {0}")]
    InvalidConfig(String),
}

impl WaitError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A convergence wait failed, with the resource it was waiting on
    #[error("error waiting for {kind} ({id}) to be {action}: {source}")]
    Wait {
        kind: String,
        id: String,
        action: String,
        source: WaitError,
    },

    /// The desired state matches the remote one
    #[error("nothing to update for {kind} ({id})")]
    NothingToUpdate { kind: String, id: String },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Some changes of an update failed; `latest` is the connection as last observed
    #[error("{}", .failures.join("; "))]
    PartialUpdate {
        failures: Vec<String>,
        latest: Box<Connection>,
    },

    /// API error (converting from library)
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl CoreError {
    pub fn wait(
        kind: impl Into<String>,
        id: impl Into<String>,
        action: impl Into<String>,
        source: WaitError,
    ) -> Self {
        Self::Wait {
            kind: kind.into(),
            id: id.into(),
            action: action.into(),
            source,
        }
    }

    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NothingToUpdate { .. } | Self::ValidationError(_) => true,
            Self::Api(e) => e.is_expected(),
            Self::Wait { source, .. } => match source {
                WaitError::FetchFailed(e) => e.is_expected(),
                WaitError::Cancelled => true,
                _ => false,
            },
            Self::PartialUpdate { .. } => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_error_is_wrapped_with_resource_context() {
        let err = CoreError::wait(
            "connection",
            "c-1",
            "created",
            WaitError::Timeout {
                timeout: Duration::from_secs(870),
                attempts: 30,
                last_state: Some("PROVISIONING".to_string()),
            },
        );
        assert_eq!(
            err.to_string(),
            "error waiting for connection (c-1) to be created: timeout after 870s (last state: PROVISIONING)"
        );
    }

    #[test]
    fn fetch_failure_keeps_api_message() {
        let err = CoreError::wait(
            "network",
            "n-1",
            "deleted",
            WaitError::FetchFailed(ApiError::NetworkError {
                service: "fabric".to_string(),
                detail: "reset".to_string(),
            }),
        );
        assert!(err.to_string().ends_with("[fabric] Network error: reset"));
        assert!(!err.is_expected());
    }

    #[test]
    fn partial_update_joins_messages() {
        let err = CoreError::PartialUpdate {
            failures: vec!["a failed".to_string(), "b failed".to_string()],
            latest: Box::default(),
        };
        assert_eq!(err.to_string(), "a failed; b failed");
        assert!(!err.is_expected());
    }

    #[test]
    fn serializes_adjacently_tagged() {
        let err = CoreError::NothingToUpdate {
            kind: "network".to_string(),
            id: "n-1".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NothingToUpdate");
        assert_eq!(json["details"]["id"], "n-1");
    }
}
