use serde::{Deserialize, Serialize};

/// Unified error type for every Equinix API call.
///
/// Each variant carries a `service` tag (`fabric`, `metal`, `network-edge`)
/// identifying which API produced it. Variants that originate from an HTTP
/// response keep the status and every error code the body listed, so callers
/// can special-case domain codes such as `EQ-3142509`.
///
/// # Retryable Errors
///
/// - [`NetworkError`](Self::NetworkError): connection failures and 502/503/504
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): HTTP 429
///
/// The built-in HTTP client retries these with exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// A network-level error occurred (DNS resolution failure, connection refused, gateway errors).
    NetworkError {
        /// Service that produced the error.
        service: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Service that produced the error.
        service: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Service that produced the error.
        service: String,
        /// Suggested wait time in seconds, if the API sent `Retry-After`.
        retry_after: Option<u64>,
        /// Original error body, if available.
        raw_message: Option<String>,
    },

    /// The credentials were rejected (HTTP 401 or a failed token exchange).
    InvalidCredentials {
        /// Service that produced the error.
        service: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The caller lacks permission for the operation (HTTP 403).
    PermissionDenied {
        /// Service that produced the error.
        service: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The resource does not exist (HTTP 404).
    NotFound {
        /// Service that produced the error.
        service: String,
        /// Identifier of the missing resource.
        resource_id: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The resource was already deleted (e.g. Fabric `EQ-3142509`).
    AlreadyDeleted {
        /// Service that produced the error.
        service: String,
        /// Identifier of the resource.
        resource_id: String,
        /// HTTP status of the response.
        status: u16,
        /// Every error code listed in the response body.
        codes: Vec<String>,
        /// Original error message.
        raw_message: String,
    },

    /// Another update is still in flight for this resource (Fabric `EQ-3040055`).
    UpdatePending {
        /// Service that produced the error.
        service: String,
        /// Identifier of the resource.
        resource_id: String,
        /// HTTP status of the response.
        status: u16,
        /// Every error code listed in the response body.
        codes: Vec<String>,
        /// Original error message.
        raw_message: String,
    },

    /// Any other 4xx rejection from the API.
    InvalidRequest {
        /// Service that produced the error.
        service: String,
        /// HTTP status of the response.
        status: u16,
        /// Every error code listed in the response body.
        codes: Vec<String>,
        /// Original error message.
        raw_message: String,
    },

    /// A client-side parameter or configuration value is invalid.
    InvalidParameter {
        /// Service the parameter belongs to.
        service: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Service that produced the error.
        service: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Service that produced the error.
        service: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// Catch-all for responses not mapped to a specific variant (mostly 5xx).
    Unknown {
        /// Service that produced the error.
        service: String,
        /// HTTP status of the response, if there was one.
        status: Option<u16>,
        /// Every error code listed in the response body.
        codes: Vec<String>,
        /// Original error message.
        raw_message: String,
    },
}

impl ApiError {
    /// 是否为预期行为（资源不存在、参数错误等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::NotFound { .. }
                | Self::AlreadyDeleted { .. }
                | Self::UpdatePending { .. }
                | Self::InvalidRequest { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// HTTP status of the response that produced this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::InvalidCredentials { .. } => Some(401),
            Self::PermissionDenied { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::AlreadyDeleted { status, .. }
            | Self::UpdatePending { status, .. }
            | Self::InvalidRequest { status, .. } => Some(*status),
            Self::Unknown { status, .. } => *status,
            Self::NetworkError { .. }
            | Self::Timeout { .. }
            | Self::InvalidParameter { .. }
            | Self::ParseError { .. }
            | Self::SerializationError { .. } => None,
        }
    }

    /// Whether the remote API answered with a 4xx status.
    ///
    /// Token-exchange failures surface as `InvalidCredentials` and count as 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_some_and(|s| (400..=499).contains(&s))
    }

    /// Whether the response body listed `code` among its error codes.
    #[must_use]
    pub fn has_error_code(&self, code: &str) -> bool {
        match self {
            Self::AlreadyDeleted { codes, .. }
            | Self::UpdatePending { codes, .. }
            | Self::InvalidRequest { codes, .. }
            | Self::Unknown { codes, .. } => codes.iter().any(|c| c == code),
            _ => false,
        }
    }

    /// Whether the error means the resource is gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// A delete rejected because an earlier one already went through.
    #[must_use]
    pub fn is_already_deleted(&self) -> bool {
        matches!(self, Self::AlreadyDeleted { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { service, detail } => {
                write!(f, "[{service}] Network error: {detail}")
            }
            Self::Timeout { service, detail } => {
                write!(f, "[{service}] Request timeout: {detail}")
            }
            Self::RateLimited {
                service,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{service}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{service}] Rate limited")
                }
            }
            Self::InvalidCredentials {
                service,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{service}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{service}] Invalid credentials")
                }
            }
            Self::PermissionDenied {
                service,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{service}] Permission denied: {msg}")
                } else {
                    write!(f, "[{service}] Permission denied")
                }
            }
            Self::NotFound {
                service,
                resource_id,
                ..
            } => {
                write!(f, "[{service}] Resource '{resource_id}' not found")
            }
            Self::AlreadyDeleted {
                service,
                resource_id,
                ..
            } => {
                write!(f, "[{service}] Resource '{resource_id}' is already deleted")
            }
            Self::UpdatePending {
                service,
                resource_id,
                raw_message,
                ..
            } => {
                write!(
                    f,
                    "[{service}] Resource '{resource_id}' has an update in progress: {raw_message}"
                )
            }
            Self::InvalidRequest {
                service,
                status,
                codes,
                raw_message,
            } => {
                if codes.is_empty() {
                    write!(f, "[{service}] HTTP {status}: {raw_message}")
                } else {
                    write!(
                        f,
                        "[{service}] HTTP {status} ({}): {raw_message}",
                        codes.join(", ")
                    )
                }
            }
            Self::InvalidParameter {
                service,
                param,
                detail,
            } => {
                write!(f, "[{service}] Invalid parameter '{param}': {detail}")
            }
            Self::ParseError { service, detail } => {
                write!(f, "[{service}] Parse error: {detail}")
            }
            Self::SerializationError { service, detail } => {
                write!(f, "[{service}] Serialization error: {detail}")
            }
            Self::Unknown {
                service,
                status,
                raw_message,
                ..
            } => match status {
                Some(status) => write!(f, "[{service}] HTTP {status}: {raw_message}"),
                None => write!(f, "[{service}] {raw_message}"),
            },
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
