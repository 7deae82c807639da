//! Client configuration.
//!
//! Values come either from explicit setters or from the same environment
//! variables the Equinix tooling reads (`EQUINIX_API_ENDPOINT`, ...).

use std::time::Duration;

use url::Url;

use crate::error::{ApiError, Result};

pub const ENDPOINT_ENV_VAR: &str = "EQUINIX_API_ENDPOINT";
pub const CLIENT_ID_ENV_VAR: &str = "EQUINIX_API_CLIENTID";
pub const CLIENT_SECRET_ENV_VAR: &str = "EQUINIX_API_CLIENTSECRET";
pub const CLIENT_TOKEN_ENV_VAR: &str = "EQUINIX_API_TOKEN";
pub const CLIENT_TIMEOUT_ENV_VAR: &str = "EQUINIX_API_TIMEOUT";
pub const METAL_AUTH_TOKEN_ENV_VAR: &str = "METAL_AUTH_TOKEN";
pub const USER_AGENT_ENV_VAR: &str = "TF_APPEND_USER_AGENT";

pub const DEFAULT_BASE_URL: &str = "https://api.equinix.com";
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_MAX_RETRY_WAIT: Duration = Duration::from_secs(30);
pub const MIN_RETRY_WAIT: Duration = Duration::from_secs(1);

const SERVICE: &str = "config";
const BASE_USER_AGENT: &str = concat!("equinix-api-rs/", env!("CARGO_PKG_VERSION"));

/// Retry policy applied to individual HTTP calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 0 disables retries
    pub max_retries: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_wait: MIN_RETRY_WAIT,
            max_wait: DEFAULT_MAX_RETRY_WAIT,
        }
    }
}

/// Settings shared by every service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Static bearer token, takes precedence over client credentials
    pub token: Option<String>,
    pub metal_auth_token: Option<String>,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: None,
            client_secret: None,
            token: None,
            metal_auth_token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            user_agent: BASE_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENDPOINT_ENV_VAR) {
            config.base_url = url;
        }
        config.client_id = get(CLIENT_ID_ENV_VAR);
        config.client_secret = get(CLIENT_SECRET_ENV_VAR);
        config.token = get(CLIENT_TOKEN_ENV_VAR);
        config.metal_auth_token = get(METAL_AUTH_TOKEN_ENV_VAR);

        if let Some(raw) = get(CLIENT_TIMEOUT_ENV_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid(CLIENT_TIMEOUT_ENV_VAR, format!("'{raw}': {e}")))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(extra) = get(USER_AGENT_ENV_VAR) {
            config.user_agent = format!("{} {}", config.user_agent, extra.trim());
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    #[must_use]
    pub fn with_metal_auth_token(mut self, token: impl Into<String>) -> Self {
        self.metal_auth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, max_wait: Duration) -> Self {
        self.retry.max_retries = max_retries;
        self.retry.max_wait = max_wait.max(self.retry.min_wait);
        self
    }

    /// Check the values that would otherwise fail on the first request.
    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        if self.request_timeout.is_zero() {
            return Err(invalid("request_timeout", "must be greater than zero"));
        }
        if self.client_id.is_some() != self.client_secret.is_some() {
            return Err(invalid(
                "client_credentials",
                "client id and client secret must be set together",
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim_end_matches('/'))
            .map_err(|e| invalid("base_url", format!("'{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    /// `base_url` normalized for path concatenation.
    pub fn api_root(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    /// Whether Fabric/Network Edge calls can authenticate.
    pub fn has_fabric_credentials(&self) -> bool {
        self.token.is_some() || (self.client_id.is_some() && self.client_secret.is_some())
    }
}

fn invalid(param: &str, detail: impl Into<String>) -> ApiError {
    ApiError::InvalidParameter {
        service: SERVICE.to_string(),
        param: param.to_string(),
        detail: detail.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_retries, 10);
        assert_eq!(config.retry.max_wait, Duration::from_secs(30));
        assert!(!config.has_fabric_credentials());
    }

    #[test]
    fn reads_all_known_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENDPOINT_ENV_VAR, "https://uatapi.equinix.com/"),
            (CLIENT_ID_ENV_VAR, "id"),
            (CLIENT_SECRET_ENV_VAR, "secret"),
            (CLIENT_TIMEOUT_ENV_VAR, "12"),
            (METAL_AUTH_TOKEN_ENV_VAR, "metal"),
            (USER_AGENT_ENV_VAR, "ci-run"),
        ]))
        .unwrap();
        assert_eq!(config.api_root(), "https://uatapi.equinix.com");
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.metal_auth_token.as_deref(), Some("metal"));
        assert!(config.user_agent.ends_with(" ci-run"));
        assert!(config.has_fabric_credentials());
    }

    #[test]
    fn blank_values_are_ignored() {
        let config =
            ClientConfig::from_lookup(lookup(&[(CLIENT_TOKEN_ENV_VAR, "  ")])).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(CLIENT_TIMEOUT_ENV_VAR, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter { ref param, .. } if param == CLIENT_TIMEOUT_ENV_VAR));
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = ClientConfig::default()
            .with_base_url("ftp://api.equinix.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter { ref param, .. } if param == "base_url"));
    }

    #[test]
    fn rejects_half_configured_client_credentials() {
        let mut config = ClientConfig::default();
        config.client_id = Some("id".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn retry_wait_never_below_minimum() {
        let config = ClientConfig::default().with_retry(3, Duration::from_millis(10));
        assert_eq!(config.retry.max_wait, MIN_RETRY_WAIT);
        assert_eq!(config.retry.max_retries, 3);
    }
}
