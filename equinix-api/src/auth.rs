//! Bearer tokens for Fabric and Network Edge.
//!
//! A static `EQUINIX_API_TOKEN` is used as-is. Otherwise client credentials
//! are exchanged at `{base}/oauth2/v1/token` and the result is cached until
//! shortly before it expires.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{ApiError, Result};
use crate::http_client::HttpUtils;

const SERVICE: &str = "oauth2";
const TOKEN_PATH: &str = "/oauth2/v1/token";
/// Refresh this long before the advertised expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);
/// Used when the token endpoint omits a lifetime.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Seconds; Equinix sends it as a string
    #[serde(default)]
    token_timeout: Option<serde_json::Value>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn lifetime(&self) -> Duration {
        let from_timeout = self.token_timeout.as_ref().and_then(|v| match v {
            serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
            serde_json::Value::Number(n) => n.as_u64(),
            _ => None,
        });
        from_timeout
            .or(self.expires_in)
            .map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs)
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

enum Source {
    Static(String),
    ClientCredentials {
        client: Client,
        token_url: String,
        client_id: String,
        client_secret: String,
        cached: Mutex<Option<CachedToken>>,
    },
    Missing,
}

/// Supplies the bearer token for each Fabric / Network Edge request.
pub struct TokenProvider {
    source: Source,
}

impl TokenProvider {
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            source: Source::Static(token.into()),
        }
    }

    pub fn client_credentials(
        client: Client,
        api_root: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            source: Source::ClientCredentials {
                client,
                token_url: format!("{api_root}{TOKEN_PATH}"),
                client_id: client_id.into(),
                client_secret: client_secret.into(),
                cached: Mutex::new(None),
            },
        }
    }

    /// No credentials configured; every call fails with `InvalidCredentials`.
    pub fn missing() -> Self {
        Self {
            source: Source::Missing,
        }
    }

    pub async fn bearer_token(&self) -> Result<String> {
        match &self.source {
            Source::Static(token) => Ok(token.clone()),
            Source::Missing => Err(ApiError::InvalidCredentials {
                service: SERVICE.to_string(),
                raw_message: Some(
                    "neither EQUINIX_API_TOKEN nor client credentials are configured".to_string(),
                ),
            }),
            Source::ClientCredentials {
                client,
                token_url,
                client_id,
                client_secret,
                cached,
            } => {
                let mut guard = cached.lock().await;
                if let Some(token) = guard.as_ref() {
                    if Instant::now() < token.refresh_at {
                        return Ok(token.value.clone());
                    }
                    log::debug!("[{SERVICE}] Cached token expired, refreshing");
                }

                let fresh = exchange(client, token_url, client_id, client_secret).await?;
                let value = fresh.value.clone();
                *guard = Some(fresh);
                Ok(value)
            }
        }
    }
}

async fn exchange(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<CachedToken> {
    let body = TokenRequest {
        grant_type: "client_credentials",
        client_id,
        client_secret,
    };
    let request = client.post(token_url).json(&body);
    let (status, text) = HttpUtils::execute_request(request, SERVICE, "POST", token_url).await?;

    if !(200..300).contains(&status) {
        return Err(ApiError::InvalidCredentials {
            service: SERVICE.to_string(),
            raw_message: Some(format!("token endpoint answered HTTP {status}")),
        });
    }

    let response: TokenResponse = HttpUtils::parse_json(&text, SERVICE)?;
    let lifetime = response.lifetime();
    Ok(CachedToken {
        refresh_at: Instant::now() + lifetime.saturating_sub(EXPIRY_SKEW),
        value: response.access_token,
    })
}
