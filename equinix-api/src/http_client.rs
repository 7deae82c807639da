//! Shared HTTP plumbing
//!
//! Each service client builds its own `RequestBuilder` (auth headers differ per
//! service). This module sends it, logs it, classifies transport failures and
//! retries the transient ones.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::RetryPolicy;
use crate::error::ApiError;
use crate::utils::log_sanitizer::{sanitize_body, truncate_for_log};

/// HTTP helper functions
pub struct HttpUtils;

impl HttpUtils {
    /// Send a request and return `(status, body)`.
    ///
    /// Only transport failures, 429 and gateway errors (502-504) become errors
    /// here. Any other status is returned for the caller's error mapper.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        service: &str,
        method: &str,
        url: &str,
    ) -> Result<(u16, String), ApiError> {
        log::debug!("[{service}] {method} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ApiError::NetworkError {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[{service}] Response Status: {status}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{service}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ApiError::RateLimited {
                service: service.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{service}] Gateway error (HTTP {status})");
            return Err(ApiError::NetworkError {
                service: service.to_string(),
                detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkError {
                service: service.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("[{service}] Response Body: {}", sanitize_body(&body));

        Ok((status, body))
    }

    /// Deserialize a JSON response body.
    pub fn parse_json<T>(body: &str, service: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(body).map_err(|e| {
            log::error!("[{service}] JSON parse failed: {e}");
            log::error!("[{service}] Raw response: {}", sanitize_body(body));
            ApiError::ParseError {
                service: service.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// [`execute_request`](Self::execute_request) with retries on transient errors.
    ///
    /// Backoff doubles from `policy.min_wait` up to `policy.max_wait`. A
    /// `Retry-After` header overrides the backoff, still capped at `max_wait`.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        service: &str,
        method: &str,
        url: &str,
        policy: &RetryPolicy,
    ) -> Result<(u16, String), ApiError> {
        if policy.max_retries == 0 {
            return Self::execute_request(request_builder, service, method, url).await;
        }

        let mut last_error = None;

        for attempt in 0..=policy.max_retries {
            // RequestBuilder is single-use
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{service}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, service, method, url).await;
            };

            match Self::execute_request(req, service, method, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < policy.max_retries && is_retryable(&e) => {
                    let delay = retry_delay(&e, attempt, policy);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        service,
                        attempt + 1,
                        policy.max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::NetworkError {
            service: service.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Transient failures only. API rejections are never retried.
fn is_retryable(error: &ApiError) -> bool {
    matches!(
        error,
        ApiError::NetworkError { .. } | ApiError::Timeout { .. } | ApiError::RateLimited { .. }
    )
}

fn retry_delay(error: &ApiError, attempt: u32, policy: &RetryPolicy) -> Duration {
    if let ApiError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs(*secs).min(policy.max_wait)
    } else {
        backoff_delay(attempt, policy)
    }
}

fn backoff_delay(attempt: u32, policy: &RetryPolicy) -> Duration {
    let capped_attempt = attempt.min(20);
    policy
        .min_wait
        .saturating_mul(1_u32 << capped_attempt)
        .min(policy.max_wait)
}
