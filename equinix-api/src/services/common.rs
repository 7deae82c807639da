//! Helpers shared by the service clients

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::traits::RawApiError;
use crate::utils::log_sanitizer::truncate_for_log;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Build the `reqwest::Client` shared by every service.
pub fn create_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| ApiError::NetworkError {
            service: "http".to_string(),
            detail: format!("failed to build HTTP client: {e}"),
        })
}

// ============ Error bodies ============

/// Fabric / Network Edge error entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEntry {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Metal error envelope.
#[derive(Debug, Deserialize)]
struct MetalErrorBody {
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extract error codes and a message from a non-2xx body.
///
/// Understands the Fabric / Network Edge array form
/// (`[{"errorCode": "EQ-..", "errorMessage": ".."}]`), a single such object,
/// and the Metal forms (`{"errors": [..]}` / `{"error": ".."}`). Anything else
/// is kept verbatim as the message.
pub(crate) fn parse_error_body(status: u16, body: &str) -> RawApiError {
    if let Ok(entries) = serde_json::from_str::<Vec<ErrorEntry>>(body) {
        if !entries.is_empty() {
            return from_entries(status, &entries);
        }
    }
    if let Ok(entry) = serde_json::from_str::<ErrorEntry>(body) {
        if entry.error_code.is_some() {
            return from_entries(status, std::slice::from_ref(&entry));
        }
    }
    if let Ok(metal) = serde_json::from_str::<MetalErrorBody>(body) {
        let mut messages = metal.errors;
        messages.extend(metal.error);
        if !messages.is_empty() {
            return RawApiError::new(status, messages.join("; "));
        }
    }

    let message = if body.trim().is_empty() {
        format!("HTTP {status} with empty body")
    } else {
        truncate_for_log(body)
    };
    RawApiError::new(status, message)
}

fn from_entries(status: u16, entries: &[ErrorEntry]) -> RawApiError {
    let codes = entries
        .iter()
        .filter_map(|e| e.error_code.clone())
        .collect();
    let message = entries
        .iter()
        .map(|e| {
            let code = e.error_code.as_deref().unwrap_or("-");
            let msg = e.error_message.as_deref().unwrap_or("");
            match e.details.as_deref() {
                Some(details) if !details.is_empty() => format!("{code}: {msg} ({details})"),
                _ => format!("{code}: {msg}"),
            }
        })
        .collect::<Vec<_>>()
        .join("; ");
    RawApiError::with_codes(status, codes, message)
}

/// Whether a status is a success.
pub(crate) fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fabric_array_keeps_every_code() {
        let body = r#"[{"errorCode":"EQ-3142509","errorMessage":"Connection already deleted","correlationId":"x"},{"errorCode":"EQ-3142001","errorMessage":"other"}]"#;
        let raw = parse_error_body(400, body);
        assert_eq!(raw.codes, vec!["EQ-3142509", "EQ-3142001"]);
        assert!(raw.has_code("EQ-3142509"));
        assert!(raw.message.contains("Connection already deleted"));
    }

    #[test]
    fn single_fabric_object() {
        let raw = parse_error_body(
            400,
            r#"{"errorCode":"EQ-3040055","errorMessage":"update pending","details":"REQUESTED"}"#,
        );
        assert_eq!(raw.codes, vec!["EQ-3040055"]);
        assert!(raw.message.contains("(REQUESTED)"));
    }

    #[test]
    fn metal_errors_list() {
        let raw = parse_error_body(404, r#"{"errors":["Not found"]}"#);
        assert!(raw.codes.is_empty());
        assert_eq!(raw.message, "Not found");
    }

    #[test]
    fn plain_text_and_empty_bodies() {
        assert_eq!(parse_error_body(500, "oops").message, "oops");
        assert_eq!(
            parse_error_body(500, "").message,
            "HTTP 500 with empty body"
        );
    }
}
