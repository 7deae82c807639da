//! Metal HTTP request methods

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::http_client::HttpUtils;
use crate::services::common::{is_success, parse_error_body};
use crate::traits::{ApiErrorMapper, ErrorContext};

use super::MetalClient;

impl MetalClient {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        context: ErrorContext,
    ) -> Result<String> {
        let Some(token) = self.auth_token.as_deref() else {
            return Err(ApiError::InvalidCredentials {
                service: self.service_name().to_string(),
                raw_message: Some("METAL_AUTH_TOKEN is not configured".to_string()),
            });
        };

        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("X-Auth-Token", token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let (status, text) =
            HttpUtils::execute_request_with_retry(request, "metal", method.as_str(), &url, &self.retry)
                .await?;
        if is_success(status) {
            return Ok(text);
        }

        let err = self.map_error(parse_error_body(status, &text), context);
        log::warn!("{err}");
        Err(err)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, context: ErrorContext) -> Result<T> {
        let text = self.send(Method::GET, path, None, context).await?;
        HttpUtils::parse_json(&text, self.service_name())
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body).map_err(|e| self.serialization_error(e))?;
        let text = self
            .send(Method::POST, path, Some(body), ErrorContext::default())
            .await?;
        HttpUtils::parse_json(&text, self.service_name())
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let body = serde_json::to_value(body).map_err(|e| self.serialization_error(e))?;
        let text = self.send(Method::PUT, path, Some(body), context).await?;
        HttpUtils::parse_json(&text, self.service_name())
    }

    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        self.send(Method::DELETE, path, None, context).await?;
        Ok(())
    }
}
