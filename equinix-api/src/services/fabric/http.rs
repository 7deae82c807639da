//! Fabric HTTP request methods

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::services::common::{is_success, parse_error_body};
use crate::traits::{ApiErrorMapper, ErrorContext};
use crate::utils::log_sanitizer::sanitize_body;

use super::FabricClient;

impl FabricClient {
    /// Send one request and return the raw 2xx body.
    ///
    /// Adds the bearer token plus the `X-SOURCE` / `X-CORRELATION-ID` headers
    /// Fabric expects on every call.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        context: ErrorContext,
    ) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let token = self.tokens.bearer_token().await?;

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header("X-SOURCE", "API")
            .header("X-CORRELATION-ID", self.correlation.next_id());

        if let Some(body) = body {
            log::debug!("[fabric] Request Body: {}", sanitize_body(&body.to_string()));
            request = request.json(&body);
        }

        let (status, text) =
            HttpUtils::execute_request_with_retry(request, "fabric", method.as_str(), &url, &self.retry)
                .await?;

        if is_success(status) {
            return Ok(text);
        }

        let err = self.map_error(parse_error_body(status, &text), context);
        if err.is_expected() {
            log::warn!("{err}");
        } else {
            log::error!("{err}");
        }
        Err(err)
    }

    fn encode<B: Serialize + ?Sized>(&self, body: &B) -> Result<serde_json::Value> {
        serde_json::to_value(body).map_err(|e| self.serialization_error(e))
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, context: ErrorContext) -> Result<T> {
        let text = self.send(Method::GET, path, None, context).await?;
        HttpUtils::parse_json(&text, self.service_name())
    }

    /// 执行 POST 请求
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = self.encode(body)?;
        let text = self
            .send(Method::POST, path, Some(body), ErrorContext::default())
            .await?;
        HttpUtils::parse_json(&text, self.service_name())
    }

    /// 执行 PUT 请求
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let body = self.encode(body)?;
        let text = self.send(Method::PUT, path, Some(body), context).await?;
        HttpUtils::parse_json(&text, self.service_name())
    }

    /// 执行 PATCH 请求
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let body = self.encode(body)?;
        let text = self.send(Method::PATCH, path, Some(body), context).await?;
        HttpUtils::parse_json(&text, self.service_name())
    }

    /// 执行 DELETE 请求，响应体被忽略
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        self.send(Method::DELETE, path, None, context).await?;
        Ok(())
    }
}
