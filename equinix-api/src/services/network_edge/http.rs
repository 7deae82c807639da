//! Network Edge HTTP request methods

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::services::common::{is_success, parse_error_body};
use crate::traits::{ApiErrorMapper, ErrorContext};

use super::NetworkEdgeClient;

impl NetworkEdgeClient {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        context: ErrorContext,
    ) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let token = self.tokens.bearer_token().await?;

        let mut request = self.client.request(method.clone(), &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let (status, text) = HttpUtils::execute_request_with_retry(
            request,
            self.service_name(),
            method.as_str(),
            &url,
            &self.retry,
        )
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

    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        self.send(Method::DELETE, path, None, context).await?;
        Ok(())
    }
}
