//! Equinix Network Edge client (SSH public keys)

mod api;
mod error;
mod http;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::TokenProvider;
use crate::config::RetryPolicy;

pub(crate) const NE_BASE_PATH: &str = "/ne/v1";

pub struct NetworkEdgeClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) tokens: Arc<TokenProvider>,
    pub(crate) retry: RetryPolicy,
}

impl NetworkEdgeClient {
    pub fn new(
        client: Client,
        api_root: &str,
        tokens: Arc<TokenProvider>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            base_url: format!("{api_root}{NE_BASE_PATH}"),
            tokens,
            retry,
        }
    }
}
