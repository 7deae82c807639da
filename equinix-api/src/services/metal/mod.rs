//! Equinix Metal client (SSH keys)

mod api;
mod error;
mod http;

use reqwest::Client;

use crate::config::RetryPolicy;

pub(crate) const METAL_BASE_PATH: &str = "/metal/v1";

/// Metal client, authenticated with `X-Auth-Token`.
pub struct MetalClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) auth_token: Option<String>,
    pub(crate) retry: RetryPolicy,
}

impl MetalClient {
    pub fn new(
        client: Client,
        api_root: &str,
        auth_token: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            base_url: format!("{api_root}{METAL_BASE_PATH}"),
            auth_token,
            retry,
        }
    }
}
