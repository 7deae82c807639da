//! Equinix Fabric v4 client

mod api;
mod error;
mod http;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::TokenProvider;
use crate::config::RetryPolicy;
use crate::correlation::CorrelationIdGenerator;

pub(crate) const FABRIC_BASE_PATH: &str = "/fabric/v4";

/// Fabric client: connections, networks, route filters, service tokens.
pub struct FabricClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) tokens: Arc<TokenProvider>,
    pub(crate) correlation: Arc<CorrelationIdGenerator>,
    pub(crate) retry: RetryPolicy,
}

impl FabricClient {
    pub fn new(
        client: Client,
        api_root: &str,
        tokens: Arc<TokenProvider>,
        correlation: Arc<CorrelationIdGenerator>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            base_url: format!("{api_root}{FABRIC_BASE_PATH}"),
            tokens,
            correlation,
            retry,
        }
    }
}
