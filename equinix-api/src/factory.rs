//! Client construction.

use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::correlation::CorrelationIdGenerator;
use crate::error::Result;
use crate::services::common::create_http_client;
use crate::services::{FabricClient, MetalClient, NetworkEdgeClient};
use crate::traits::{
    ConnectionsApi, NetworksApi, PublicKeysApi, RouteFilterRulesApi, RouteFiltersApi,
    ServiceTokensApi, SshKeysApi,
};

/// Every service client, built once from one [`ClientConfig`].
///
/// The HTTP connection pool, token cache and correlation-ID generator are
/// shared. Hand the `Arc<dyn …Api>` accessors to whatever needs them instead
/// of rebuilding clients per call.
///
/// # Examples
///
/// ```rust,no_run
/// use equinix_api::{ClientConfig, EquinixClient};
///
/// # async fn run() -> equinix_api::Result<()> {
/// let client = EquinixClient::new(ClientConfig::from_env()?)?;
/// let connection = client.connections().get_connection("c-1").await?;
/// println!("{:?}", connection.state);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EquinixClient {
    fabric: Arc<FabricClient>,
    metal: Arc<MetalClient>,
    network_edge: Arc<NetworkEdgeClient>,
}

impl EquinixClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_correlation_ids(config, CorrelationIdGenerator::from_entropy())
    }

    /// Like [`new`](Self::new) with a caller-owned correlation-ID generator.
    pub fn with_correlation_ids(
        config: ClientConfig,
        correlation: CorrelationIdGenerator,
    ) -> Result<Self> {
        config.validate()?;
        let http = create_http_client(&config)?;
        let api_root = config.api_root();

        let tokens = match (&config.token, &config.client_id, &config.client_secret) {
            (Some(token), _, _) => TokenProvider::fixed(token.clone()),
            (None, Some(id), Some(secret)) => {
                TokenProvider::client_credentials(http.clone(), &api_root, id.clone(), secret.clone())
            }
            _ => {
                log::debug!("No Fabric credentials configured");
                TokenProvider::missing()
            }
        };
        let tokens = Arc::new(tokens);

        Ok(Self {
            fabric: Arc::new(FabricClient::new(
                http.clone(),
                &api_root,
                Arc::clone(&tokens),
                Arc::new(correlation),
                config.retry,
            )),
            metal: Arc::new(MetalClient::new(
                http.clone(),
                &api_root,
                config.metal_auth_token.clone(),
                config.retry,
            )),
            network_edge: Arc::new(NetworkEdgeClient::new(
                http,
                &api_root,
                tokens,
                config.retry,
            )),
        })
    }

    pub fn connections(&self) -> Arc<dyn ConnectionsApi> {
        self.fabric.clone()
    }

    pub fn networks(&self) -> Arc<dyn NetworksApi> {
        self.fabric.clone()
    }

    pub fn route_filters(&self) -> Arc<dyn RouteFiltersApi> {
        self.fabric.clone()
    }

    pub fn route_filter_rules(&self) -> Arc<dyn RouteFilterRulesApi> {
        self.fabric.clone()
    }

    pub fn service_tokens(&self) -> Arc<dyn ServiceTokensApi> {
        self.fabric.clone()
    }

    pub fn ssh_keys(&self) -> Arc<dyn SshKeysApi> {
        self.metal.clone()
    }

    pub fn public_keys(&self) -> Arc<dyn PublicKeysApi> {
        self.network_edge.clone()
    }
}
