//! # equinix-api
//!
//! Async clients for the parts of the Equinix REST APIs whose resources
//! provision asynchronously and have to be polled to convergence.
//!
//! | Service | Base path | Auth |
//! |---------|-----------|------|
//! | Fabric | `/fabric/v4` | Bearer (static token or OAuth2 client credentials) |
//! | Network Edge | `/ne/v1` | Bearer |
//! | Metal | `/metal/v1` | `X-Auth-Token` |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform TLS implementation.
//! - **`rustls`**: use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use equinix_api::{ClientConfig, EquinixClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // EQUINIX_API_CLIENTID / EQUINIX_API_CLIENTSECRET or EQUINIX_API_TOKEN
//!     let client = EquinixClient::new(ClientConfig::from_env()?)?;
//!
//!     let network = client.networks().get_network("network-uuid").await?;
//!     println!("{:?}", network.operation.and_then(|o| o.equinix_status));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`Result<T, ApiError>`](ApiError). Responses keep the HTTP
//! status and every `EQ-…` code the body listed:
//!
//! - [`ApiError::status_code`] / [`ApiError::is_client_error`]
//! - [`ApiError::has_error_code`] for domain codes such as `EQ-3142509`
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff according to [`RetryPolicy`].

mod auth;
mod config;
mod correlation;
mod error;
mod factory;
mod http_client;
mod services;
mod traits;
mod types;
mod utils;

pub use auth::TokenProvider;
pub use config::{
    CLIENT_ID_ENV_VAR, CLIENT_SECRET_ENV_VAR, CLIENT_TIMEOUT_ENV_VAR, CLIENT_TOKEN_ENV_VAR,
    ClientConfig, DEFAULT_BASE_URL, ENDPOINT_ENV_VAR, METAL_AUTH_TOKEN_ENV_VAR, RetryPolicy,
};
pub use correlation::{CORRELATION_ID_LEN, CorrelationIdGenerator};
pub use error::{ApiError, Result};
pub use factory::EquinixClient;
pub use services::{FabricClient, MetalClient, NetworkEdgeClient};
pub use traits::{
    ConnectionsApi, NetworksApi, PublicKeysApi, RouteFilterRulesApi, RouteFiltersApi,
    ServiceTokensApi, SshKeysApi,
};
pub use types::{
    Change, ChangeOperation, Connection, ConnectionOperation, ConnectionRequest, KeyValue,
    Network, NetworkOperation, NetworkRequest, PublicKey, PublicKeyRequest, RouteFilter,
    RouteFilterRequest, RouteFilterRule, RouteFilterRuleRequest, ServiceToken,
    ServiceTokenRequest, SshKey, SshKeyInput,
};
