//! Equinix Core Library
//!
//! Provides the convergence layer on top of `equinix-api`:
//! - a generic poller that waits for a remote resource to reach a target state
//! - per-resource adapters mapping Fabric responses onto state labels
//! - lifecycle services that pair each mutating call with the matching wait
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use equinix_api::{ClientConfig, EquinixClient, NetworkRequest};
//! use equinix_core::{NetworkService, ServiceContext};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = EquinixClient::new(ClientConfig::from_env()?)?;
//! let networks = NetworkService::new(Arc::new(ServiceContext::from_client(&client)));
//! let network = networks
//!     .create(
//!         &NetworkRequest {
//!             name: "lab".to_string(),
//!             network_type: "EVPLAN".to_string(),
//!             scope: "GLOBAL".to_string(),
//!             ..NetworkRequest::default()
//!         },
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("{} is ready", network.uuid);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod convergence;
pub mod error;
pub mod services;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use convergence::{
    ConvergencePoller, DeletionConvergence, OperationTimeouts, PollConfig, ResourceTimeouts,
    StateFetcher, StateLabel, TimeoutBudget,
};
pub use error::{CoreError, CoreResult, WaitError};
pub use services::{
    ConnectionService, NetworkService, RouteFilterRuleService, RouteFilterService,
    ServiceContext, ServiceTokenService, SshKeyService,
};
