//! Network state lookups, read from `operation.equinixStatus`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use equinix_api::{ApiError, Network, NetworksApi};

use crate::convergence::{PollConfig, StateFetcher, StateLabel};

use super::label;

pub const PROVISIONING: &str = "PROVISIONING";
pub const PROVISIONED: &str = "PROVISIONED";
pub const DEPROVISIONING: &str = "DEPROVISIONING";
pub const DEPROVISIONED: &str = "DEPROVISIONED";

pub struct NetworkFetcher {
    api: Arc<dyn NetworksApi>,
}

impl NetworkFetcher {
    pub fn new(api: Arc<dyn NetworksApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StateFetcher for NetworkFetcher {
    type Resource = Network;

    async fn fetch(&self, handle: &str) -> Result<Network, ApiError> {
        self.api.get_network(handle).await
    }

    fn extract_state(&self, resource: &Network) -> StateLabel {
        label(
            resource
                .operation
                .as_ref()
                .and_then(|op| op.equinix_status.as_ref()),
        )
    }
}

pub fn provisioning(timeout: Duration) -> PollConfig {
    PollConfig::new([PROVISIONING], [PROVISIONED], timeout)
}

/// After a PATCH; the network may briefly report anything.
pub fn update_completed(timeout: Duration) -> PollConfig {
    PollConfig::target_only([PROVISIONED], timeout)
}

pub fn deprovisioning(timeout: Duration) -> PollConfig {
    PollConfig::new([DEPROVISIONING], [DEPROVISIONED], timeout)
}

#[cfg(test)]
mod tests {
    use equinix_api::NetworkOperation;

    use super::*;
    use crate::test_utils::MockNetworksApi;

    #[test]
    fn state_comes_from_operation_not_root() {
        let fetcher = NetworkFetcher::new(Arc::new(MockNetworksApi::new()));
        let network = Network {
            uuid: "n-1".to_string(),
            state: Some("ACTIVE".to_string()),
            operation: Some(NetworkOperation {
                equinix_status: Some(PROVISIONING.to_string()),
            }),
            ..Network::default()
        };
        assert_eq!(fetcher.extract_state(&network), PROVISIONING);
        assert_eq!(fetcher.extract_state(&Network::default()), "");
    }
}
