use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use equinix_api::{ApiError, RouteFilter, RouteFiltersApi};

use crate::convergence::{PollConfig, StateFetcher, StateLabel};

use super::label;

pub const PROVISIONING: &str = "PROVISIONING";
pub const REPROVISIONING: &str = "REPROVISIONING";
pub const PROVISIONED: &str = "PROVISIONED";
pub const DEPROVISIONING: &str = "DEPROVISIONING";
pub const DEPROVISIONED: &str = "DEPROVISIONED";

pub struct RouteFilterFetcher {
    api: Arc<dyn RouteFiltersApi>,
}

impl RouteFilterFetcher {
    pub fn new(api: Arc<dyn RouteFiltersApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StateFetcher for RouteFilterFetcher {
    type Resource = RouteFilter;

    async fn fetch(&self, handle: &str) -> Result<RouteFilter, ApiError> {
        self.api.get_route_filter(handle).await
    }

    fn extract_state(&self, resource: &RouteFilter) -> StateLabel {
        label(resource.state.as_ref())
    }
}

/// After a create or a replace. Shared with route filter rules.
pub fn stable(timeout: Duration) -> PollConfig {
    PollConfig::new([PROVISIONING, REPROVISIONING], [PROVISIONED], timeout)
}

pub fn deprovisioning(timeout: Duration) -> PollConfig {
    PollConfig::new([PROVISIONED, DEPROVISIONING], [DEPROVISIONED], timeout)
}
