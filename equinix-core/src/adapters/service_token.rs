use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use equinix_api::{ApiError, ServiceToken, ServiceTokensApi};

use crate::convergence::{PollConfig, StateFetcher, StateLabel};

use super::label;

pub const INACTIVE: &str = "INACTIVE";
pub const DELETED: &str = "DELETED";

pub struct ServiceTokenFetcher {
    api: Arc<dyn ServiceTokensApi>,
}

impl ServiceTokenFetcher {
    pub fn new(api: Arc<dyn ServiceTokensApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StateFetcher for ServiceTokenFetcher {
    type Resource = ServiceToken;

    async fn fetch(&self, handle: &str) -> Result<ServiceToken, ApiError> {
        self.api.get_service_token(handle).await
    }

    fn extract_state(&self, resource: &ServiceToken) -> StateLabel {
        label(resource.state.as_ref())
    }
}

/// A fresh or updated token sits in `INACTIVE` until someone redeems it.
pub fn inactive(timeout: Duration) -> PollConfig {
    PollConfig::target_only([INACTIVE], timeout)
}

pub fn deleted(timeout: Duration) -> PollConfig {
    PollConfig::new([INACTIVE], [DELETED], timeout)
}
