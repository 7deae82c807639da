//! Route filter rule lookups
//!
//! Rules are addressed by their filter and their own id. The poller only
//! carries one handle, so the fetcher is bound to the filter up front.

use std::sync::Arc;

use async_trait::async_trait;
use equinix_api::{ApiError, RouteFilterRule, RouteFilterRulesApi};

use crate::convergence::{StateFetcher, StateLabel};

use super::label;

pub use super::route_filter::{
    DEPROVISIONED, DEPROVISIONING, PROVISIONED, PROVISIONING, REPROVISIONING, deprovisioning,
    stable,
};

pub struct RouteFilterRuleFetcher {
    api: Arc<dyn RouteFilterRulesApi>,
    route_filter_id: String,
}

impl RouteFilterRuleFetcher {
    pub fn new(api: Arc<dyn RouteFilterRulesApi>, route_filter_id: impl Into<String>) -> Self {
        Self {
            api,
            route_filter_id: route_filter_id.into(),
        }
    }

    pub fn route_filter_id(&self) -> &str {
        &self.route_filter_id
    }
}

#[async_trait]
impl StateFetcher for RouteFilterRuleFetcher {
    type Resource = RouteFilterRule;

    async fn fetch(&self, handle: &str) -> Result<RouteFilterRule, ApiError> {
        self.api
            .get_route_filter_rule(&self.route_filter_id, handle)
            .await
    }

    fn extract_state(&self, resource: &RouteFilterRule) -> StateLabel {
        label(resource.state.as_ref())
    }
}
