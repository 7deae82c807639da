//! Fabric route filter lifecycle

use std::sync::Arc;

use equinix_api::{RouteFilter, RouteFilterRequest};
use tokio_util::sync::CancellationToken;

use crate::adapters::route_filter::{self, RouteFilterFetcher};
use crate::convergence::TimeoutBudget;
use crate::error::CoreResult;
use crate::services::{ServiceContext, found, log_error};

const KIND: &str = "route filter";
/// Fabric code for a route filter that is already gone
const ALREADY_DELETED: &str = "EQ-3142509";

/// Fabric route filter service
pub struct RouteFilterService {
    ctx: Arc<ServiceContext>,
}

impl RouteFilterService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    fn fetcher(&self) -> RouteFilterFetcher {
        RouteFilterFetcher::new(self.ctx.route_filters.clone())
    }

    async fn wait_stable(
        &self,
        id: &str,
        action: &str,
        budget: &TimeoutBudget,
        cancel: &CancellationToken,
    ) -> CoreResult<RouteFilter> {
        self.ctx
            .wait_for(
                cancel,
                KIND,
                id,
                action,
                &self.fetcher(),
                &route_filter::stable(budget.remaining()),
            )
            .await
    }

    pub async fn create(
        &self,
        req: &RouteFilterRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<RouteFilter> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.route_filter.create);
        let created = self
            .ctx
            .route_filters
            .create_route_filter(req)
            .await
            .map_err(|e| log_error(e.into()))?;
        log::info!("Created route filter {}", created.uuid);
        self.wait_stable(&created.uuid, "created", &budget, cancel).await
    }

    pub async fn read(&self, id: &str) -> CoreResult<Option<RouteFilter>> {
        found(self.ctx.route_filters.get_route_filter(id).await)
    }

    /// Replace the whole filter definition.
    pub async fn update(
        &self,
        id: &str,
        req: &RouteFilterRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<RouteFilter> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.route_filter.update);
        self.ctx
            .route_filters
            .replace_route_filter(id, req)
            .await
            .map_err(|e| log_error(e.into()))?;
        self.wait_stable(id, "updated", &budget, cancel).await
    }

    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> CoreResult<()> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.route_filter.delete);
        match self.ctx.route_filters.delete_route_filter(id).await {
            Ok(()) => {}
            Err(e) if e.has_error_code(ALREADY_DELETED) => {
                log::info!("Route filter {id} already deleted");
                return Ok(());
            }
            Err(e) => return Err(log_error(e.into())),
        }

        self.ctx
            .wait_for_deletion(
                cancel,
                KIND,
                id,
                self.fetcher(),
                route_filter::DEPROVISIONED,
                &route_filter::deprovisioning(budget.remaining()),
            )
            .await
    }
}
