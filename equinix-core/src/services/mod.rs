//! 业务逻辑服务层
//!
//! One service per resource type. Every mutating call is followed by a
//! convergence wait so callers only ever see settled resources.

mod connection_service;
mod network_service;
mod route_filter_rule_service;
mod route_filter_service;
mod service_token_service;
mod ssh_key_service;

pub use connection_service::ConnectionService;
pub use network_service::NetworkService;
pub use route_filter_rule_service::RouteFilterRuleService;
pub use route_filter_service::RouteFilterService;
pub use service_token_service::ServiceTokenService;
pub use ssh_key_service::SshKeyService;

use std::sync::Arc;

use equinix_api::{
    ApiError, ConnectionsApi, EquinixClient, NetworksApi, PublicKeysApi, RouteFilterRulesApi,
    RouteFiltersApi, ServiceTokensApi, SshKeysApi,
};

use tokio_util::sync::CancellationToken;

use crate::convergence::{ConvergencePoller, PollConfig, ResourceTimeouts, StateFetcher};
use crate::error::{CoreError, CoreResult};

/// 服务上下文 - 持有所有依赖
///
/// Built once per provider configuration; services share it through an `Arc`.
pub struct ServiceContext {
    pub connections: Arc<dyn ConnectionsApi>,
    pub networks: Arc<dyn NetworksApi>,
    pub route_filters: Arc<dyn RouteFiltersApi>,
    pub route_filter_rules: Arc<dyn RouteFilterRulesApi>,
    pub service_tokens: Arc<dyn ServiceTokensApi>,
    pub ssh_keys: Arc<dyn SshKeysApi>,
    pub public_keys: Arc<dyn PublicKeysApi>,
    pub timeouts: ResourceTimeouts,
}

impl ServiceContext {
    #[must_use]
    pub fn from_client(client: &EquinixClient) -> Self {
        Self {
            connections: client.connections(),
            networks: client.networks(),
            route_filters: client.route_filters(),
            route_filter_rules: client.route_filter_rules(),
            service_tokens: client.service_tokens(),
            ssh_keys: client.ssh_keys(),
            public_keys: client.public_keys(),
            timeouts: ResourceTimeouts::default(),
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: ResourceTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Wait for `id` to reach one of `cfg.target`.
    ///
    /// `cancel` belongs to the calling operation only.
    pub(crate) async fn wait_for<F>(
        &self,
        cancel: &CancellationToken,
        kind: &str,
        id: &str,
        action: &str,
        fetcher: &F,
        cfg: &PollConfig,
    ) -> CoreResult<F::Resource>
    where
        F: StateFetcher,
    {
        log::debug!(
            "Waiting up to {}s for {kind} {id} to be {action}",
            cfg.timeout.as_secs()
        );
        ConvergencePoller::with_cancellation(cancel.clone())
            .poll(id, fetcher, cfg)
            .await
            .map_err(|e| log_error(CoreError::wait(kind, id, action, e)))
    }

    /// Wait for `id` to reach `deleted_state` or disappear.
    pub(crate) async fn wait_for_deletion<F>(
        &self,
        cancel: &CancellationToken,
        kind: &str,
        id: &str,
        fetcher: F,
        deleted_state: &str,
        cfg: &PollConfig,
    ) -> CoreResult<()>
    where
        F: StateFetcher,
    {
        log::debug!("Waiting for {kind} {id} to be deleted");
        ConvergencePoller::with_cancellation(cancel.clone())
            .poll_deletion(id, fetcher, deleted_state, cfg)
            .await
            .map(|_| ())
            .map_err(|e| log_error(CoreError::wait(kind, id, "deleted", e)))
    }
}

/// Log at `warn` or `error` depending on whether the failure is expected.
pub(crate) fn log_error(err: CoreError) -> CoreError {
    if err.is_expected() {
        log::warn!("{err}");
    } else {
        log::error!("{err}");
    }
    err
}

/// `Ok(None)` for a resource that no longer exists.
pub(crate) fn found<T>(result: Result<T, ApiError>) -> CoreResult<Option<T>> {
    match result {
        Ok(resource) => Ok(Some(resource)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(log_error(e.into())),
    }
}
