//! Fabric network lifecycle

use std::sync::Arc;

use equinix_api::{ApiError, ChangeOperation, Network, NetworkRequest};
use tokio_util::sync::CancellationToken;

use crate::adapters::network::{self, NetworkFetcher};
use crate::convergence::TimeoutBudget;
use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, found, log_error};

const KIND: &str = "network";

/// Fabric network service
pub struct NetworkService {
    ctx: Arc<ServiceContext>,
}

impl NetworkService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    fn fetcher(&self) -> NetworkFetcher {
        NetworkFetcher::new(self.ctx.networks.clone())
    }

    pub async fn create(
        &self,
        req: &NetworkRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<Network> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.network.create);
        let created = self
            .ctx
            .networks
            .create_network(req)
            .await
            .map_err(|e| log_error(e.into()))?;
        log::info!("Created network {}", created.uuid);

        self.ctx
            .wait_for(
                cancel,
                KIND,
                &created.uuid,
                "provisioned",
                &self.fetcher(),
                &network::provisioning(budget.remaining()),
            )
            .await
    }

    pub async fn read(&self, id: &str) -> CoreResult<Option<Network>> {
        found(self.ctx.networks.get_network(id).await)
    }

    /// Rename the network. Only the name is mutable in place.
    pub async fn update(
        &self,
        id: &str,
        desired: &NetworkRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<Network> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.network.update);
        let current = self
            .ctx
            .wait_for(
                cancel,
                KIND,
                id,
                "provisioned",
                &self.fetcher(),
                &network::provisioning(budget.remaining()),
            )
            .await?;

        if current.name.as_deref() == Some(desired.name.as_str()) {
            return Err(CoreError::NothingToUpdate {
                kind: KIND.to_string(),
                id: id.to_string(),
            });
        }

        self.ctx
            .networks
            .update_network(id, &[ChangeOperation::replace("/name", desired.name.clone())])
            .await
            .map_err(|e| log_error(e.into()))?;

        self.ctx
            .wait_for(
                cancel,
                KIND,
                id,
                "updated",
                &self.fetcher(),
                &network::update_completed(budget.remaining()),
            )
            .await
    }

    /// Delete and wait for deprovisioning.
    ///
    /// A delete rejected with `UpdatePending` is reported as done without waiting.
    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> CoreResult<()> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.network.delete);
        match self.ctx.networks.delete_network(id).await {
            Ok(()) => {}
            Err(e @ ApiError::UpdatePending { .. }) => {
                log::warn!("Network {id}: delete rejected while an update is pending: {e}");
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
                network::DEPROVISIONED,
                &network::deprovisioning(budget.remaining()),
            )
            .await
    }
}
