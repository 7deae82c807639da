//! Fabric service token lifecycle

use std::sync::Arc;

use equinix_api::{ChangeOperation, ServiceToken, ServiceTokenRequest};
use tokio_util::sync::CancellationToken;

use crate::adapters::service_token::{self, ServiceTokenFetcher};
use crate::convergence::TimeoutBudget;
use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, found, log_error};

const KIND: &str = "service token";
/// Fabric code for a token that is already gone
const ALREADY_DELETED: &str = "EQ-3034019";

/// Fabric service token service
pub struct ServiceTokenService {
    ctx: Arc<ServiceContext>,
}

impl ServiceTokenService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    fn fetcher(&self) -> ServiceTokenFetcher {
        ServiceTokenFetcher::new(self.ctx.service_tokens.clone())
    }

    async fn wait_inactive(
        &self,
        id: &str,
        action: &str,
        budget: &TimeoutBudget,
        cancel: &CancellationToken,
    ) -> CoreResult<ServiceToken> {
        self.ctx
            .wait_for(
                cancel,
                KIND,
                id,
                action,
                &self.fetcher(),
                &service_token::inactive(budget.remaining()),
            )
            .await
    }

    pub async fn create(
        &self,
        req: &ServiceTokenRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<ServiceToken> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.service_token.create);
        let created = self
            .ctx
            .service_tokens
            .create_service_token(req)
            .await
            .map_err(|e| log_error(e.into()))?;
        log::info!("Created service token {}", created.uuid);
        self.wait_inactive(&created.uuid, "created", &budget, cancel)
            .await
    }

    pub async fn read(&self, id: &str) -> CoreResult<Option<ServiceToken>> {
        found(self.ctx.service_tokens.get_service_token(id).await)
    }

    pub async fn update(
        &self,
        id: &str,
        ops: &[ChangeOperation],
        cancel: &CancellationToken,
    ) -> CoreResult<ServiceToken> {
        if ops.is_empty() {
            return Err(CoreError::NothingToUpdate {
                kind: KIND.to_string(),
                id: id.to_string(),
            });
        }
        let budget = TimeoutBudget::start(self.ctx.timeouts.service_token.update);
        self.ctx
            .service_tokens
            .update_service_token(id, ops)
            .await
            .map_err(|e| log_error(e.into()))?;
        self.wait_inactive(id, "updated", &budget, cancel).await
    }

    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> CoreResult<()> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.service_token.delete);
        match self.ctx.service_tokens.delete_service_token(id).await {
            Ok(()) => {}
            Err(e) if e.has_error_code(ALREADY_DELETED) => {
                log::info!("Service token {id} already deleted");
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
                service_token::DELETED,
                &service_token::deleted(budget.remaining()),
            )
            .await
    }
}
