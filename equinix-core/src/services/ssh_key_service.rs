//! SSH keys: Metal project/user keys and Network Edge public keys
//!
//! Neither has an asynchronous lifecycle, so nothing here polls. Each call
//! is still bounded by the `ssh_key` operation budget.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use equinix_api::{ApiError, PublicKey, PublicKeyRequest, SshKey, SshKeyInput};

use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, found, log_error};

/// SSH key service
pub struct SshKeyService {
    ctx: Arc<ServiceContext>,
}

impl SshKeyService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    // ===== Metal =====

    pub async fn create(&self, input: &SshKeyInput) -> CoreResult<SshKey> {
        let key = within(
            "metal",
            self.ctx.timeouts.ssh_key.create,
            self.ctx.ssh_keys.create_ssh_key(input),
        )
        .await?;
        log::info!("Created SSH key {}", key.id);
        Ok(key)
    }

    /// `None` when the key is gone or no longer visible to the token.
    pub async fn read(&self, id: &str) -> CoreResult<Option<SshKey>> {
        let result = tokio::time::timeout(
            self.ctx.timeouts.ssh_key.read,
            self.ctx.ssh_keys.get_ssh_key(id),
        )
        .await
        .unwrap_or_else(|_| Err(timed_out("metal", self.ctx.timeouts.ssh_key.read)));
        match result {
            Err(ApiError::PermissionDenied { .. }) => {
                log::warn!("SSH key {id} is not accessible, treating as removed");
                Ok(None)
            }
            other => found(other),
        }
    }

    pub async fn update(&self, id: &str, input: &SshKeyInput) -> CoreResult<SshKey> {
        if input.label.is_none() && input.key.is_none() {
            return Err(CoreError::NothingToUpdate {
                kind: "ssh key".to_string(),
                id: id.to_string(),
            });
        }
        within(
            "metal",
            self.ctx.timeouts.ssh_key.update,
            self.ctx.ssh_keys.update_ssh_key(id, input),
        )
        .await
    }

    /// Deleting a missing or inaccessible key succeeds.
    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        let result = within(
            "metal",
            self.ctx.timeouts.ssh_key.delete,
            self.ctx.ssh_keys.delete_ssh_key(id),
        )
        .await;
        match result {
            Err(CoreError::Api(ApiError::NotFound { .. } | ApiError::PermissionDenied { .. })) => {
                log::info!("SSH key {id} already gone");
                Ok(())
            }
            other => other,
        }
    }

    // ===== Network Edge =====

    pub async fn create_public_key(&self, req: &PublicKeyRequest) -> CoreResult<PublicKey> {
        within(
            "network-edge",
            self.ctx.timeouts.ssh_key.create,
            self.ctx.public_keys.create_public_key(req),
        )
        .await
    }

    pub async fn read_public_key(&self, id: &str) -> CoreResult<Option<PublicKey>> {
        found(self.ctx.public_keys.get_public_key(id).await)
    }

    /// `EQ-4010206` and 404 both mean the key is already gone.
    pub async fn delete_public_key(&self, id: &str) -> CoreResult<()> {
        match self.ctx.public_keys.delete_public_key(id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_already_deleted() || e.is_not_found() => {
                log::info!("Public key {id} already deleted");
                Ok(())
            }
            Err(e) => Err(log_error(e.into())),
        }
    }
}

fn timed_out(service: &str, limit: Duration) -> ApiError {
    ApiError::Timeout {
        service: service.to_string(),
        detail: format!("no response within {}s", limit.as_secs()),
    }
}

/// Run one API call under `limit`.
async fn within<T>(
    service: &str,
    limit: Duration,
    call: impl Future<Output = Result<T, ApiError>>,
) -> CoreResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(log_error(e.into())),
        Err(_) => Err(log_error(timed_out(service, limit).into())),
    }
}
