//! Fabric connection lifecycle

use std::sync::Arc;

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use equinix_api::{ChangeOperation, Connection, ConnectionRequest, KeyValue};

use crate::adapters::connection::{self, ConnectionFetcher};
use crate::convergence::TimeoutBudget;
use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, found, log_error};

const KIND: &str = "connection";
/// Fabric code for a connection that is already gone
const ALREADY_DELETED: &str = "EQ-3142509";
const AWS_ACCESS_KEY: &str = "accessKey";
const AWS_SECRET_KEY: &str = "secretKey";

/// Fabric connection service
pub struct ConnectionService {
    ctx: Arc<ServiceContext>,
}

impl ConnectionService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Create a connection and wait until it is usable.
    ///
    /// When `additional_info` carries AWS credentials they are pushed in a
    /// follow-up patch, and the call also waits for the provider to approve.
    pub async fn create(
        &self,
        req: &ConnectionRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<Connection> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.connection.create);
        let created = self
            .ctx
            .connections
            .create_connection(req)
            .await
            .map_err(|e| log_error(e.into()))?;
        let id = created.uuid;
        log::info!("Created connection {id}, waiting for provisioning");

        let mut conn = self
            .ctx
            .wait_for(
                cancel,
                KIND,
                &id,
                "created",
                &ConnectionFetcher::lifecycle(self.ctx.connections.clone()),
                &connection::creation(budget.remaining()),
            )
            .await?;

        if let Some(secrets) = aws_secrets(&req.additional_info) {
            self.ctx
                .connections
                .update_connection(&id, &[add_secrets(&secrets)])
                .await
                .map_err(|e| log_error(e.into()))?;
            conn = self.wait_for_provider(&id, &budget, cancel).await?;
        }
        Ok(conn)
    }

    /// `None` once the connection is gone or any 4xx hides it.
    pub async fn read(&self, id: &str) -> CoreResult<Option<Connection>> {
        match self.ctx.connections.get_connection(id).await {
            Err(e) if e.is_client_error() && !e.is_not_found() => {
                log::warn!("Connection {id} is no longer readable, treating as removed: {e}");
                Ok(None)
            }
            other => found(other),
        }
    }

    /// Bring the connection in line with `desired`.
    ///
    /// Each change is patched and awaited on its own. A failed change does
    /// not stop the remaining ones; all failures come back together as
    /// [`CoreError::PartialUpdate`], along with the connection as last seen.
    pub async fn update(
        &self,
        id: &str,
        desired: &ConnectionRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<Connection> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.connection.update);
        let current = self
            .ctx
            .wait_for(
                cancel,
                KIND,
                id,
                "ready for update",
                &ConnectionFetcher::lifecycle(self.ctx.connections.clone()),
                &connection::ready(budget.remaining()),
            )
            .await?;

        let changes = change_operations(&current, desired);
        if changes.is_empty() {
            return Err(CoreError::NothingToUpdate {
                kind: KIND.to_string(),
                id: id.to_string(),
            });
        }

        let mut latest = current;
        let mut failures = Vec::new();
        for change in changes {
            if let Err(e) = self.ctx.connections.update_connection(id, &[change.clone()]).await {
                log::warn!("Connection {id}: {} {} rejected: {e}", change.op, change.path);
                failures.push(format!(
                    "connection property update request error: {e} [{} {}]",
                    change.op, change.path
                ));
                continue;
            }

            let waited = if change.op == "add" {
                self.wait_for_provider(id, &budget, cancel).await
            } else {
                self.ctx
                    .wait_for(
                        cancel,
                        KIND,
                        id,
                        "updated",
                        &ConnectionFetcher::change_status(self.ctx.connections.clone()),
                        &connection::change_completed(budget.remaining()),
                    )
                    .await
            };
            match waited {
                Ok(conn) => latest = conn,
                Err(e) => failures.push(format!(
                    "connection property update completion error: {e} [{} {}]",
                    change.op, change.path
                )),
            }
        }

        if failures.is_empty() {
            Ok(latest)
        } else {
            Err(CoreError::PartialUpdate {
                failures,
                latest: Box::new(latest),
            })
        }
    }

    /// Delete and wait for deprovisioning. Deleting a deleted connection is a no-op.
    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> CoreResult<()> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.connection.delete);
        match self.ctx.connections.delete_connection(id).await {
            Ok(()) => {}
            Err(e) if e.has_error_code(ALREADY_DELETED) => {
                log::info!("Connection {id} already deleted");
                return Ok(());
            }
            Err(e) => return Err(log_error(e.into())),
        }

        self.ctx
            .wait_for_deletion(
                cancel,
                KIND,
                id,
                ConnectionFetcher::lifecycle(self.ctx.connections.clone()),
                connection::DEPROVISIONED,
                &connection::deprovisioning(budget.remaining()),
            )
            .await
    }

    async fn wait_for_provider(
        &self,
        id: &str,
        budget: &TimeoutBudget,
        cancel: &CancellationToken,
    ) -> CoreResult<Connection> {
        self.ctx
            .wait_for(
                cancel,
                KIND,
                id,
                "approved by provider",
                &ConnectionFetcher::provider_status(self.ctx.connections.clone()),
                &connection::provider_approval(budget.remaining()),
            )
            .await
    }
}

/// The `accessKey`/`secretKey` pair, only when both are present.
fn aws_secrets(info: &[KeyValue]) -> Option<Vec<KeyValue>> {
    let find = |key: &str| info.iter().find(|kv| kv.key == key).cloned();
    Some(vec![find(AWS_ACCESS_KEY)?, find(AWS_SECRET_KEY)?])
}

fn add_secrets(secrets: &[KeyValue]) -> ChangeOperation {
    let info: Vec<Value> = secrets
        .iter()
        .map(|kv| json!({ "key": kv.key, "value": kv.value }))
        .collect();
    ChangeOperation::add("", json!({ "additionalInfo": info }))
}

fn change_operations(current: &Connection, desired: &ConnectionRequest) -> Vec<ChangeOperation> {
    let mut ops = Vec::new();
    if current.name.as_deref() != Some(desired.name.as_str()) {
        ops.push(ChangeOperation::replace("/name", desired.name.clone()));
    }
    if current.bandwidth != Some(desired.bandwidth) {
        ops.push(ChangeOperation::replace("/bandwidth", desired.bandwidth));
    }
    let awaiting_approval = current
        .operation
        .as_ref()
        .and_then(|op| op.provider_status.as_deref())
        == Some(connection::PENDING_APPROVAL);
    if awaiting_approval {
        if let Some(secrets) = aws_secrets(&desired.additional_info) {
            ops.push(add_secrets(&secrets));
        }
    }
    ops
}
