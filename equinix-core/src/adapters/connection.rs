//! Connection state lookups
//!
//! A connection reports progress on three independent fields. Each wait in
//! the lifecycle picks one of them through [`ConnectionStateAxis`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use equinix_api::{ApiError, Connection, ConnectionsApi};

use crate::convergence::{PollConfig, StateFetcher, StateLabel};

use super::label;

pub const PROVISIONING: &str = "PROVISIONING";
pub const PENDING: &str = "PENDING";
pub const PROVISIONED: &str = "PROVISIONED";
pub const ACTIVE: &str = "ACTIVE";
pub const DEPROVISIONING: &str = "DEPROVISIONING";
pub const DEPROVISIONED: &str = "DEPROVISIONED";
pub const PENDING_APPROVAL: &str = "PENDING_APPROVAL";
pub const CHANGE_COMPLETED: &str = "COMPLETED";

/// Which field of a [`Connection`] a wait observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStateAxis {
    /// Top-level `state`
    Lifecycle,
    /// `change.status`, collapsed to `COMPLETED` or `""`
    ChangeStatus,
    /// `operation.providerStatus`
    ProviderStatus,
}

impl ConnectionStateAxis {
    pub fn extract(self, connection: &Connection) -> StateLabel {
        match self {
            Self::Lifecycle => label(connection.state.as_ref()),
            Self::ChangeStatus => match connection.change.as_ref().and_then(|c| c.status.as_deref()) {
                Some(CHANGE_COMPLETED) => CHANGE_COMPLETED.to_string(),
                _ => String::new(),
            },
            Self::ProviderStatus => label(
                connection
                    .operation
                    .as_ref()
                    .and_then(|op| op.provider_status.as_ref()),
            ),
        }
    }
}

pub struct ConnectionFetcher {
    api: Arc<dyn ConnectionsApi>,
    axis: ConnectionStateAxis,
}

impl ConnectionFetcher {
    pub fn new(api: Arc<dyn ConnectionsApi>, axis: ConnectionStateAxis) -> Self {
        Self { api, axis }
    }

    pub fn lifecycle(api: Arc<dyn ConnectionsApi>) -> Self {
        Self::new(api, ConnectionStateAxis::Lifecycle)
    }

    pub fn change_status(api: Arc<dyn ConnectionsApi>) -> Self {
        Self::new(api, ConnectionStateAxis::ChangeStatus)
    }

    pub fn provider_status(api: Arc<dyn ConnectionsApi>) -> Self {
        Self::new(api, ConnectionStateAxis::ProviderStatus)
    }
}

#[async_trait]
impl StateFetcher for ConnectionFetcher {
    type Resource = Connection;

    async fn fetch(&self, handle: &str) -> Result<Connection, ApiError> {
        self.api.get_connection(handle).await
    }

    fn extract_state(&self, resource: &Connection) -> StateLabel {
        self.axis.extract(resource)
    }
}

/// Right after the POST.
pub fn creation(timeout: Duration) -> PollConfig {
    PollConfig::new([PROVISIONING], [PENDING, PROVISIONED, ACTIVE], timeout)
}

/// Before an update: the connection must be usable, whatever it reports now.
pub fn ready(timeout: Duration) -> PollConfig {
    PollConfig::target_only([ACTIVE, PROVISIONED, PENDING], timeout)
}

pub fn change_completed(timeout: Duration) -> PollConfig {
    PollConfig::target_only([CHANGE_COMPLETED], timeout)
}

/// Third-party approval, observed on `operation.providerStatus`.
pub fn provider_approval(timeout: Duration) -> PollConfig {
    PollConfig::new([PENDING_APPROVAL, PROVISIONING], [PROVISIONED], timeout)
}

pub fn deprovisioning(timeout: Duration) -> PollConfig {
    PollConfig::new([DEPROVISIONING, ACTIVE, PENDING], [DEPROVISIONED], timeout)
}
