//! Timeout budgeting across the steps of one operation

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Held back from every operation budget so the caller still has time to
/// report the failure.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(30);

/// Wall-clock budget of one create/read/update/delete operation.
///
/// Started before the first API call. Each wait in the operation polls for
/// [`remaining`](Self::remaining), so the mutating calls and earlier waits
/// are charged against the same total.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutBudget {
    started: Instant,
    total: Duration,
    margin: Duration,
}

impl TimeoutBudget {
    pub fn start(total: Duration) -> Self {
        Self::with_margin(total, SAFETY_MARGIN)
    }

    pub fn with_margin(total: Duration, margin: Duration) -> Self {
        Self {
            started: Instant::now(),
            total,
            margin,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// `total - margin - elapsed`, zero once used up.
    pub fn remaining(&self) -> Duration {
        self.total
            .saturating_sub(self.margin)
            .saturating_sub(self.elapsed())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Budgets for the four operations of one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTimeouts {
    #[serde(with = "secs")]
    pub create: Duration,
    #[serde(with = "secs")]
    pub read: Duration,
    #[serde(with = "secs")]
    pub update: Duration,
    #[serde(with = "secs")]
    pub delete: Duration,
}

impl OperationTimeouts {
    pub const fn uniform(timeout: Duration) -> Self {
        Self {
            create: timeout,
            read: timeout,
            update: timeout,
            delete: timeout,
        }
    }

    /// Same budget for the mutating operations, a separate one for reads.
    pub const fn mutating(timeout: Duration, read: Duration) -> Self {
        Self {
            create: timeout,
            read,
            update: timeout,
            delete: timeout,
        }
    }
}

const fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

/// Default budget per resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTimeouts {
    pub connection: OperationTimeouts,
    pub network: OperationTimeouts,
    pub route_filter: OperationTimeouts,
    pub route_filter_rule: OperationTimeouts,
    pub service_token: OperationTimeouts,
    pub ssh_key: OperationTimeouts,
}

impl Default for ResourceTimeouts {
    fn default() -> Self {
        Self {
            connection: OperationTimeouts::mutating(minutes(15), minutes(10)),
            network: OperationTimeouts::uniform(minutes(10)),
            route_filter: OperationTimeouts::uniform(minutes(10)),
            route_filter_rule: OperationTimeouts::uniform(minutes(10)),
            service_token: OperationTimeouts::uniform(minutes(10)),
            ssh_key: OperationTimeouts::mutating(minutes(5), minutes(10)),
        }
    }
}

/// Durations as whole seconds on the wire.
mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
