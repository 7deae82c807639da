//! Per-resource [`StateFetcher`](crate::convergence::StateFetcher) adapters
//!
//! Each module maps one Fabric resource onto a state label and provides the
//! `PollConfig` for every transition the lifecycle services wait on.

pub mod connection;
pub mod network;
pub mod route_filter;
pub mod route_filter_rule;
pub mod service_token;

pub use connection::{ConnectionFetcher, ConnectionStateAxis};
pub use network::NetworkFetcher;
pub use route_filter::RouteFilterFetcher;
pub use route_filter_rule::RouteFilterRuleFetcher;
pub use service_token::ServiceTokenFetcher;

use crate::convergence::StateLabel;

/// A missing field reads as the empty label.
fn label(value: Option<&String>) -> StateLabel {
    value.cloned().unwrap_or_default()
}
