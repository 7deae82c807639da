//! Service clients

/// Shared utilities used by service clients.
pub mod common;

mod fabric;
mod metal;
mod network_edge;

pub use fabric::FabricClient;
pub use metal::MetalClient;
pub use network_edge::NetworkEdgeClient;
