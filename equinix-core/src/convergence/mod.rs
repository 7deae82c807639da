//! State convergence: poll a remote resource until it settles.
//!
//! A [`StateFetcher`] knows how to look up one resource type and read its
//! lifecycle label. [`ConvergencePoller`] drives it under a [`PollConfig`];
//! delete flows go through [`ConvergencePoller::poll_deletion`], which wraps
//! the fetcher in [`DeletionConvergence`]. Multi-step operations share one
//! [`TimeoutBudget`].

mod budget;
mod config;
mod deletion;
mod fetcher;
mod poller;

pub use budget::{OperationTimeouts, ResourceTimeouts, SAFETY_MARGIN, TimeoutBudget};
pub use config::{DEFAULT_DELAY, DEFAULT_MIN_INTERVAL, PollConfig};
pub use deletion::DeletionConvergence;
pub use fetcher::{FnFetcher, StateFetcher, StateLabel};
pub use poller::ConvergencePoller;
