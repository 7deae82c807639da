use std::marker::PhantomData;

use async_trait::async_trait;
use futures::future::BoxFuture;

use equinix_api::ApiError;

/// Lifecycle label extracted from a fetched resource (`PROVISIONING`, `ACTIVE`, ...).
pub type StateLabel = String;

/// Looks up the current state of one remote resource.
#[async_trait]
pub trait StateFetcher: Send + Sync {
    type Resource: Send;

    /// One GET against the remote API.
    async fn fetch(&self, handle: &str) -> Result<Self::Resource, ApiError>;

    /// Must be pure: the same resource always yields the same label.
    fn extract_state(&self, resource: &Self::Resource) -> StateLabel;
}

/// [`StateFetcher`] built from a pair of closures.
///
/// ```rust
/// use equinix_core::convergence::{FnFetcher, StateFetcher};
/// use futures::FutureExt;
///
/// let fetcher = FnFetcher::new(
///     |id: String| async move { Ok::<_, equinix_api::ApiError>(format!("{id}:ACTIVE")) }.boxed(),
///     |res: &String| res.rsplit(':').next().unwrap_or_default().to_string(),
/// );
/// assert_eq!(fetcher.extract_state(&"x:ACTIVE".to_string()), "ACTIVE");
/// ```
pub struct FnFetcher<R, F, S> {
    fetch: F,
    state: S,
    _resource: PhantomData<fn() -> R>,
}

impl<R, F, S> FnFetcher<R, F, S>
where
    F: Fn(String) -> BoxFuture<'static, Result<R, ApiError>> + Send + Sync,
    S: Fn(&R) -> StateLabel + Send + Sync,
{
    pub fn new(fetch: F, state: S) -> Self {
        Self {
            fetch,
            state,
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R, F, S> StateFetcher for FnFetcher<R, F, S>
where
    R: Send + 'static,
    F: Fn(String) -> BoxFuture<'static, Result<R, ApiError>> + Send + Sync,
    S: Fn(&R) -> StateLabel + Send + Sync,
{
    type Resource = R;

    async fn fetch(&self, handle: &str) -> Result<R, ApiError> {
        (self.fetch)(handle.to_string()).await
    }

    fn extract_state(&self, resource: &R) -> StateLabel {
        (self.state)(resource)
    }
}
