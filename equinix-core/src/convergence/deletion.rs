use async_trait::async_trait;

use equinix_api::ApiError;

use super::fetcher::{StateFetcher, StateLabel};

/// Wraps a fetcher so that a vanished resource reads as `deleted_state`.
///
/// Any 4xx from the lookup becomes `None`; other failures pass through.
pub struct DeletionConvergence<F> {
    inner: F,
    deleted_state: StateLabel,
}

impl<F: StateFetcher> DeletionConvergence<F> {
    pub fn new(inner: F, deleted_state: impl Into<StateLabel>) -> Self {
        Self {
            inner,
            deleted_state: deleted_state.into(),
        }
    }

    pub fn deleted_state(&self) -> &str {
        &self.deleted_state
    }
}

#[async_trait]
impl<F: StateFetcher> StateFetcher for DeletionConvergence<F> {
    type Resource = Option<F::Resource>;

    async fn fetch(&self, handle: &str) -> Result<Self::Resource, ApiError> {
        match self.inner.fetch(handle).await {
            Ok(resource) => Ok(Some(resource)),
            Err(e) if e.is_client_error() => {
                log::debug!("[poll] {handle}: lookup returned {e}, treating as deleted");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn extract_state(&self, resource: &Self::Resource) -> StateLabel {
        match resource {
            Some(r) => self.inner.extract_state(r),
            None => self.deleted_state.clone(),
        }
    }
}
