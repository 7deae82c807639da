//! Metal error mapping

use crate::error::ApiError;
use crate::traits::{ApiErrorMapper, ErrorContext, RawApiError};

use super::MetalClient;

/// Metal reports errors as free text, so mapping is status-only.
impl ApiErrorMapper for MetalClient {
    fn service_name(&self) -> &'static str {
        "metal"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ApiError {
        self.map_status(raw, context)
    }
}
