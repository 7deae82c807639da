//! Network Edge error mapping

use crate::error::ApiError;
use crate::traits::{ApiErrorMapper, ErrorContext, RawApiError};

use super::NetworkEdgeClient;

impl ApiErrorMapper for NetworkEdgeClient {
    fn service_name(&self) -> &'static str {
        "network-edge"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ApiError {
        // EQ-4010206: SSH public key is invalid (the key no longer exists)
        if raw.has_code("EQ-4010206") {
            return ApiError::AlreadyDeleted {
                service: self.service_name().to_string(),
                resource_id: context.resource_id(),
                status: raw.status,
                codes: raw.codes,
                raw_message: raw.message,
            };
        }
        self.map_status(raw, context)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::TokenProvider;
    use crate::config::RetryPolicy;

    #[test]
    fn invalid_public_key_means_already_deleted() {
        let client = NetworkEdgeClient::new(
            reqwest::Client::new(),
            "https://api.equinix.com",
            Arc::new(TokenProvider::fixed("t")),
            RetryPolicy::default(),
        );
        let err = client.map_error(
            RawApiError::with_codes(400, vec!["EQ-4010206".to_string()], "invalid key"),
            ErrorContext::for_resource("pk-1"),
        );
        assert!(matches!(err, ApiError::AlreadyDeleted { .. }));
        assert!(err.has_error_code("EQ-4010206"));
    }
}
