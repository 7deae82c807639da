//! Fabric error mapping

use crate::error::ApiError;
use crate::traits::{ApiErrorMapper, ErrorContext, RawApiError};

use super::FabricClient;

/// Fabric error code mapping
impl ApiErrorMapper for FabricClient {
    fn service_name(&self) -> &'static str {
        "fabric"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ApiError {
        // EQ-3142509: Connection / route filter already deleted
        // EQ-3034019: Service token already deleted
        if raw.has_code("EQ-3142509") || raw.has_code("EQ-3034019") {
            return ApiError::AlreadyDeleted {
                service: self.service_name().to_string(),
                resource_id: context.resource_id(),
                status: raw.status,
                codes: raw.codes,
                raw_message: raw.message,
            };
        }

        // EQ-3040055: There is an existing update in REQUESTED state
        if raw.has_code("EQ-3040055") {
            return ApiError::UpdatePending {
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
    use crate::correlation::CorrelationIdGenerator;

    fn client() -> FabricClient {
        FabricClient::new(
            reqwest::Client::new(),
            "https://api.equinix.com",
            Arc::new(TokenProvider::fixed("t")),
            Arc::new(CorrelationIdGenerator::with_seed(0)),
            RetryPolicy::default(),
        )
    }

    fn raw(status: u16, codes: &[&str]) -> RawApiError {
        RawApiError::with_codes(
            status,
            codes.iter().map(ToString::to_string).collect(),
            "msg",
        )
    }

    #[test]
    fn already_deleted_codes() {
        let c = client();
        for code in ["EQ-3142509", "EQ-3034019"] {
            let err = c.map_error(raw(400, &[code]), ErrorContext::for_resource("r-1"));
            assert!(
                matches!(&err, ApiError::AlreadyDeleted { resource_id, .. } if resource_id == "r-1"),
                "{code}: {err:?}"
            );
            assert!(err.has_error_code(code));
        }
    }

    #[test]
    fn already_deleted_found_among_other_codes() {
        let err = client().map_error(
            raw(400, &["EQ-3000000", "EQ-3142509"]),
            ErrorContext::default(),
        );
        assert!(matches!(err, ApiError::AlreadyDeleted { .. }));
    }

    #[test]
    fn update_pending_code() {
        let err = client().map_error(raw(400, &["EQ-3040055"]), ErrorContext::default());
        assert!(matches!(err, ApiError::UpdatePending { .. }));
    }

    #[test]
    fn status_fallbacks() {
        let c = client();
        assert!(matches!(
            c.map_error(raw(401, &[]), ErrorContext::default()),
            ApiError::InvalidCredentials { .. }
        ));
        assert!(matches!(
            c.map_error(raw(403, &[]), ErrorContext::default()),
            ApiError::PermissionDenied { .. }
        ));
        assert!(matches!(
            c.map_error(raw(404, &[]), ErrorContext::for_resource("x")),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            c.map_error(raw(422, &["EQ-1"]), ErrorContext::default()),
            ApiError::InvalidRequest { status: 422, .. }
        ));
        assert!(matches!(
            c.map_error(raw(500, &[]), ErrorContext::default()),
            ApiError::Unknown { status: Some(500), .. }
        ));
    }
}
