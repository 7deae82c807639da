use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::types::{
    ChangeOperation, Connection, ConnectionRequest, Network, NetworkRequest, PublicKey,
    PublicKeyRequest, RouteFilter, RouteFilterRequest, RouteFilterRule, RouteFilterRuleRequest,
    ServiceToken, ServiceTokenRequest, SshKey, SshKeyInput,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP 状态码
    pub status: u16,
    /// 响应体中列出的全部错误码（按出现顺序）
    pub codes: Vec<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            codes: Vec::new(),
            message: message.into(),
        }
    }

    pub fn with_codes(status: u16, codes: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            codes,
            message: message.into(),
        }
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 资源 ID（用于 `NotFound` / `AlreadyDeleted` 等错误）
    pub resource_id: Option<String>,
}

impl ErrorContext {
    pub fn for_resource(id: impl Into<String>) -> Self {
        Self {
            resource_id: Some(id.into()),
        }
    }

    pub fn resource_id(&self) -> String {
        self.resource_id
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Per-service error mapping (internal).
///
/// Each service client turns a non-2xx response into the unified [`ApiError`].
pub(crate) trait ApiErrorMapper {
    /// Service tag used in every error and log line
    fn service_name(&self) -> &'static str;

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ApiError;

    fn serialization_error(&self, detail: impl ToString) -> ApiError {
        ApiError::SerializationError {
            service: self.service_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Status-based mapping shared by every service once its own codes are handled.
    fn map_status(&self, raw: RawApiError, context: ErrorContext) -> ApiError {
        let service = self.service_name().to_string();
        match raw.status {
            401 => ApiError::InvalidCredentials {
                service,
                raw_message: Some(raw.message),
            },
            403 => ApiError::PermissionDenied {
                service,
                raw_message: Some(raw.message),
            },
            404 => ApiError::NotFound {
                service,
                resource_id: context.resource_id(),
                raw_message: Some(raw.message),
            },
            400..=499 => ApiError::InvalidRequest {
                service,
                status: raw.status,
                codes: raw.codes,
                raw_message: raw.message,
            },
            _ => self.unknown_error(raw),
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> ApiError {
        ApiError::Unknown {
            service: self.service_name().to_string(),
            status: Some(raw.status),
            codes: raw.codes,
            raw_message: raw.message,
        }
    }
}

/// Fabric virtual connections.
#[async_trait]
pub trait ConnectionsApi: Send + Sync {
    async fn get_connection(&self, id: &str) -> Result<Connection>;

    async fn create_connection(&self, req: &ConnectionRequest) -> Result<Connection>;

    /// Apply JSON-patch style operations. Fabric answers with the connection
    /// carrying the new `change` record.
    async fn update_connection(&self, id: &str, ops: &[ChangeOperation]) -> Result<Connection>;

    async fn delete_connection(&self, id: &str) -> Result<()>;
}

/// Fabric networks.
#[async_trait]
pub trait NetworksApi: Send + Sync {
    async fn get_network(&self, id: &str) -> Result<Network>;

    async fn create_network(&self, req: &NetworkRequest) -> Result<Network>;

    async fn update_network(&self, id: &str, ops: &[ChangeOperation]) -> Result<Network>;

    async fn delete_network(&self, id: &str) -> Result<()>;
}

/// Fabric route filters.
#[async_trait]
pub trait RouteFiltersApi: Send + Sync {
    async fn get_route_filter(&self, id: &str) -> Result<RouteFilter>;

    async fn create_route_filter(&self, req: &RouteFilterRequest) -> Result<RouteFilter>;

    /// Full replacement (`PUT`)
    async fn replace_route_filter(&self, id: &str, req: &RouteFilterRequest) -> Result<RouteFilter>;

    async fn delete_route_filter(&self, id: &str) -> Result<()>;
}

/// Rules nested under a Fabric route filter.
#[async_trait]
pub trait RouteFilterRulesApi: Send + Sync {
    async fn get_route_filter_rule(&self, filter_id: &str, rule_id: &str)
    -> Result<RouteFilterRule>;

    async fn create_route_filter_rule(
        &self,
        filter_id: &str,
        req: &RouteFilterRuleRequest,
    ) -> Result<RouteFilterRule>;

    async fn replace_route_filter_rule(
        &self,
        filter_id: &str,
        rule_id: &str,
        req: &RouteFilterRuleRequest,
    ) -> Result<RouteFilterRule>;

    async fn delete_route_filter_rule(&self, filter_id: &str, rule_id: &str) -> Result<()>;
}

/// Fabric service tokens.
#[async_trait]
pub trait ServiceTokensApi: Send + Sync {
    async fn get_service_token(&self, id: &str) -> Result<ServiceToken>;

    async fn create_service_token(&self, req: &ServiceTokenRequest) -> Result<ServiceToken>;

    async fn update_service_token(
        &self,
        id: &str,
        ops: &[ChangeOperation],
    ) -> Result<ServiceToken>;

    async fn delete_service_token(&self, id: &str) -> Result<()>;
}

/// Metal user SSH keys.
#[async_trait]
pub trait SshKeysApi: Send + Sync {
    async fn get_ssh_key(&self, id: &str) -> Result<SshKey>;

    async fn create_ssh_key(&self, req: &SshKeyInput) -> Result<SshKey>;

    async fn update_ssh_key(&self, id: &str, req: &SshKeyInput) -> Result<SshKey>;

    async fn delete_ssh_key(&self, id: &str) -> Result<()>;
}

/// Network Edge SSH public keys.
#[async_trait]
pub trait PublicKeysApi: Send + Sync {
    async fn get_public_key(&self, id: &str) -> Result<PublicKey>;

    async fn create_public_key(&self, req: &PublicKeyRequest) -> Result<PublicKey>;

    async fn delete_public_key(&self, id: &str) -> Result<()>;
}
