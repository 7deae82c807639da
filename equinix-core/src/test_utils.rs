//! 测试辅助模块
//!
//! Scripted mock APIs: every call pops the next queued response, the last
//! one repeats. Calls are recorded so tests can assert on the sequence.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use equinix_api::{
    ApiError, ChangeOperation, Connection, ConnectionOperation, ConnectionRequest,
    ConnectionsApi, Network, NetworkOperation, NetworkRequest, NetworksApi, PublicKey,
    PublicKeyRequest, PublicKeysApi, Result, RouteFilter, RouteFilterRequest, RouteFilterRule,
    RouteFilterRuleRequest, RouteFilterRulesApi, RouteFiltersApi, ServiceToken,
    ServiceTokenRequest, ServiceTokensApi, SshKey, SshKeyInput, SshKeysApi,
};

use crate::convergence::{OperationTimeouts, ResourceTimeouts};
use crate::services::ServiceContext;

// ===== Script =====

pub struct Script<T> {
    steps: RwLock<VecDeque<Result<T>>>,
}

impl<T: Clone> Script<T> {
    pub fn new() -> Self {
        Self {
            steps: RwLock::new(VecDeque::new()),
        }
    }

    pub async fn push(&self, step: Result<T>) {
        self.steps.write().await.push_back(step);
    }

    pub async fn push_all(&self, steps: impl IntoIterator<Item = Result<T>>) {
        self.steps.write().await.extend(steps);
    }

    async fn next(&self, op: &str) -> Result<T> {
        let mut steps = self.steps.write().await;
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps.front().cloned().unwrap_or_else(|| Err(unscripted(op)))
        }
    }
}

fn unscripted(op: &str) -> ApiError {
    ApiError::Unknown {
        service: "mock".to_string(),
        status: None,
        codes: Vec::new(),
        raw_message: format!("unscripted call: {op}"),
    }
}

/// Records `"<op> <args>"` for each call.
#[derive(Default)]
pub struct CallLog(RwLock<Vec<String>>);

impl CallLog {
    async fn record(&self, call: String) {
        self.0.write().await.push(call);
    }

    pub async fn all(&self) -> Vec<String> {
        self.0.read().await.clone()
    }

    pub async fn count(&self, prefix: &str) -> usize {
        self.0
            .read()
            .await
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

// ===== Error factories =====

pub fn not_found(id: &str) -> ApiError {
    ApiError::NotFound {
        service: "fabric".to_string(),
        resource_id: id.to_string(),
        raw_message: None,
    }
}

pub fn server_error() -> ApiError {
    ApiError::Unknown {
        service: "fabric".to_string(),
        status: Some(500),
        codes: Vec::new(),
        raw_message: "internal error".to_string(),
    }
}

pub fn already_deleted(id: &str, code: &str) -> ApiError {
    ApiError::AlreadyDeleted {
        service: "fabric".to_string(),
        resource_id: id.to_string(),
        status: 400,
        codes: vec![code.to_string()],
        raw_message: format!("{code}: already deleted"),
    }
}

pub fn update_pending(id: &str) -> ApiError {
    ApiError::UpdatePending {
        service: "fabric".to_string(),
        resource_id: id.to_string(),
        status: 400,
        codes: vec!["EQ-3040055".to_string()],
        raw_message: "EQ-3040055: existing update pending".to_string(),
    }
}

// ===== Model factories =====

pub fn connection(id: &str, state: &str) -> Connection {
    Connection {
        uuid: id.to_string(),
        name: Some("conn".to_string()),
        bandwidth: Some(50),
        state: Some(state.to_string()),
        ..Connection::default()
    }
}

pub fn connection_with_provider(id: &str, state: &str, provider_status: &str) -> Connection {
    Connection {
        operation: Some(ConnectionOperation {
            provider_status: Some(provider_status.to_string()),
            equinix_status: None,
        }),
        ..connection(id, state)
    }
}

pub fn network(id: &str, status: &str) -> Network {
    Network {
        uuid: id.to_string(),
        name: Some("net".to_string()),
        operation: Some(NetworkOperation {
            equinix_status: Some(status.to_string()),
        }),
        ..Network::default()
    }
}

pub fn route_filter(id: &str, state: &str) -> RouteFilter {
    RouteFilter {
        uuid: id.to_string(),
        state: Some(state.to_string()),
        ..RouteFilter::default()
    }
}

pub fn route_filter_rule(id: &str, state: &str) -> RouteFilterRule {
    RouteFilterRule {
        uuid: id.to_string(),
        state: Some(state.to_string()),
        ..RouteFilterRule::default()
    }
}

pub fn service_token(id: &str, state: &str) -> ServiceToken {
    ServiceToken {
        uuid: id.to_string(),
        state: Some(state.to_string()),
        ..ServiceToken::default()
    }
}

// ===== MockConnectionsApi =====

pub struct MockConnectionsApi {
    pub gets: Script<Connection>,
    pub creates: Script<Connection>,
    pub updates: Script<Connection>,
    pub deletes: Script<()>,
    pub patches: RwLock<Vec<Vec<ChangeOperation>>>,
    pub calls: CallLog,
}

impl MockConnectionsApi {
    pub fn new() -> Self {
        Self {
            gets: Script::new(),
            creates: Script::new(),
            updates: Script::new(),
            deletes: Script::new(),
            patches: RwLock::new(Vec::new()),
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl ConnectionsApi for MockConnectionsApi {
    async fn get_connection(&self, id: &str) -> Result<Connection> {
        self.calls.record(format!("get {id}")).await;
        self.gets.next("get_connection").await
    }

    async fn create_connection(&self, req: &ConnectionRequest) -> Result<Connection> {
        self.calls.record(format!("create {}", req.name)).await;
        self.creates.next("create_connection").await
    }

    async fn update_connection(&self, id: &str, ops: &[ChangeOperation]) -> Result<Connection> {
        let summary: Vec<String> = ops.iter().map(|o| format!("{} {}", o.op, o.path)).collect();
        self.calls
            .record(format!("patch {id} {}", summary.join(",")))
            .await;
        self.patches.write().await.push(ops.to_vec());
        self.updates.next("update_connection").await
    }

    async fn delete_connection(&self, id: &str) -> Result<()> {
        self.calls.record(format!("delete {id}")).await;
        self.deletes.next("delete_connection").await
    }
}

// ===== MockNetworksApi =====

pub struct MockNetworksApi {
    pub gets: Script<Network>,
    pub creates: Script<Network>,
    pub updates: Script<Network>,
    pub deletes: Script<()>,
    pub calls: CallLog,
}

impl MockNetworksApi {
    pub fn new() -> Self {
        Self {
            gets: Script::new(),
            creates: Script::new(),
            updates: Script::new(),
            deletes: Script::new(),
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl NetworksApi for MockNetworksApi {
    async fn get_network(&self, id: &str) -> Result<Network> {
        self.calls.record(format!("get {id}")).await;
        self.gets.next("get_network").await
    }

    async fn create_network(&self, req: &NetworkRequest) -> Result<Network> {
        self.calls.record(format!("create {}", req.name)).await;
        self.creates.next("create_network").await
    }

    async fn update_network(&self, id: &str, ops: &[ChangeOperation]) -> Result<Network> {
        let summary: Vec<String> = ops.iter().map(|o| format!("{} {}", o.op, o.path)).collect();
        self.calls
            .record(format!("patch {id} {}", summary.join(",")))
            .await;
        self.updates.next("update_network").await
    }

    async fn delete_network(&self, id: &str) -> Result<()> {
        self.calls.record(format!("delete {id}")).await;
        self.deletes.next("delete_network").await
    }
}

// ===== MockRouteFiltersApi =====

pub struct MockRouteFiltersApi {
    pub gets: Script<RouteFilter>,
    pub creates: Script<RouteFilter>,
    pub replaces: Script<RouteFilter>,
    pub deletes: Script<()>,
    pub calls: CallLog,
}

impl MockRouteFiltersApi {
    pub fn new() -> Self {
        Self {
            gets: Script::new(),
            creates: Script::new(),
            replaces: Script::new(),
            deletes: Script::new(),
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl RouteFiltersApi for MockRouteFiltersApi {
    async fn get_route_filter(&self, id: &str) -> Result<RouteFilter> {
        self.calls.record(format!("get {id}")).await;
        self.gets.next("get_route_filter").await
    }

    async fn create_route_filter(&self, req: &RouteFilterRequest) -> Result<RouteFilter> {
        self.calls.record(format!("create {}", req.name)).await;
        self.creates.next("create_route_filter").await
    }

    async fn replace_route_filter(&self, id: &str, _req: &RouteFilterRequest) -> Result<RouteFilter> {
        self.calls.record(format!("replace {id}")).await;
        self.replaces.next("replace_route_filter").await
    }

    async fn delete_route_filter(&self, id: &str) -> Result<()> {
        self.calls.record(format!("delete {id}")).await;
        self.deletes.next("delete_route_filter").await
    }
}

// ===== MockRouteFilterRulesApi =====

pub struct MockRouteFilterRulesApi {
    pub gets: Script<RouteFilterRule>,
    pub creates: Script<RouteFilterRule>,
    pub replaces: Script<RouteFilterRule>,
    pub deletes: Script<()>,
    pub calls: CallLog,
}

impl MockRouteFilterRulesApi {
    pub fn new() -> Self {
        Self {
            gets: Script::new(),
            creates: Script::new(),
            replaces: Script::new(),
            deletes: Script::new(),
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl RouteFilterRulesApi for MockRouteFilterRulesApi {
    async fn get_route_filter_rule(&self, filter_id: &str, rule_id: &str) -> Result<RouteFilterRule> {
        self.calls.record(format!("get {filter_id}/{rule_id}")).await;
        self.gets.next("get_route_filter_rule").await
    }

    async fn create_route_filter_rule(
        &self,
        filter_id: &str,
        req: &RouteFilterRuleRequest,
    ) -> Result<RouteFilterRule> {
        self.calls
            .record(format!("create {filter_id} {}", req.prefix))
            .await;
        self.creates.next("create_route_filter_rule").await
    }

    async fn replace_route_filter_rule(
        &self,
        filter_id: &str,
        rule_id: &str,
        _req: &RouteFilterRuleRequest,
    ) -> Result<RouteFilterRule> {
        self.calls
            .record(format!("replace {filter_id}/{rule_id}"))
            .await;
        self.replaces.next("replace_route_filter_rule").await
    }

    async fn delete_route_filter_rule(&self, filter_id: &str, rule_id: &str) -> Result<()> {
        self.calls
            .record(format!("delete {filter_id}/{rule_id}"))
            .await;
        self.deletes.next("delete_route_filter_rule").await
    }
}

// ===== MockServiceTokensApi =====

pub struct MockServiceTokensApi {
    pub gets: Script<ServiceToken>,
    pub creates: Script<ServiceToken>,
    pub updates: Script<ServiceToken>,
    pub deletes: Script<()>,
    pub calls: CallLog,
}

impl MockServiceTokensApi {
    pub fn new() -> Self {
        Self {
            gets: Script::new(),
            creates: Script::new(),
            updates: Script::new(),
            deletes: Script::new(),
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl ServiceTokensApi for MockServiceTokensApi {
    async fn get_service_token(&self, id: &str) -> Result<ServiceToken> {
        self.calls.record(format!("get {id}")).await;
        self.gets.next("get_service_token").await
    }

    async fn create_service_token(&self, req: &ServiceTokenRequest) -> Result<ServiceToken> {
        self.calls
            .record(format!("create {}", req.token_type))
            .await;
        self.creates.next("create_service_token").await
    }

    async fn update_service_token(
        &self,
        id: &str,
        ops: &[ChangeOperation],
    ) -> Result<ServiceToken> {
        self.calls
            .record(format!("patch {id} {}", ops.len()))
            .await;
        self.updates.next("update_service_token").await
    }

    async fn delete_service_token(&self, id: &str) -> Result<()> {
        self.calls.record(format!("delete {id}")).await;
        self.deletes.next("delete_service_token").await
    }
}

// ===== MockSshKeysApi =====

pub struct MockSshKeysApi {
    pub gets: Script<SshKey>,
    pub creates: Script<SshKey>,
    pub updates: Script<SshKey>,
    pub deletes: Script<()>,
    pub calls: CallLog,
}

impl MockSshKeysApi {
    pub fn new() -> Self {
        Self {
            gets: Script::new(),
            creates: Script::new(),
            updates: Script::new(),
            deletes: Script::new(),
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl SshKeysApi for MockSshKeysApi {
    async fn get_ssh_key(&self, id: &str) -> Result<SshKey> {
        self.calls.record(format!("get {id}")).await;
        self.gets.next("get_ssh_key").await
    }

    async fn create_ssh_key(&self, input: &SshKeyInput) -> Result<SshKey> {
        self.calls
            .record(format!("create {}", input.label.as_deref().unwrap_or_default()))
            .await;
        self.creates.next("create_ssh_key").await
    }

    async fn update_ssh_key(&self, id: &str, _input: &SshKeyInput) -> Result<SshKey> {
        self.calls.record(format!("update {id}")).await;
        self.updates.next("update_ssh_key").await
    }

    async fn delete_ssh_key(&self, id: &str) -> Result<()> {
        self.calls.record(format!("delete {id}")).await;
        self.deletes.next("delete_ssh_key").await
    }
}

// ===== MockPublicKeysApi =====

pub struct MockPublicKeysApi {
    pub gets: Script<PublicKey>,
    pub creates: Script<PublicKey>,
    pub deletes: Script<()>,
    pub calls: CallLog,
}

impl MockPublicKeysApi {
    pub fn new() -> Self {
        Self {
            gets: Script::new(),
            creates: Script::new(),
            deletes: Script::new(),
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl PublicKeysApi for MockPublicKeysApi {
    async fn get_public_key(&self, id: &str) -> Result<PublicKey> {
        self.calls.record(format!("get {id}")).await;
        self.gets.next("get_public_key").await
    }

    async fn create_public_key(&self, req: &PublicKeyRequest) -> Result<PublicKey> {
        self.calls.record(format!("create {}", req.key_name)).await;
        self.creates.next("create_public_key").await
    }

    async fn delete_public_key(&self, id: &str) -> Result<()> {
        self.calls.record(format!("delete {id}")).await;
        self.deletes.next("delete_public_key").await
    }
}

// ===== ServiceContext factory =====

pub struct MockApis {
    pub connections: Arc<MockConnectionsApi>,
    pub networks: Arc<MockNetworksApi>,
    pub route_filters: Arc<MockRouteFiltersApi>,
    pub route_filter_rules: Arc<MockRouteFilterRulesApi>,
    pub service_tokens: Arc<MockServiceTokensApi>,
    pub ssh_keys: Arc<MockSshKeysApi>,
    pub public_keys: Arc<MockPublicKeysApi>,
}

impl MockApis {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(MockConnectionsApi::new()),
            networks: Arc::new(MockNetworksApi::new()),
            route_filters: Arc::new(MockRouteFiltersApi::new()),
            route_filter_rules: Arc::new(MockRouteFilterRulesApi::new()),
            service_tokens: Arc::new(MockServiceTokensApi::new()),
            ssh_keys: Arc::new(MockSshKeysApi::new()),
            public_keys: Arc::new(MockPublicKeysApi::new()),
        }
    }

    /// Context over these mocks with a uniform budget per operation.
    pub fn context(&self, timeout: Duration) -> Arc<ServiceContext> {
        let ops = OperationTimeouts::uniform(timeout);
        Arc::new(ServiceContext {
            connections: self.connections.clone(),
            networks: self.networks.clone(),
            route_filters: self.route_filters.clone(),
            route_filter_rules: self.route_filter_rules.clone(),
            service_tokens: self.service_tokens.clone(),
            ssh_keys: self.ssh_keys.clone(),
            public_keys: self.public_keys.clone(),
            timeouts: ResourceTimeouts {
                connection: ops,
                network: ops,
                route_filter: ops,
                route_filter_rule: ops,
                service_token: ops,
                ssh_key: ops,
            },
        })
    }
}

/// Ten minute budgets, 570s usable after the safety margin.
pub fn context(apis: &MockApis) -> Arc<ServiceContext> {
    apis.context(Duration::from_secs(600))
}
