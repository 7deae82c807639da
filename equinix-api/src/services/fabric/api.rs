//! Fabric resource API trait implementations

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{
    ConnectionsApi, ErrorContext, NetworksApi, RouteFilterRulesApi, RouteFiltersApi,
    ServiceTokensApi,
};
use crate::types::{
    ChangeOperation, Connection, ConnectionRequest, Network, NetworkRequest, RouteFilter,
    RouteFilterRequest, RouteFilterRule, RouteFilterRuleRequest, ServiceToken,
    ServiceTokenRequest,
};

use super::FabricClient;

fn rule_path(filter_id: &str, rule_id: &str) -> String {
    format!("/routeFilters/{filter_id}/routeFilterRules/{rule_id}")
}

#[async_trait]
impl ConnectionsApi for FabricClient {
    async fn get_connection(&self, id: &str) -> Result<Connection> {
        self.get(&format!("/connections/{id}"), ErrorContext::for_resource(id))
            .await
    }

    async fn create_connection(&self, req: &ConnectionRequest) -> Result<Connection> {
        self.post("/connections", req).await
    }

    async fn update_connection(&self, id: &str, ops: &[ChangeOperation]) -> Result<Connection> {
        self.patch(
            &format!("/connections/{id}"),
            ops,
            ErrorContext::for_resource(id),
        )
        .await
    }

    async fn delete_connection(&self, id: &str) -> Result<()> {
        self.delete(&format!("/connections/{id}"), ErrorContext::for_resource(id))
            .await
    }
}

#[async_trait]
impl NetworksApi for FabricClient {
    async fn get_network(&self, id: &str) -> Result<Network> {
        self.get(&format!("/networks/{id}"), ErrorContext::for_resource(id))
            .await
    }

    async fn create_network(&self, req: &NetworkRequest) -> Result<Network> {
        self.post("/networks", req).await
    }

    async fn update_network(&self, id: &str, ops: &[ChangeOperation]) -> Result<Network> {
        self.patch(&format!("/networks/{id}"), ops, ErrorContext::for_resource(id))
            .await
    }

    async fn delete_network(&self, id: &str) -> Result<()> {
        self.delete(&format!("/networks/{id}"), ErrorContext::for_resource(id))
            .await
    }
}

#[async_trait]
impl RouteFiltersApi for FabricClient {
    async fn get_route_filter(&self, id: &str) -> Result<RouteFilter> {
        self.get(&format!("/routeFilters/{id}"), ErrorContext::for_resource(id))
            .await
    }

    async fn create_route_filter(&self, req: &RouteFilterRequest) -> Result<RouteFilter> {
        self.post("/routeFilters", req).await
    }

    async fn replace_route_filter(&self, id: &str, req: &RouteFilterRequest) -> Result<RouteFilter> {
        self.put(
            &format!("/routeFilters/{id}"),
            req,
            ErrorContext::for_resource(id),
        )
        .await
    }

    async fn delete_route_filter(&self, id: &str) -> Result<()> {
        self.delete(&format!("/routeFilters/{id}"), ErrorContext::for_resource(id))
            .await
    }
}

#[async_trait]
impl RouteFilterRulesApi for FabricClient {
    async fn get_route_filter_rule(
        &self,
        filter_id: &str,
        rule_id: &str,
    ) -> Result<RouteFilterRule> {
        self.get(
            &rule_path(filter_id, rule_id),
            ErrorContext::for_resource(rule_id),
        )
        .await
    }

    async fn create_route_filter_rule(
        &self,
        filter_id: &str,
        req: &RouteFilterRuleRequest,
    ) -> Result<RouteFilterRule> {
        self.post(&format!("/routeFilters/{filter_id}/routeFilterRules"), req)
            .await
    }

    async fn replace_route_filter_rule(
        &self,
        filter_id: &str,
        rule_id: &str,
        req: &RouteFilterRuleRequest,
    ) -> Result<RouteFilterRule> {
        self.put(
            &rule_path(filter_id, rule_id),
            req,
            ErrorContext::for_resource(rule_id),
        )
        .await
    }

    async fn delete_route_filter_rule(&self, filter_id: &str, rule_id: &str) -> Result<()> {
        self.delete(
            &rule_path(filter_id, rule_id),
            ErrorContext::for_resource(rule_id),
        )
        .await
    }
}

#[async_trait]
impl ServiceTokensApi for FabricClient {
    async fn get_service_token(&self, id: &str) -> Result<ServiceToken> {
        self.get(&format!("/serviceTokens/{id}"), ErrorContext::for_resource(id))
            .await
    }

    async fn create_service_token(&self, req: &ServiceTokenRequest) -> Result<ServiceToken> {
        self.post("/serviceTokens", req).await
    }

    async fn update_service_token(
        &self,
        id: &str,
        ops: &[ChangeOperation],
    ) -> Result<ServiceToken> {
        self.patch(
            &format!("/serviceTokens/{id}"),
            ops,
            ErrorContext::for_resource(id),
        )
        .await
    }

    async fn delete_service_token(&self, id: &str) -> Result<()> {
        self.delete(
            &format!("/serviceTokens/{id}"),
            ErrorContext::for_resource(id),
        )
        .await
    }
}
