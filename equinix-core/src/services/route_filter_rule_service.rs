//! Route filter rules, addressed by `(route_filter_id, rule_id)`

use std::sync::Arc;

use equinix_api::{RouteFilterRule, RouteFilterRuleRequest};
use tokio_util::sync::CancellationToken;

use crate::adapters::route_filter_rule::{self, RouteFilterRuleFetcher};
use crate::convergence::TimeoutBudget;
use crate::error::CoreResult;
use crate::services::{ServiceContext, found, log_error};

const KIND: &str = "route filter rule";
const ALREADY_DELETED: &str = "EQ-3142509";

pub struct RouteFilterRuleService {
    ctx: Arc<ServiceContext>,
}

impl RouteFilterRuleService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    fn fetcher(&self, route_filter_id: &str) -> RouteFilterRuleFetcher {
        RouteFilterRuleFetcher::new(self.ctx.route_filter_rules.clone(), route_filter_id)
    }

    async fn wait_stable(
        &self,
        route_filter_id: &str,
        rule_id: &str,
        action: &str,
        budget: &TimeoutBudget,
        cancel: &CancellationToken,
    ) -> CoreResult<RouteFilterRule> {
        self.ctx
            .wait_for(
                cancel,
                KIND,
                rule_id,
                action,
                &self.fetcher(route_filter_id),
                &route_filter_rule::stable(budget.remaining()),
            )
            .await
    }

    pub async fn create(
        &self,
        route_filter_id: &str,
        req: &RouteFilterRuleRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<RouteFilterRule> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.route_filter_rule.create);
        let created = self
            .ctx
            .route_filter_rules
            .create_route_filter_rule(route_filter_id, req)
            .await
            .map_err(|e| log_error(e.into()))?;
        log::info!(
            "Created rule {} in route filter {route_filter_id}",
            created.uuid
        );
        self.wait_stable(route_filter_id, &created.uuid, "created", &budget, cancel)
            .await
    }

    pub async fn read(
        &self,
        route_filter_id: &str,
        rule_id: &str,
    ) -> CoreResult<Option<RouteFilterRule>> {
        found(
            self.ctx
                .route_filter_rules
                .get_route_filter_rule(route_filter_id, rule_id)
                .await,
        )
    }

    pub async fn update(
        &self,
        route_filter_id: &str,
        rule_id: &str,
        req: &RouteFilterRuleRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<RouteFilterRule> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.route_filter_rule.update);
        self.ctx
            .route_filter_rules
            .replace_route_filter_rule(route_filter_id, rule_id, req)
            .await
            .map_err(|e| log_error(e.into()))?;
        self.wait_stable(route_filter_id, rule_id, "updated", &budget, cancel)
            .await
    }

    pub async fn delete(
        &self,
        route_filter_id: &str,
        rule_id: &str,
        cancel: &CancellationToken,
    ) -> CoreResult<()> {
        let budget = TimeoutBudget::start(self.ctx.timeouts.route_filter_rule.delete);
        match self
            .ctx
            .route_filter_rules
            .delete_route_filter_rule(route_filter_id, rule_id)
            .await
        {
            Ok(()) => {}
            Err(e) if e.has_error_code(ALREADY_DELETED) => {
                log::info!("Rule {rule_id} of route filter {route_filter_id} already deleted");
                return Ok(());
            }
            Err(e) => return Err(log_error(e.into())),
        }

        self.ctx
            .wait_for_deletion(
                cancel,
                KIND,
                rule_id,
                self.fetcher(route_filter_id),
                route_filter_rule::DEPROVISIONED,
                &route_filter_rule::deprovisioning(budget.remaining()),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::{MockApis, already_deleted, context, not_found, route_filter_rule as rule};

    fn request() -> RouteFilterRuleRequest {
        RouteFilterRuleRequest {
            prefix: "192.168.0.0/24".to_string(),
            prefix_match: Some("exact".to_string()),
            ..RouteFilterRuleRequest::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn create_polls_rule_under_its_filter() {
        let apis = MockApis::new();
        apis.route_filter_rules.creates.push(Ok(rule("r-1", "PROVISIONING"))).await;
        apis.route_filter_rules
            .gets
            .push_all([Ok(rule("r-1", "PROVISIONING")), Ok(rule("r-1", "PROVISIONED"))])
            .await;
        let service = RouteFilterRuleService::new(context(&apis));

        service
            .create("rf-1", &request(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            apis.route_filter_rules.calls.all().await,
            vec!["create rf-1 192.168.0.0/24", "get rf-1/r-1", "get rf-1/r-1"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn update_waits_for_stable_state() {
        let apis = MockApis::new();
        apis.route_filter_rules.replaces.push(Ok(rule("r-1", "REPROVISIONING"))).await;
        apis.route_filter_rules.gets.push(Ok(rule("r-1", "PROVISIONED"))).await;
        let service = RouteFilterRuleService::new(context(&apis));

        let updated = service
            .update("rf-1", "r-1", &request(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(updated.state.as_deref(), Some("PROVISIONED"));
    }

    #[tokio::test]
    async fn read_missing_rule_is_none() {
        let apis = MockApis::new();
        apis.route_filter_rules.gets.push(Err(not_found("r-1"))).await;
        let service = RouteFilterRuleService::new(context(&apis));

        assert!(service.read("rf-1", "r-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_of_deleted_rule_is_ok() {
        let apis = MockApis::new();
        apis.route_filter_rules
            .deletes
            .push(Err(already_deleted("r-1", "EQ-3142509")))
            .await;
        let service = RouteFilterRuleService::new(context(&apis));

        service.delete("rf-1", "r-1", &CancellationToken::new()).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn delete_treats_vanished_rule_as_deleted() {
        let apis = MockApis::new();
        apis.route_filter_rules.deletes.push(Ok(())).await;
        apis.route_filter_rules
            .gets
            .push_all([Ok(rule("r-1", "DEPROVISIONING")), Err(not_found("r-1"))])
            .await;
        let service = RouteFilterRuleService::new(context(&apis));

        service.delete("rf-1", "r-1", &CancellationToken::new()).await.unwrap();
        assert_eq!(apis.route_filter_rules.calls.count("get rf-1/r-1").await, 2);
    }

    #[tokio::test]
    async fn delete_with_other_error_code_fails() {
        let apis = MockApis::new();
        apis.route_filter_rules
            .deletes
            .push(Err(already_deleted("r-1", "EQ-3034019")))
            .await;
        let service = RouteFilterRuleService::new(context(&apis));

        assert!(matches!(
            service.delete("rf-1", "r-1", &CancellationToken::new()).await,
            Err(CoreError::Api(_))
        ));
    }
}
