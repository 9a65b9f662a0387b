use std::sync::Arc;

use tracing::debug;

use crate::{
    application::usecases::plan_cache::{PlanCache, PlanCacheResult},
    domain::{
        entities::plans::PlanEntity, repositories::plans::PlanRepository,
        value_objects::plans::PlanLimits,
    },
};

/// Projects cached plans into the limits used for quota checks.
pub struct PlanLimitsUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    plan_cache: Arc<PlanCache<P>>,
    default_plan_id: String,
}

impl<P> PlanLimitsUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(plan_cache: Arc<PlanCache<P>>, default_plan_id: impl Into<String>) -> Self {
        Self {
            plan_cache,
            default_plan_id: default_plan_id.into(),
        }
    }

    pub fn default_plan_id(&self) -> &str {
        &self.default_plan_id
    }

    /// Limits for `plan_id`, falling back to the default plan and then to all-zero limits.
    /// Only fails when the plan cache has nothing to serve.
    pub async fn get_plan_limits(&self, plan_id: &str) -> PlanCacheResult<PlanLimits> {
        let snapshot = self.plan_cache.get_all_plans().await?;

        if let Some(plan) = snapshot.find(plan_id) {
            debug!(%plan_id, "plan_limits: resolved requested plan");
            return Ok(PlanLimits::from(plan));
        }

        if let Some(plan) = snapshot.find(&self.default_plan_id) {
            debug!(
                %plan_id,
                default_plan_id = %self.default_plan_id,
                "plan_limits: unknown plan, using default plan"
            );
            return Ok(PlanLimits::from(plan));
        }

        debug!(
            %plan_id,
            default_plan_id = %self.default_plan_id,
            "plan_limits: default plan missing, using zeroed limits"
        );
        Ok(PlanLimits::from(&PlanEntity::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{
            interfaces::clock::SystemClock,
            usecases::plan_cache::{PlanCacheConfig, PlanFetchError},
        },
        domain::{
            repositories::plans::MockPlanRepository,
            value_objects::plans::{DEFAULT_PLAN_ID, LIVE_DEVICE_STATS_FEATURE, PlanFeature},
        },
    };
    use anyhow::anyhow;

    fn free_plan() -> PlanEntity {
        PlanEntity {
            id: "free".to_string(),
            price_usd: 0.0,
            price_inr: 0.0,
            monthly_events: Some(1_000),
            max_projects: Some(1),
            ..Default::default()
        }
    }

    fn pro_plan() -> PlanEntity {
        PlanEntity {
            id: "pro".to_string(),
            price_usd: 20.0,
            price_inr: 1599.0,
            monthly_events: Some(100_000),
            features: vec![PlanFeature {
                text: LIVE_DEVICE_STATS_FEATURE.to_string(),
                included: true,
            }],
            ..Default::default()
        }
    }

    fn usecase_with(plans: Vec<PlanEntity>) -> PlanLimitsUseCase<MockPlanRepository> {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_list_plans_ordered_by_price()
            .returning(move || {
                let plans = plans.clone();
                Box::pin(async move { Ok(plans) })
            });

        let plan_cache = PlanCache::new(
            Arc::new(plan_repo),
            Arc::new(SystemClock),
            PlanCacheConfig::default(),
        );
        PlanLimitsUseCase::new(Arc::new(plan_cache), DEFAULT_PLAN_ID)
    }

    #[tokio::test]
    async fn resolves_requested_plan() {
        let usecase = usecase_with(vec![pro_plan(), free_plan()]);

        let limits = usecase.get_plan_limits("pro").await.unwrap();

        assert_eq!(limits.monthly_views, 100_000);
        assert!(limits.device_stats);
        assert_eq!(limits.amount, 20.0);
        assert_eq!(limits.price_usd, 20.0);
        assert_eq!(limits.price_inr, 1599.0);
    }

    #[tokio::test]
    async fn unknown_plan_falls_back_to_free_plan() {
        let usecase = usecase_with(vec![pro_plan(), free_plan()]);

        let limits = usecase.get_plan_limits("nonexistent-id").await.unwrap();

        assert_eq!(limits, PlanLimits::from(&free_plan()));
        assert_eq!(limits.monthly_views, 1_000);
        assert!(!limits.device_stats);
    }

    #[tokio::test]
    async fn missing_default_plan_yields_zeroed_limits() {
        let usecase = usecase_with(vec![pro_plan()]);

        let limits = usecase.get_plan_limits("enterprise").await.unwrap();

        assert_eq!(limits, PlanLimits::default());
        assert_eq!(limits.share_report, None);
    }

    #[tokio::test]
    async fn honours_configured_default_plan_id() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_list_plans_ordered_by_price()
            .returning(|| Box::pin(async { Ok(vec![free_plan(), pro_plan()]) }));
        let plan_cache = PlanCache::new(
            Arc::new(plan_repo),
            Arc::new(SystemClock),
            PlanCacheConfig::default(),
        );
        let usecase = PlanLimitsUseCase::new(Arc::new(plan_cache), "pro");

        let limits = usecase.get_plan_limits("legacy-starter").await.unwrap();

        assert_eq!(usecase.default_plan_id(), "pro");
        assert_eq!(limits.monthly_views, 100_000);
    }

    #[tokio::test]
    async fn propagates_plan_cache_failure() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_list_plans_ordered_by_price()
            .times(1)
            .returning(|| Box::pin(async { Err(anyhow!("store unavailable")) }));
        let plan_cache = PlanCache::new(
            Arc::new(plan_repo),
            Arc::new(SystemClock),
            PlanCacheConfig::default(),
        );
        let usecase = PlanLimitsUseCase::new(Arc::new(plan_cache), DEFAULT_PLAN_ID);

        let result = usecase.get_plan_limits("pro").await;

        assert!(matches!(result, Err(PlanFetchError::Store(_))));
    }
}
