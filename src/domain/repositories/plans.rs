use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::plans::PlanEntity;

#[async_trait]
#[automock]
pub trait PlanRepository {
    /// Every plan record, ordered ascending by `price_usd`.
    async fn list_plans_ordered_by_price(&self) -> Result<Vec<PlanEntity>>;
}
