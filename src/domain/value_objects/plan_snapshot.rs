use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::domain::entities::plans::PlanEntity;

/// Immutable copy of every plan, ordered by ascending `price_usd`.
///
/// `captured_at` is the wall-clock capture time for display; expiry is measured
/// from `captured_instant` so wall-clock steps cannot extend or cut short the TTL.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSnapshot {
    pub plans: Vec<PlanEntity>,
    pub captured_at: DateTime<Utc>,
    pub captured_instant: Instant,
}

impl PlanSnapshot {
    /// Builds a snapshot, re-sorting by price so store ordering is never trusted blindly.
    pub fn new(
        mut plans: Vec<PlanEntity>,
        captured_at: DateTime<Utc>,
        captured_instant: Instant,
    ) -> Self {
        plans.sort_by(|a, b| a.price_usd.total_cmp(&b.price_usd));
        Self {
            plans,
            captured_at,
            captured_instant,
        }
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.captured_instant)
    }

    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }

    pub fn find(&self, plan_id: &str) -> Option<&PlanEntity> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}
