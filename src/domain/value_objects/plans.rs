use serde::{Deserialize, Serialize};

use crate::domain::entities::plans::PlanEntity;

/// Plan served when the requested plan id has no matching record.
pub const DEFAULT_PLAN_ID: &str = "free";

/// Feature list entry whose `included` flag drives `PlanLimits::device_stats`.
pub const LIVE_DEVICE_STATS_FEATURE: &str = "Live Device Stats";

/// One line of the human-readable feature list shown on the pricing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanFeature {
    pub text: String,
    #[serde(default)]
    pub included: bool,
}

/// Report sharing is stored either as an on/off switch or as a number of shareable reports.
/// Numbers are kept as stored (`5`, `5.0`, `2.5`) and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ShareReport {
    Enabled(bool),
    Count(serde_json::Number),
}

/// Normalized quota view of a plan, consumed by usage enforcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlanLimits {
    #[serde(rename = "monthlyViews")]
    pub monthly_views: i64,
    #[serde(rename = "storageLimit")]
    pub storage_limit: i64,
    #[serde(rename = "projectLimit")]
    pub project_limit: i64,
    #[serde(rename = "liveLogs")]
    pub live_logs: bool,
    #[serde(rename = "refreshRate")]
    pub refresh_rate: i64,
    #[serde(rename = "emailIntegrity")]
    pub email_integrity: bool,
    #[serde(rename = "allowedOriginsLimit")]
    pub allowed_origins_limit: i64,
    pub share_report: Option<ShareReport>,
    #[serde(rename = "retentionDays")]
    pub retention_days: i64,
    pub price_inr: f64,
    pub price_usd: f64,
    pub amount: f64,
    #[serde(rename = "deviceStats")]
    pub device_stats: bool,
}

impl From<&PlanEntity> for PlanLimits {
    fn from(plan: &PlanEntity) -> Self {
        Self {
            monthly_views: plan.monthly_events.unwrap_or(0),
            storage_limit: plan.storage_limit.unwrap_or(0),
            project_limit: plan.max_projects.unwrap_or(0),
            live_logs: plan.live_logs.unwrap_or(false),
            refresh_rate: plan.refresh_rate.unwrap_or(0),
            email_integrity: plan.email_integrity.unwrap_or(false),
            allowed_origins_limit: plan.allowed_origins.unwrap_or(0),
            share_report: plan.share_report.clone(),
            retention_days: plan.retention_days.unwrap_or(0),
            price_inr: plan.price_inr,
            price_usd: plan.price_usd,
            // No currency negotiation: the charged amount is always the USD price.
            amount: plan.price_usd,
            device_stats: plan.has_feature(LIVE_DEVICE_STATS_FEATURE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_features(features: Vec<PlanFeature>) -> PlanEntity {
        PlanEntity {
            id: "pro".to_string(),
            price_usd: 20.0,
            price_inr: 1599.0,
            monthly_events: Some(100_000),
            max_projects: Some(10),
            storage_limit: Some(5_000),
            allowed_origins: Some(3),
            retention_days: Some(90),
            refresh_rate: Some(30),
            live_logs: Some(true),
            email_integrity: None,
            share_report: Some(ShareReport::Count(5.into())),
            features,
        }
    }

    #[test]
    fn maps_record_fields_to_limits() {
        let limits = PlanLimits::from(&plan_with_features(vec![]));

        assert_eq!(limits.monthly_views, 100_000);
        assert_eq!(limits.project_limit, 10);
        assert_eq!(limits.storage_limit, 5_000);
        assert_eq!(limits.allowed_origins_limit, 3);
        assert_eq!(limits.retention_days, 90);
        assert_eq!(limits.refresh_rate, 30);
        assert!(limits.live_logs);
        assert!(!limits.email_integrity);
        assert_eq!(limits.share_report, Some(ShareReport::Count(5.into())));
        assert_eq!(limits.price_inr, 1599.0);
        assert_eq!(limits.price_usd, 20.0);
        assert_eq!(limits.amount, 20.0);
    }

    #[test]
    fn device_stats_follows_included_flag() {
        let included = plan_with_features(vec![PlanFeature {
            text: LIVE_DEVICE_STATS_FEATURE.to_string(),
            included: true,
        }]);
        let excluded = plan_with_features(vec![PlanFeature {
            text: LIVE_DEVICE_STATS_FEATURE.to_string(),
            included: false,
        }]);
        let unrelated = plan_with_features(vec![PlanFeature {
            text: "Custom Domains".to_string(),
            included: true,
        }]);

        assert!(PlanLimits::from(&included).device_stats);
        assert!(!PlanLimits::from(&excluded).device_stats);
        assert!(!PlanLimits::from(&unrelated).device_stats);
        assert!(!PlanLimits::from(&plan_with_features(vec![])).device_stats);
    }

    #[test]
    fn serializes_with_limits_field_names() {
        let limits = PlanLimits::from(&plan_with_features(vec![]));
        let json = serde_json::to_value(&limits).unwrap();

        assert_eq!(json["monthlyViews"], 100_000);
        assert_eq!(json["projectLimit"], 10);
        assert_eq!(json["allowedOriginsLimit"], 3);
        assert_eq!(json["share_report"], 5);
        assert_eq!(json["price_usd"], 20.0);
        assert_eq!(json["amount"], 20.0);
        assert_eq!(json["deviceStats"], false);
    }

    #[test]
    fn share_report_accepts_bool_or_number() {
        let flag: ShareReport = serde_json::from_str("true").unwrap();
        let count: ShareReport = serde_json::from_str("3").unwrap();

        assert_eq!(flag, ShareReport::Enabled(true));
        assert_eq!(count, ShareReport::Count(3.into()));
    }

    #[test]
    fn share_report_numbers_pass_through_unchanged() {
        for raw in [serde_json::json!(5.0), serde_json::json!(2.5), serde_json::json!(-1)] {
            let share_report: ShareReport = serde_json::from_value(raw.clone()).unwrap();
            let mut plan = plan_with_features(vec![]);
            plan.share_report = Some(share_report);

            let json = serde_json::to_value(PlanLimits::from(&plan)).unwrap();

            assert_eq!(json["share_report"], raw);
        }
    }
}
