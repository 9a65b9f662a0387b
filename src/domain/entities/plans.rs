use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    domain::value_objects::plans::{PlanFeature, ShareReport},
    infrastructure::postgres::schema::plans,
};

/// A subscription tier as stored in the plan store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlanEntity {
    pub id: String,
    pub price_usd: f64,
    pub price_inr: f64,
    #[serde(default)]
    pub monthly_events: Option<i64>,
    #[serde(default)]
    pub max_projects: Option<i64>,
    #[serde(default)]
    pub storage_limit: Option<i64>,
    #[serde(default)]
    pub allowed_origins: Option<i64>,
    #[serde(default)]
    pub retention_days: Option<i64>,
    #[serde(default)]
    pub refresh_rate: Option<i64>,
    #[serde(default)]
    pub live_logs: Option<bool>,
    #[serde(default)]
    pub email_integrity: Option<bool>,
    #[serde(default)]
    pub share_report: Option<ShareReport>,
    #[serde(default)]
    pub features: Vec<PlanFeature>,
}

impl PlanEntity {
    /// True when the feature list carries `text` marked as included.
    pub fn has_feature(&self, text: &str) -> bool {
        self.features
            .iter()
            .any(|feature| feature.text == text && feature.included)
    }
}

/// Raw row used for Diesel queries. JSON columns are parsed into typed fields on conversion.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: String,
    pub price_usd: f64,
    pub price_inr: f64,
    pub monthly_events: Option<i64>,
    pub max_projects: Option<i64>,
    pub storage_limit: Option<i64>,
    pub allowed_origins: Option<i64>,
    pub retention_days: Option<i64>,
    pub refresh_rate: Option<i64>,
    pub live_logs: Option<bool>,
    pub email_integrity: Option<bool>,
    pub share_report: Option<serde_json::Value>,
    pub features: Option<serde_json::Value>,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let features = match value.features {
            Some(raw) => serde_json::from_value(raw).unwrap_or_else(|err| {
                warn!(plan_id = %value.id, error = %err, "plans: malformed features column");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let share_report = value.share_report.and_then(|raw| {
            if raw.is_null() {
                return None;
            }
            serde_json::from_value(raw)
                .map_err(|err| {
                    warn!(plan_id = %value.id, error = %err, "plans: malformed share_report column");
                })
                .ok()
        });

        Self {
            id: value.id,
            price_usd: value.price_usd,
            price_inr: value.price_inr,
            monthly_events: value.monthly_events,
            max_projects: value.max_projects,
            storage_limit: value.storage_limit,
            allowed_origins: value.allowed_origins,
            retention_days: value.retention_days,
            refresh_rate: value.refresh_rate,
            live_logs: value.live_logs,
            email_integrity: value.email_integrity,
            share_report,
            features,
        }
    }
}
