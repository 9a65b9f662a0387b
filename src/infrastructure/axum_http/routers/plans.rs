use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{error, info};

use crate::{
    application::{
        interfaces::clock::Clock,
        usecases::{plan_cache::PlanCache, plan_limits::PlanLimitsUseCase},
    },
    domain::repositories::plans::PlanRepository,
    infrastructure::axum_http::error_responses::AppError,
};

/// Set on `/plans` responses served from an expired snapshot because the store failed.
pub const PLANS_STALE_HEADER: &str = "x-plans-stale";

pub struct PlansState<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    plan_cache: Arc<PlanCache<P>>,
    plan_limits_usecase: PlanLimitsUseCase<P>,
}

pub fn routes<P>(plan_cache: Arc<PlanCache<P>>, default_plan_id: &str) -> Router
where
    P: PlanRepository + Send + Sync + 'static,
{
    let plan_limits_usecase = PlanLimitsUseCase::new(Arc::clone(&plan_cache), default_plan_id);

    Router::new()
        .route("/", get(list_plans::<P>))
        .route("/:plan_id/limits", get(get_plan_limits::<P>))
        .with_state(Arc::new(PlansState {
            plan_cache,
            plan_limits_usecase,
        }))
}

pub async fn list_plans<P>(State(state): State<Arc<PlansState<P>>>) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
{
    let cached = match state.plan_cache.get_plans().await {
        Ok(cached) => cached,
        Err(err) => {
            error!(error = %err, "plans: list request failed");
            return AppError::from(err).into_response();
        }
    };
    let snapshot = cached.snapshot;
    let age_secs = snapshot
        .age(state.plan_cache.clock().monotonic())
        .as_secs();

    let mut headers = HeaderMap::new();
    headers.insert(header::AGE, HeaderValue::from(age_secs));
    if cached.served_stale {
        headers.insert(
            HeaderName::from_static(PLANS_STALE_HEADER),
            HeaderValue::from_static("true"),
        );
    }

    info!(
        plan_count = snapshot.plans.len(),
        snapshot_age_secs = age_secs,
        "plans: list served"
    );
    (StatusCode::OK, headers, Json(&snapshot.plans)).into_response()
}

pub async fn get_plan_limits<P>(
    State(state): State<Arc<PlansState<P>>>,
    Path(plan_id): Path<String>,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
{
    match state.plan_limits_usecase.get_plan_limits(&plan_id).await {
        Ok(limits) => (StatusCode::OK, Json(limits)).into_response(),
        Err(err) => {
            error!(%plan_id, error = %err, "plans: limits request failed");
            AppError::from(err).into_response()
        }
    }
}
