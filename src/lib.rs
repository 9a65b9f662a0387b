pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod observability;

use std::sync::Arc;

use anyhow::Result;
use application::{
    interfaces::clock::SystemClock,
    usecases::plan_cache::{PlanCache, PlanCacheConfig},
};
use infrastructure::{
    axum_http::http_serve,
    postgres::{postgres_connection, repositories::plans::PlanPostgres},
};
use tracing::info;

pub async fn run() -> Result<()> {
    observability::init_observability("plan-limits")?;

    let dotenvy_env = config::config_loader::load()?;
    info!(stage = %dotenvy_env.stage, "ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection pool has been created");

    let plan_repository = PlanPostgres::new(Arc::new(postgres_pool));
    let plan_cache = Arc::new(PlanCache::new(
        Arc::new(plan_repository),
        Arc::new(SystemClock),
        PlanCacheConfig {
            ttl: dotenvy_env.plan_cache.ttl,
            fetch_timeout: dotenvy_env.plan_cache.fetch_timeout,
        },
    ));
    info!(
        ttl_secs = dotenvy_env.plan_cache.ttl.as_secs(),
        default_plan_id = %dotenvy_env.plan_cache.default_plan_id,
        "Plan cache has been configured"
    );

    let warm_cache = Arc::clone(&plan_cache);
    tokio::spawn(async move { warm_cache.warm_up().await });

    http_serve::start(Arc::new(dotenvy_env), plan_cache).await?;

    Ok(())
}
