use crate::{
    application::usecases::plan_cache::PlanCache,
    config::config_model::DotEnvyConfig,
    domain::repositories::plans::PlanRepository,
    infrastructure::axum_http::{default_routers, routers},
};
use anyhow::Result;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub fn app<P>(config: &DotEnvyConfig, plan_cache: Arc<PlanCache<P>>) -> Result<Router>
where
    P: PlanRepository + Send + Sync + 'static,
{
    let plans_router = routers::plans::routes(plan_cache, &config.plan_cache.default_plan_id);

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/v1/plans", plans_router.clone())
        // Unversioned alias for clients that call `/plans` directly.
        .nest("/plans", plans_router)
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET])
                .allow_headers([CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start<P>(config: Arc<DotEnvyConfig>, plan_cache: Arc<PlanCache<P>>) -> Result<()>
where
    P: PlanRepository + Send + Sync + 'static,
{
    let app = app(&config, plan_cache)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
