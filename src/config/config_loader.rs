use std::time::Duration;

use anyhow::{Context, Result, bail};

use super::{
    config_model::{Database, DotEnvyConfig, PlanCache, Server},
    stage::Stage,
};
use crate::{
    application::usecases::plan_cache::{DEFAULT_PLAN_CACHE_TTL, DEFAULT_PLAN_FETCH_TIMEOUT},
    domain::value_objects::plans::DEFAULT_PLAN_ID,
};

/// Reads the process environment; `.env` is loaded once by the binary before this runs.
pub fn load() -> Result<DotEnvyConfig> {
    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup, so parsing can be exercised without touching the process env.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let server = Server {
        port: var("SERVER_PORT")
            .context("SERVER_PORT is missing")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: var("SERVER_BODY_LIMIT")
            .unwrap_or_else(|| "1".to_string())
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: var("SERVER_TIMEOUT")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: var("DATABASE_URL").context("DATABASE_URL is missing")?,
    };

    let ttl = match var("PLAN_CACHE_TTL_SECONDS") {
        Some(raw) => Duration::from_secs(
            raw.parse()
                .context("PLAN_CACHE_TTL_SECONDS is invalid")?,
        ),
        None => DEFAULT_PLAN_CACHE_TTL,
    };
    if ttl.is_zero() {
        bail!("PLAN_CACHE_TTL_SECONDS must be greater than zero");
    }

    let fetch_timeout = match var("PLAN_FETCH_TIMEOUT_MS") {
        Some(raw) => Duration::from_millis(
            raw.parse()
                .context("PLAN_FETCH_TIMEOUT_MS is invalid")?,
        ),
        None => DEFAULT_PLAN_FETCH_TIMEOUT,
    };
    if fetch_timeout.is_zero() {
        bail!("PLAN_FETCH_TIMEOUT_MS must be greater than zero");
    }

    let plan_cache = PlanCache {
        ttl,
        fetch_timeout,
        default_plan_id: var("DEFAULT_PLAN_ID").unwrap_or_else(|| DEFAULT_PLAN_ID.to_string()),
    };

    let stage = Stage::try_from(&var("STAGE").unwrap_or_default()).unwrap_or_default();

    Ok(DotEnvyConfig {
        server,
        database,
        plan_cache,
        stage,
    })
}
