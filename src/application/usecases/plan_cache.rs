use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use arc_swap::ArcSwapOption;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    application::interfaces::clock::Clock,
    domain::{
        entities::plans::PlanEntity, repositories::plans::PlanRepository,
        value_objects::plan_snapshot::PlanSnapshot,
    },
};

pub const DEFAULT_PLAN_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_PLAN_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct PlanCacheConfig {
    pub ttl: Duration,
    pub fetch_timeout: Duration,
}

impl Default for PlanCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_PLAN_CACHE_TTL,
            fetch_timeout: DEFAULT_PLAN_FETCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanFetchError {
    #[error("plan store query failed: {0}")]
    Store(#[source] anyhow::Error),
    #[error("plan store did not respond within {0:?}")]
    Timeout(Duration),
    #[error("concurrent plan refresh failed and no snapshot is cached")]
    RefreshFailed,
}

impl PlanFetchError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        // Callers cannot act on the cause, so every fetch failure is an internal error.
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub type PlanCacheResult<T> = std::result::Result<T, PlanFetchError>;

/// A snapshot together with how it was obtained.
#[derive(Debug, Clone)]
pub struct CachedPlans {
    pub snapshot: Arc<PlanSnapshot>,
    /// Set when the snapshot is past the TTL and served because the store failed.
    pub served_stale: bool,
}

impl CachedPlans {
    fn fresh(snapshot: Arc<PlanSnapshot>) -> Self {
        Self {
            snapshot,
            served_stale: false,
        }
    }

    fn stale(snapshot: Arc<PlanSnapshot>) -> Self {
        Self {
            snapshot,
            served_stale: true,
        }
    }
}

/// Process-wide cache of the full plan list.
///
/// A snapshot younger than the TTL is served without touching the store. Once it
/// expires the next caller refreshes it; callers that arrive while that refresh is
/// running wait for it and take its outcome instead of issuing their own query,
/// whether it succeeded or failed. When the store is unreachable the last snapshot
/// is served no matter how old it is, and the failure only reaches the caller if
/// nothing was ever fetched.
pub struct PlanCache<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    fetch_timeout: Duration,
    snapshot: ArcSwapOption<PlanSnapshot>,
    refresh_lock: Mutex<()>,
    // Bumped under `refresh_lock` after every store attempt.
    refresh_generation: AtomicU64,
}

impl<P> PlanCache<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, clock: Arc<dyn Clock>, config: PlanCacheConfig) -> Self {
        Self {
            plan_repo,
            clock,
            ttl: config.ttl,
            fetch_timeout: config.fetch_timeout,
            snapshot: ArcSwapOption::from(None),
            refresh_lock: Mutex::new(()),
            refresh_generation: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The cached snapshot, if any, without checking freshness or doing I/O.
    pub fn current(&self) -> Option<Arc<PlanSnapshot>> {
        self.snapshot.load_full()
    }

    pub async fn get_all_plans(&self) -> PlanCacheResult<Arc<PlanSnapshot>> {
        self.get_plans().await.map(|cached| cached.snapshot)
    }

    /// Like [`Self::get_all_plans`], but also reports whether the snapshot was served
    /// as a stale fallback.
    pub async fn get_plans(&self) -> PlanCacheResult<CachedPlans> {
        let observed_generation = self.refresh_generation.load(Ordering::Acquire);

        if let Some(snapshot) = self.fresh_snapshot() {
            debug!(plan_count = snapshot.plans.len(), "plan_cache: hit");
            return Ok(CachedPlans::fresh(snapshot));
        }

        let _refresh_guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock.
        if let Some(snapshot) = self.fresh_snapshot() {
            debug!(
                plan_count = snapshot.plans.len(),
                "plan_cache: refreshed by concurrent caller"
            );
            return Ok(CachedPlans::fresh(snapshot));
        }

        // A store attempt finished after we arrived and left nothing fresh: reuse its outcome.
        if self.refresh_generation.load(Ordering::Acquire) != observed_generation {
            return match self.snapshot.load_full() {
                Some(stale) => {
                    debug!(
                        plan_count = stale.plans.len(),
                        "plan_cache: concurrent refresh failed, serving last known snapshot"
                    );
                    Ok(CachedPlans::stale(stale))
                }
                None => Err(PlanFetchError::RefreshFailed),
            };
        }

        let fetched = self.fetch_plans().await;
        self.refresh_generation.fetch_add(1, Ordering::Release);

        match fetched {
            Ok(plans) => {
                let snapshot = Arc::new(PlanSnapshot::new(
                    plans,
                    self.clock.now(),
                    self.clock.monotonic(),
                ));
                self.snapshot.store(Some(Arc::clone(&snapshot)));
                info!(
                    plan_count = snapshot.plans.len(),
                    "plan_cache: snapshot refreshed"
                );
                Ok(CachedPlans::fresh(snapshot))
            }
            Err(err) => match self.snapshot.load_full() {
                Some(stale) => {
                    warn!(
                        error = %err,
                        snapshot_age_secs = stale.age(self.clock.monotonic()).as_secs(),
                        "plan_cache: store fetch failed, serving last known snapshot"
                    );
                    Ok(CachedPlans::stale(stale))
                }
                None => {
                    error!(
                        error = ?err,
                        "plan_cache: store fetch failed and no snapshot is cached"
                    );
                    Err(err)
                }
            },
        }
    }

    /// Primes the cache so the first request does not pay for the store round trip.
    pub async fn warm_up(&self) {
        match self.get_all_plans().await {
            Ok(snapshot) => info!(
                plan_count = snapshot.plans.len(),
                "plan_cache: warmed up"
            ),
            Err(err) => warn!(
                error = %err,
                "plan_cache: warm up failed, plans will be fetched on first request"
            ),
        }
    }

    fn fresh_snapshot(&self) -> Option<Arc<PlanSnapshot>> {
        let snapshot = self.snapshot.load_full()?;
        snapshot
            .is_fresh(self.clock.monotonic(), self.ttl)
            .then_some(snapshot)
    }

    async fn fetch_plans(&self) -> PlanCacheResult<Vec<PlanEntity>> {
        match tokio::time::timeout(
            self.fetch_timeout,
            self.plan_repo.list_plans_ordered_by_price(),
        )
        .await
        {
            Ok(Ok(plans)) => Ok(plans),
            Ok(Err(err)) => Err(PlanFetchError::Store(err)),
            Err(_) => Err(PlanFetchError::Timeout(self.fetch_timeout)),
        }
    }
}
