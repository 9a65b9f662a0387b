pub mod plan_cache;
pub mod plan_limits;
