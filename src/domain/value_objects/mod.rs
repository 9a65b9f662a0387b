pub mod plan_snapshot;
pub mod plans;
