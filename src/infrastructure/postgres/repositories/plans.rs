use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::plans::{PlanEntity, PlanRow},
        repositories::plans::PlanRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::plans},
};

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn list_plans_ordered_by_price(&self) -> Result<Vec<PlanEntity>> {
        // Diesel is synchronous; keep the query off the async worker threads.
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<PlanEntity>> {
            let mut conn = db_pool.get()?;

            let rows = plans::table
                .select(PlanRow::as_select())
                .order(plans::price_usd.asc())
                .load::<PlanRow>(&mut conn)?;

            Ok(rows.into_iter().map(PlanEntity::from).collect())
        })
        .await?
    }
}
