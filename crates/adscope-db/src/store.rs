//! [`AdStore`] implementation backed by the Postgres `ads` table.

use std::future::Future;

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;
use adscope_core::{AdStore, NormalizedAd};

/// The persistence collaborator handed to the scraper orchestrator.
#[derive(Clone)]
pub struct PgAdStore {
    pool: PgPool,
}

impl PgAdStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AdStore for PgAdStore {
    type Error = DbError;

    fn upsert_ad(
        &self,
        ad: &NormalizedAd,
    ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send {
        async move {
            let row = crate::ads::upsert_ad(&self.pool, ad).await?;
            Ok(row.id)
        }
    }
}
