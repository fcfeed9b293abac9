//! Database operations for `product_records`.
//!
//! Records are stored exactly as imported (JSONB) and normalized when the
//! catalog loads them. `seq` preserves import order.

use handicraft_core::{ProductSource, SourceError};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

/// Returns every stored record in import order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_product_records(pool: &PgPool) -> Result<Vec<Value>, DbError> {
    let records =
        sqlx::query_scalar::<_, Value>("SELECT record FROM product_records ORDER BY seq")
            .fetch_all(pool)
            .await?;
    Ok(records)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_product_records(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product_records")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Replaces the whole record set: deletes every row, then inserts `records`
/// in order. Runs in one transaction so readers never see a half import.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the previous record set
/// is left untouched.
pub async fn replace_product_records(pool: &PgPool, records: &[Value]) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM product_records")
        .execute(&mut *tx)
        .await?;

    let mut inserted: u64 = 0;
    for record in records {
        inserted += sqlx::query("INSERT INTO product_records (record) VALUES ($1)")
            .bind(record)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// [`ProductSource`] reading the `product_records` table.
#[derive(Debug, Clone)]
pub struct PgRecordSource {
    pool: PgPool,
}

impl PgRecordSource {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ProductSource for PgRecordSource {
    async fn fetch_records(&self) -> Result<Vec<Value>, SourceError> {
        list_product_records(&self.pool)
            .await
            .map_err(|e| SourceError::Backend(Box::new(e)))
    }

    fn describe(&self) -> String {
        "postgres table product_records".to_string()
    }
}
