//! Repository for the `price_tables` table.

use sqlx::types::Json;
use sqlx::PgPool;
use tradein_core::price_table::PriceTableUpsert;
use tradein_core::types::DbId;

use crate::models::price_table::PriceTable;

/// Column list for `price_tables` queries.
const COLUMNS: &str = "id, model_id, storage, ram, grades, created_at, updated_at";

/// Conflict target matching `uq_price_tables_config`.
const CONFIG_KEY: &str = "(model_id, storage, (COALESCE(ram, '')))";

pub struct PriceTableRepo;

impl PriceTableRepo {
    pub async fn list_by_model(pool: &PgPool, model_id: DbId) -> Result<Vec<PriceTable>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM price_tables WHERE model_id = $1 \
             ORDER BY storage, ram NULLS FIRST"
        );
        sqlx::query_as::<_, PriceTable>(&query)
            .bind(model_id)
            .fetch_all(pool)
            .await
    }

    /// Records for `model_id`/`storage` with RAM equal to `ram` or absent.
    /// With `ram = None` the equality never holds, so only RAM-less records
    /// are returned.
    pub async fn candidates(
        pool: &PgPool,
        model_id: DbId,
        storage: &str,
        ram: Option<&str>,
    ) -> Result<Vec<PriceTable>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM price_tables \
             WHERE model_id = $1 AND storage = $2 AND (ram = $3 OR ram IS NULL) \
             ORDER BY (ram IS NULL), id"
        );
        sqlx::query_as::<_, PriceTable>(&query)
            .bind(model_id)
            .bind(storage)
            .bind(ram)
            .fetch_all(pool)
            .await
    }

    /// Merge grades into each configuration's record within one transaction.
    ///
    /// Keys present in the entry overwrite stored keys; other stored keys are
    /// kept. Returns, per entry, `true` when the record was created.
    pub async fn upsert_batch(
        pool: &PgPool,
        entries: &[PriceTableUpsert],
    ) -> Result<Vec<bool>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(entries.len());

        let query = format!(
            "INSERT INTO price_tables (model_id, storage, ram, grades) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT {CONFIG_KEY} \
             DO UPDATE SET grades = price_tables.grades || EXCLUDED.grades, updated_at = now() \
             RETURNING (xmax = 0)"
        );

        for entry in entries {
            let inserted = sqlx::query_scalar::<_, bool>(&query)
                .bind(entry.model_id)
                .bind(&entry.storage)
                .bind(entry.ram.as_deref())
                .bind(Json(&entry.grades))
                .fetch_one(&mut *tx)
                .await?;
            results.push(inserted);
        }

        tx.commit().await?;
        Ok(results)
    }

    /// Create empty records for configurations that have none.
    ///
    /// Returns the number of records created.
    pub async fn insert_missing(
        pool: &PgPool,
        entries: &[PriceTableUpsert],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = 0;

        let query = format!(
            "INSERT INTO price_tables (model_id, storage, ram, grades) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT {CONFIG_KEY} DO NOTHING"
        );

        for entry in entries {
            let result = sqlx::query(&query)
                .bind(entry.model_id)
                .bind(&entry.storage)
                .bind(entry.ram.as_deref())
                .bind(Json(&entry.grades))
                .execute(&mut *tx)
                .await?;
            created += result.rows_affected();
        }

        tx.commit().await?;
        Ok(created)
    }
}
