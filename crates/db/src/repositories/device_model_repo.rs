//! Repository for the `device_models` table.

use sqlx::types::Json;
use sqlx::PgPool;
use tradein_core::catalog::{ModelConfig, NewDeviceModel};
use tradein_core::device::DeviceKind;
use tradein_core::types::DbId;

use crate::models::device_model::DeviceModel;

/// Column list for `device_models` queries.
const COLUMNS: &str = "id, brand_id, name, device_type, config, created_at, updated_at";

pub struct DeviceModelRepo;

impl DeviceModelRepo {
    pub async fn list_by_brand(pool: &PgPool, brand_id: DbId) -> Result<Vec<DeviceModel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_models WHERE brand_id = $1 ORDER BY name");
        sqlx::query_as::<_, DeviceModel>(&query)
            .bind(brand_id)
            .fetch_all(pool)
            .await
    }

    /// Every model, used by the price table sync job.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DeviceModel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_models ORDER BY id");
        sqlx::query_as::<_, DeviceModel>(&query).fetch_all(pool).await
    }

    /// Lookup by brand, case-insensitive name and device type.
    pub async fn find(
        pool: &PgPool,
        brand_id: DbId,
        name: &str,
        kind: DeviceKind,
    ) -> Result<Option<DeviceModel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM device_models \
             WHERE brand_id = $1 AND lower(name) = lower($2) AND device_type = $3"
        );
        sqlx::query_as::<_, DeviceModel>(&query)
            .bind(brand_id)
            .bind(name.trim())
            .bind(kind.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &NewDeviceModel) -> Result<DeviceModel, sqlx::Error> {
        let query = format!(
            "INSERT INTO device_models (brand_id, name, device_type, config) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceModel>(&query)
            .bind(input.brand_id)
            .bind(input.name.trim())
            .bind(input.device_type.as_str())
            .bind(Json(&input.config))
            .fetch_one(pool)
            .await
    }

    /// Append one entry to the model's config array.
    ///
    /// Returns `false` if no model with the given ID exists.
    pub async fn append_config(
        pool: &PgPool,
        id: DbId,
        config: &ModelConfig,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE device_models SET config = config || $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(Json(std::slice::from_ref(config)))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
