//! Repository for the `brands` table.

use sqlx::PgPool;
use tradein_core::catalog::NewBrand;
use tradein_core::types::DbId;

use crate::models::brand::Brand;

/// Column list for `brands` queries.
const COLUMNS: &str = "id, name, display_order, logo_url, device_type, created_at, updated_at";

pub struct BrandRepo;

impl BrandRepo {
    /// All brands, by display order then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands ORDER BY display_order, name");
        sqlx::query_as::<_, Brand>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE id = $1");
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive lookup by name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE lower(name) = lower($1)");
        sqlx::query_as::<_, Brand>(&query)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    /// One past the highest display order, 1 for an empty table.
    pub async fn next_display_order(pool: &PgPool) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT COALESCE(MAX(display_order), 0) + 1 FROM brands")
            .fetch_one(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &NewBrand) -> Result<Brand, sqlx::Error> {
        let query = format!(
            "INSERT INTO brands (name, display_order, logo_url, device_type) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(input.name.trim())
            .bind(input.display_order)
            .bind(&input.logo_url)
            .bind(input.device_type.as_str())
            .fetch_one(pool)
            .await
    }
}
