//! `tradein-core` store traits on top of the repositories.

use sqlx::PgPool;
use tradein_core::catalog::{CatalogBrand, CatalogModel, ModelConfig, NewBrand, NewDeviceModel};
use tradein_core::condition::{ConditionGradeRecord, ConditionQuery, ConditionShape};
use tradein_core::device::DeviceKind;
use tradein_core::error::CoreError;
use tradein_core::grade::Grade;
use tradein_core::price_table::{PriceTableEntry, PriceTableUpsert};
use tradein_core::store::{CatalogStore, ConditionGradeStore, PriceTableStore, UpsertOutcome};
use tradein_core::types::DbId;

use crate::repositories::{BrandRepo, ConditionGradeRepo, DeviceModelRepo, PriceTableRepo};

/// PostgreSQL-backed implementation of every engine store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Storage error");
    CoreError::Internal(format!("storage error: {err}"))
}

fn outcome(inserted: bool) -> UpsertOutcome {
    if inserted {
        UpsertOutcome::Inserted
    } else {
        UpsertOutcome::Updated
    }
}

impl ConditionGradeStore for PgStore {
    async fn matching_grades(
        &self,
        shape: ConditionShape,
        filter: &ConditionQuery,
    ) -> Result<Vec<Grade>, CoreError> {
        if let Some((field, _)) = filter.iter().find(|(f, _)| !shape.fields().contains(f)) {
            return Err(CoreError::Validation(format!(
                "field '{}' is not part of the {} condition table",
                field.name(),
                shape.as_str()
            )));
        }

        let labels = ConditionGradeRepo::matching_grades(&self.pool, shape, filter)
            .await
            .map_err(storage_error)?;
        labels
            .iter()
            .map(|label| {
                Grade::from_label(label).ok_or_else(|| {
                    CoreError::Integrity(format!("unknown grade '{label}' in {}", shape.table()))
                })
            })
            .collect()
    }

    async fn upsert_condition_grade(
        &self,
        record: &ConditionGradeRecord,
    ) -> Result<UpsertOutcome, CoreError> {
        ConditionGradeRepo::upsert(&self.pool, record)
            .await
            .map(outcome)
            .map_err(storage_error)
    }
}

impl PriceTableStore for PgStore {
    async fn price_table_candidates(
        &self,
        model_id: DbId,
        storage: &str,
        ram: Option<&str>,
    ) -> Result<Vec<PriceTableEntry>, CoreError> {
        let rows = PriceTableRepo::candidates(&self.pool, model_id, storage, ram)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert_price_tables(
        &self,
        entries: &[PriceTableUpsert],
    ) -> Result<Vec<UpsertOutcome>, CoreError> {
        let inserted = PriceTableRepo::upsert_batch(&self.pool, entries)
            .await
            .map_err(storage_error)?;
        Ok(inserted.into_iter().map(outcome).collect())
    }
}

impl CatalogStore for PgStore {
    async fn find_brand_by_name(&self, name: &str) -> Result<Option<CatalogBrand>, CoreError> {
        let row = BrandRepo::find_by_name(&self.pool, name)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Into::into))
    }

    async fn next_brand_display_order(&self) -> Result<i32, CoreError> {
        BrandRepo::next_display_order(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn create_brand(&self, brand: &NewBrand) -> Result<CatalogBrand, CoreError> {
        let row = BrandRepo::create(&self.pool, brand)
            .await
            .map_err(storage_error)?;
        tracing::info!(brand_id = row.id, name = %row.name, "Brand created by import");
        Ok(row.into())
    }

    async fn find_model(
        &self,
        brand_id: DbId,
        name: &str,
        kind: DeviceKind,
    ) -> Result<Option<CatalogModel>, CoreError> {
        let row = DeviceModelRepo::find(&self.pool, brand_id, name, kind)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_model(&self, model: &NewDeviceModel) -> Result<CatalogModel, CoreError> {
        let row = DeviceModelRepo::create(&self.pool, model)
            .await
            .map_err(storage_error)?;
        tracing::info!(model_id = row.id, name = %row.name, "Device model created by import");
        Ok(row.into())
    }

    async fn add_model_config(&self, model_id: DbId, config: &ModelConfig) -> Result<(), CoreError> {
        let updated = DeviceModelRepo::append_config(&self.pool, model_id, config)
            .await
            .map_err(storage_error)?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "DeviceModel",
                key: model_id.to_string(),
            });
        }
        Ok(())
    }
}
