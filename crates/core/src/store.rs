//! Storage seams of the engine.
//!
//! The resolvers and importers only see these traits; `tradein-db`
//! implements them on PostgreSQL and the unit tests use an in-memory store.

use serde::Serialize;

use crate::catalog::{CatalogBrand, CatalogModel, ModelConfig, NewBrand, NewDeviceModel};
use crate::condition::{ConditionGradeRecord, ConditionQuery, ConditionShape};
use crate::device::DeviceKind;
use crate::error::CoreError;
use crate::grade::Grade;
use crate::price_table::{PriceTableEntry, PriceTableUpsert};
use crate::types::DbId;

/// Whether an upsert created a record or changed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

pub trait ConditionGradeStore: Send + Sync {
    /// Grades of every record whose key matches all fields of `filter`.
    ///
    /// Implementations may stop after two matches; callers only need to
    /// distinguish none, one and several.
    fn matching_grades(
        &self,
        shape: ConditionShape,
        filter: &ConditionQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Grade>, CoreError>> + Send;

    /// Insert the record or replace the grade of the record with its key.
    fn upsert_condition_grade(
        &self,
        record: &ConditionGradeRecord,
    ) -> impl std::future::Future<Output = Result<UpsertOutcome, CoreError>> + Send;
}

pub trait PriceTableStore: Send + Sync {
    /// Price tables of `model_id`/`storage` whose RAM is `ram` or absent.
    /// With `ram = None` only RAM-less records are returned.
    fn price_table_candidates(
        &self,
        model_id: DbId,
        storage: &str,
        ram: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<PriceTableEntry>, CoreError>> + Send;

    /// Merge each entry's grades into the record for its configuration,
    /// creating it when absent. All entries are written atomically.
    fn upsert_price_tables(
        &self,
        entries: &[PriceTableUpsert],
    ) -> impl std::future::Future<Output = Result<Vec<UpsertOutcome>, CoreError>> + Send;
}

pub trait CatalogStore: Send + Sync {
    /// Case-insensitive brand lookup.
    fn find_brand_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<CatalogBrand>, CoreError>> + Send;

    /// One past the highest display order in use (1 when there are no brands).
    fn next_brand_display_order(
        &self,
    ) -> impl std::future::Future<Output = Result<i32, CoreError>> + Send;

    fn create_brand(
        &self,
        brand: &NewBrand,
    ) -> impl std::future::Future<Output = Result<CatalogBrand, CoreError>> + Send;

    /// Lookup by brand, case-insensitive name and device kind.
    fn find_model(
        &self,
        brand_id: DbId,
        name: &str,
        kind: DeviceKind,
    ) -> impl std::future::Future<Output = Result<Option<CatalogModel>, CoreError>> + Send;

    fn create_model(
        &self,
        model: &NewDeviceModel,
    ) -> impl std::future::Future<Output = Result<CatalogModel, CoreError>> + Send;

    /// Append a configuration entry to a model.
    fn add_model_config(
        &self,
        model_id: DbId,
        config: &ModelConfig,
    ) -> impl std::future::Future<Output = Result<(), CoreError>> + Send;
}
