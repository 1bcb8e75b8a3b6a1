//! In-memory stores for engine and importer tests.

use std::sync::Mutex;

use crate::catalog::{CatalogBrand, CatalogModel, ModelConfig, NewBrand, NewDeviceModel};
use crate::condition::{ConditionField, ConditionGradeRecord, ConditionQuery, ConditionShape};
use crate::device::DeviceKind;
use crate::error::CoreError;
use crate::grade::{Grade, GradePrices};
use crate::price_table::{PriceTableEntry, PriceTableUpsert};
use crate::store::{CatalogStore, ConditionGradeStore, PriceTableStore, UpsertOutcome};
use crate::types::DbId;

/// Codes of a phone with no reported defects.
pub fn phone_codes() -> ConditionQuery {
    ConditionQuery::new()
        .with(ConditionField::Warranty, "W1")
        .with(ConditionField::Core, "CR1")
        .with(ConditionField::Display, "D1")
        .with(ConditionField::FunctionalMajor, "MJ1")
        .with(ConditionField::FunctionalMinor, "MN1")
        .with(ConditionField::Cosmetics, "C1")
        .with(ConditionField::Accessories, "A2")
}

#[derive(Default)]
struct Tables {
    conditions: Vec<ConditionGradeRecord>,
    price_tables: Vec<PriceTableEntry>,
    brands: Vec<CatalogBrand>,
    models: Vec<CatalogModel>,
    next_id: DbId,
    failing_brand: Option<String>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Make `create_brand` fail for this name.
    pub fn fail_on_brand(&self, name: &str) {
        self.tables.lock().unwrap().failing_brand = Some(name.to_string());
    }

    pub fn insert_condition(&self, record: ConditionGradeRecord) {
        self.tables.lock().unwrap().conditions.push(record);
    }

    pub fn insert_price_table(
        &self,
        model_id: DbId,
        storage: &str,
        ram: Option<&str>,
        grades: GradePrices,
    ) -> DbId {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.price_tables.push(PriceTableEntry {
            id,
            model_id,
            storage: storage.to_string(),
            ram: ram.map(str::to_string),
            grades,
        });
        id
    }

    pub fn conditions(&self) -> Vec<ConditionGradeRecord> {
        self.tables.lock().unwrap().conditions.clone()
    }

    pub fn price_tables(&self) -> Vec<PriceTableEntry> {
        self.tables.lock().unwrap().price_tables.clone()
    }

    pub fn brands(&self) -> Vec<CatalogBrand> {
        self.tables.lock().unwrap().brands.clone()
    }

    pub fn models(&self) -> Vec<CatalogModel> {
        self.tables.lock().unwrap().models.clone()
    }
}

impl ConditionGradeStore for InMemoryStore {
    async fn matching_grades(
        &self,
        shape: ConditionShape,
        filter: &ConditionQuery,
    ) -> Result<Vec<Grade>, CoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .conditions
            .iter()
            .filter(|r| r.shape == shape && filter.matches(&r.codes))
            .map(|r| r.grade)
            .collect())
    }

    async fn upsert_condition_grade(
        &self,
        record: &ConditionGradeRecord,
    ) -> Result<UpsertOutcome, CoreError> {
        let mut tables = self.tables.lock().unwrap();
        match tables
            .conditions
            .iter_mut()
            .find(|r| r.shape == record.shape && r.codes == record.codes)
        {
            Some(existing) => {
                existing.grade = record.grade;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                tables.conditions.push(record.clone());
                Ok(UpsertOutcome::Inserted)
            }
        }
    }
}

impl PriceTableStore for InMemoryStore {
    async fn price_table_candidates(
        &self,
        model_id: DbId,
        storage: &str,
        ram: Option<&str>,
    ) -> Result<Vec<PriceTableEntry>, CoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .price_tables
            .iter()
            .filter(|e| e.model_id == model_id && e.storage == storage)
            .filter(|e| e.ram.is_none() || (ram.is_some() && e.ram.as_deref() == ram))
            .cloned()
            .collect())
    }

    async fn upsert_price_tables(
        &self,
        entries: &[PriceTableUpsert],
    ) -> Result<Vec<UpsertOutcome>, CoreError> {
        let mut tables = self.tables.lock().unwrap();
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            let existing = tables.price_tables.iter_mut().find(|e| {
                e.model_id == entry.model_id && e.storage == entry.storage && e.ram == entry.ram
            });
            match existing {
                Some(existing) => {
                    existing.grades.merge(&entry.grades);
                    outcomes.push(UpsertOutcome::Updated);
                }
                None => {
                    let id = tables.next_id();
                    tables.price_tables.push(PriceTableEntry {
                        id,
                        model_id: entry.model_id,
                        storage: entry.storage.clone(),
                        ram: entry.ram.clone(),
                        grades: entry.grades.clone(),
                    });
                    outcomes.push(UpsertOutcome::Inserted);
                }
            }
        }
        Ok(outcomes)
    }
}

impl CatalogStore for InMemoryStore {
    async fn find_brand_by_name(&self, name: &str) -> Result<Option<CatalogBrand>, CoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .brands
            .iter()
            .find(|b| b.name.to_lowercase() == name.to_lowercase())
            .cloned())
    }

    async fn next_brand_display_order(&self) -> Result<i32, CoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.brands.iter().map(|b| b.display_order).max().unwrap_or(0) + 1)
    }

    async fn create_brand(&self, brand: &NewBrand) -> Result<CatalogBrand, CoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.failing_brand.as_deref() == Some(brand.name.as_str()) {
            return Err(CoreError::Internal(format!("cannot create brand {}", brand.name)));
        }
        let created = CatalogBrand {
            id: tables.next_id(),
            name: brand.name.clone(),
            display_order: brand.display_order,
            logo_url: Some(brand.logo_url.clone()),
            device_type: brand.device_type,
        };
        tables.brands.push(created.clone());
        Ok(created)
    }

    async fn find_model(
        &self,
        brand_id: DbId,
        name: &str,
        kind: DeviceKind,
    ) -> Result<Option<CatalogModel>, CoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .models
            .iter()
            .find(|m| {
                m.brand_id == brand_id
                    && m.device_type == kind
                    && m.name.to_lowercase() == name.to_lowercase()
            })
            .cloned())
    }

    async fn create_model(&self, model: &NewDeviceModel) -> Result<CatalogModel, CoreError> {
        let mut tables = self.tables.lock().unwrap();
        let created = CatalogModel {
            id: tables.next_id(),
            brand_id: model.brand_id,
            name: model.name.clone(),
            device_type: model.device_type,
            config: model.config.clone(),
        };
        tables.models.push(created.clone());
        Ok(created)
    }

    async fn add_model_config(&self, model_id: DbId, config: &ModelConfig) -> Result<(), CoreError> {
        let mut tables = self.tables.lock().unwrap();
        let model = tables
            .models
            .iter_mut()
            .find(|m| m.id == model_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "DeviceModel",
                key: model_id.to_string(),
            })?;
        model.config.push(config.clone());
        Ok(())
    }
}

/// Store that fails every call. Used to prove a path never reaches storage.
pub struct UnreachableStore;

impl ConditionGradeStore for UnreachableStore {
    async fn matching_grades(
        &self,
        _shape: ConditionShape,
        _filter: &ConditionQuery,
    ) -> Result<Vec<Grade>, CoreError> {
        Err(CoreError::Internal("condition store must not be queried".into()))
    }

    async fn upsert_condition_grade(
        &self,
        _record: &ConditionGradeRecord,
    ) -> Result<UpsertOutcome, CoreError> {
        Err(CoreError::Internal("condition store must not be written".into()))
    }
}
