//! Price table lookup with the RAM fallback policy.
//!
//! A price table is keyed by (model, storage, RAM) where a missing RAM is a
//! key state of its own. A request naming a RAM prefers the exact record and
//! falls back to the RAM-less one; a request without RAM only sees RAM-less
//! records.

use serde::Serialize;

use crate::catalog::CatalogModel;
use crate::error::CoreError;
use crate::grade::{Grade, GradePrices};
use crate::store::PriceTableStore;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTableEntry {
    pub id: DbId,
    pub model_id: DbId,
    pub storage: String,
    pub ram: Option<String>,
    pub grades: GradePrices,
}

/// Grades to merge into the record for one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTableUpsert {
    pub model_id: DbId,
    pub storage: String,
    pub ram: Option<String>,
    pub grades: GradePrices,
}

/// Price of one grade in one price table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    pub price_table_id: DbId,
    /// `None` when the table has no price for the grade. A stored zero is
    /// returned as `Some(0.0)`.
    pub price: Option<f64>,
}

/// Treat blank RAM the same as no RAM.
pub fn normalize_ram(ram: Option<&str>) -> Option<String> {
    ram.map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

/// Pick the record for `ram` among the candidates of one model/storage.
///
/// Exact-RAM records win over RAM-less ones. More than one record in the
/// winning group means the table's uniqueness was violated.
pub fn select_price_table(
    candidates: Vec<PriceTableEntry>,
    ram: Option<&str>,
) -> Result<PriceTableEntry, CoreError> {
    let (exact, ramless): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .filter(|entry| entry.ram.is_none() || (ram.is_some() && entry.ram.as_deref() == ram))
        .partition(|entry| ram.is_some() && entry.ram.as_deref() == ram);

    let bucket = if exact.is_empty() { ramless } else { exact };
    let count = bucket.len();
    let mut bucket = bucket.into_iter();
    match (bucket.next(), count) {
        (Some(entry), 1) => Ok(entry),
        (None, _) => Err(CoreError::NotFound {
            entity: "PriceTable",
            key: "no pricing configured for this configuration".to_string(),
        }),
        (Some(entry), n) => Err(CoreError::Integrity(format!(
            "{n} price tables for model {} storage '{}' ram {}",
            entry.model_id,
            entry.storage,
            entry.ram.as_deref().unwrap_or("<none>")
        ))),
    }
}

/// Price for `grade` of the given configuration.
pub async fn resolve_price<S>(
    store: &S,
    model_id: DbId,
    storage: &str,
    ram: Option<&str>,
    grade: Grade,
) -> Result<ResolvedPrice, CoreError>
where
    S: PriceTableStore,
{
    let candidates = store.price_table_candidates(model_id, storage, ram).await?;
    let entry = select_price_table(candidates, ram)?;
    Ok(ResolvedPrice {
        price_table_id: entry.id,
        price: entry.grades.price_for(grade),
    })
}

/// Empty price tables for every configuration the models declare.
///
/// Duplicated configurations within a model are emitted once. The store is
/// expected to skip configurations that already have a record.
pub fn backfill_entries(models: &[CatalogModel]) -> Vec<PriceTableUpsert> {
    let mut entries: Vec<PriceTableUpsert> = Vec::new();
    for model in models {
        for config in &model.config {
            let ram = normalize_ram(config.ram.as_deref());
            let seen = entries.iter().any(|e| {
                e.model_id == model.id && e.storage == config.storage && e.ram == ram
            });
            if !seen {
                entries.push(PriceTableUpsert {
                    model_id: model.id,
                    storage: config.storage.clone(),
                    ram,
                    grades: GradePrices::new(),
                });
            }
        }
    }
    entries
}
