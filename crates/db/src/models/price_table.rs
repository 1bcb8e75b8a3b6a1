use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use tradein_core::grade::{GradePrices, PriceKey};
use tradein_core::price_table::PriceTableEntry;
use tradein_core::types::{DbId, Timestamp};

/// A row from the `price_tables` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceTable {
    pub id: DbId,
    pub model_id: DbId,
    pub storage: String,
    pub ram: Option<String>,
    /// Price key → price. Kept as raw JSON so unknown keys written by other
    /// tools do not break reads.
    pub grades: Json<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Known price keys with numeric values. Everything else is ignored.
pub fn grade_prices_from_json(value: &serde_json::Value) -> GradePrices {
    let Some(object) = value.as_object() else {
        return GradePrices::new();
    };
    object
        .iter()
        .filter_map(|(key, price)| {
            let key: PriceKey = serde_json::from_value(serde_json::Value::String(key.clone())).ok()?;
            Some((key, price.as_f64()?))
        })
        .collect()
}

impl From<PriceTable> for PriceTableEntry {
    fn from(row: PriceTable) -> Self {
        PriceTableEntry {
            id: row.id,
            model_id: row.model_id,
            storage: row.storage,
            ram: row.ram,
            grades: grade_prices_from_json(&row.grades.0),
        }
    }
}
