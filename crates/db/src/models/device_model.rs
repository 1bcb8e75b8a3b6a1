use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use tradein_core::catalog::{CatalogModel, ModelConfig};
use tradein_core::device::DeviceKind;
use tradein_core::types::{DbId, Timestamp};

/// A row from the `device_models` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceModel {
    pub id: DbId,
    pub brand_id: DbId,
    pub name: String,
    pub device_type: String,
    /// Sellable configurations, stored as a JSONB array.
    pub config: Json<Vec<ModelConfig>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DeviceModel> for CatalogModel {
    fn from(row: DeviceModel) -> Self {
        CatalogModel {
            id: row.id,
            brand_id: row.brand_id,
            name: row.name,
            device_type: DeviceKind::parse(&row.device_type).unwrap_or_default(),
            config: row.config.0,
        }
    }
}
