use serde::Serialize;
use sqlx::FromRow;
use tradein_core::catalog::CatalogBrand;
use tradein_core::device::DeviceKind;
use tradein_core::types::{DbId, Timestamp};

/// A row from the `brands` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brand {
    pub id: DbId,
    pub name: String,
    pub display_order: i32,
    pub logo_url: Option<String>,
    pub device_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Brand> for CatalogBrand {
    fn from(row: Brand) -> Self {
        CatalogBrand {
            id: row.id,
            name: row.name,
            display_order: row.display_order,
            logo_url: row.logo_url,
            device_type: DeviceKind::parse(&row.device_type).unwrap_or_default(),
        }
    }
}
