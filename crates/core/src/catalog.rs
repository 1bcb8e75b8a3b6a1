//! Brands and device models as the import pipeline sees them.

use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;
use crate::types::DbId;

/// Device type given to brands created by an import.
pub const DEFAULT_BRAND_DEVICE_TYPE: DeviceKind = DeviceKind::Phone;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogBrand {
    pub id: DbId,
    pub name: String,
    pub display_order: i32,
    pub logo_url: Option<String>,
    pub device_type: DeviceKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBrand {
    pub name: String,
    pub display_order: i32,
    pub logo_url: String,
    pub device_type: DeviceKind,
}

/// One sellable configuration of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub storage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    #[serde(default)]
    pub base_price: f64,
}

impl ModelConfig {
    /// Whether this entry describes the given storage/RAM pair.
    pub fn is_for(&self, storage: &str, ram: Option<&str>) -> bool {
        self.storage == storage && self.ram.as_deref() == ram
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModel {
    pub id: DbId,
    pub brand_id: DbId,
    pub name: String,
    pub device_type: DeviceKind,
    pub config: Vec<ModelConfig>,
}

impl CatalogModel {
    pub fn has_config(&self, storage: &str, ram: Option<&str>) -> bool {
        self.config.iter().any(|c| c.is_for(storage, ram))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDeviceModel {
    pub brand_id: DbId,
    pub name: String,
    pub device_type: DeviceKind,
    pub config: Vec<ModelConfig>,
}

/// URL-safe slug of a brand name: lowercase alphanumerics separated by
/// single dashes.
pub fn brand_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Logo location for a brand under the configured base URL.
pub fn brand_logo_url(base_url: &str, name: &str) -> String {
    format!("{}/{}.png", base_url.trim_end_matches('/'), brand_slug(name))
}
