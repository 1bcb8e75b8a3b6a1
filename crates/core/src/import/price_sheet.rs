//! Column layout and row parsing of price sheets.

use crate::device::DeviceKind;
use crate::grade::{GradePrices, PriceKey};
use crate::price_table::normalize_ram;

use super::sheet::{SheetData, SheetRow};
use super::ImportError;

// ── Header aliases ──────────────────────────────────────────────────

pub const BRAND_ALIASES: &[&str] = &["brand", "brand name"];
pub const MODEL_ALIASES: &[&str] = &["model", "model name", "phone model"];
pub const STORAGE_ALIASES: &[&str] = &["storage", "rom", "variant"];
pub const RAM_ALIASES: &[&str] = &["ram"];
pub const BASE_PRICE_ALIASES: &[&str] = &["price", "base price", "baseprice"];
pub const DEVICE_TYPE_ALIASES: &[&str] = &["category", "type", "device type"];

/// Grade columns a price sheet can carry. Grades not listed here are never
/// written by an import.
pub const GRADE_COLUMNS: &[(PriceKey, &[&str])] = &[
    (PriceKey::APlus, &["a+warranty", "a+ warranty", "a warranty", "a+"]),
    (PriceKey::A, &["a"]),
    (PriceKey::AMinus, &["a-"]),
    (PriceKey::BPlus, &["b+"]),
    (PriceKey::B, &["b"]),
    (PriceKey::BMinus, &["b-"]),
    (PriceKey::CPlus, &["c+"]),
    (PriceKey::C, &["c"]),
    (PriceKey::CMinus, &["c-"]),
    (PriceKey::D, &["d"]),
    (PriceKey::E, &["e"]),
];

// ── Layout ──────────────────────────────────────────────────────────

/// Column indices of a price sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceColumns {
    pub brand: usize,
    pub model: usize,
    pub storage: usize,
    pub ram: Option<usize>,
    pub base_price: Option<usize>,
    pub device_type: Option<usize>,
    pub grades: Vec<(PriceKey, usize)>,
}

impl PriceColumns {
    pub fn locate(sheet: &SheetData) -> Result<Self, ImportError> {
        Ok(Self {
            brand: sheet
                .column(BRAND_ALIASES)
                .ok_or(ImportError::MissingColumn("brand"))?,
            model: sheet
                .column(MODEL_ALIASES)
                .ok_or(ImportError::MissingColumn("model"))?,
            storage: sheet
                .column(STORAGE_ALIASES)
                .ok_or(ImportError::MissingColumn("storage"))?,
            ram: sheet.column(RAM_ALIASES),
            base_price: sheet.column(BASE_PRICE_ALIASES),
            device_type: sheet.column(DEVICE_TYPE_ALIASES),
            grades: GRADE_COLUMNS
                .iter()
                .filter_map(|(key, aliases)| sheet.column(aliases).map(|idx| (*key, idx)))
                .collect(),
        })
    }
}

// ── Rows ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSheetRow {
    pub brand: String,
    pub model: String,
    pub storage: String,
    pub ram: Option<String>,
    pub base_price: f64,
    pub device_type: DeviceKind,
    pub grades: GradePrices,
}

/// Parse a price cell: keep digits and dots, then read the longest numeric
/// prefix. Nothing numeric is zero.
///
/// `"₹ 15,000"` → `15000.0`, `"1.2.3"` → `1.2`, `""` → `0.0`.
pub fn parse_price(cell: &str) -> f64 {
    let cleaned: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let end = cleaned
        .match_indices('.')
        .nth(1)
        .map_or(cleaned.len(), |(idx, _)| idx);
    cleaned[..end].parse().unwrap_or(0.0)
}

fn required<'a>(row: &'a SheetRow, index: usize, name: &str) -> Result<&'a str, String> {
    match row.cell(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("{name} is required")),
    }
}

/// Parse one data row. The error is the rejection reason.
pub fn parse_price_row(columns: &PriceColumns, row: &SheetRow) -> Result<PriceSheetRow, String> {
    let brand = required(row, columns.brand, "brand")?;
    let model = required(row, columns.model, "model")?;
    let storage = required(row, columns.storage, "storage")?;

    let device_type = match columns.device_type.and_then(|i| row.cell(i)) {
        None | Some("") => DeviceKind::default(),
        Some(value) => {
            DeviceKind::parse(value).ok_or_else(|| format!("unknown device type '{value}'"))?
        }
    };

    let grades = columns
        .grades
        .iter()
        .map(|(key, idx)| (*key, parse_price(row.cell(*idx).unwrap_or_default())))
        .collect();

    Ok(PriceSheetRow {
        brand: brand.to_string(),
        model: model.to_string(),
        storage: storage.to_string(),
        ram: normalize_ram(columns.ram.and_then(|i| row.cell(i))),
        base_price: columns
            .base_price
            .and_then(|i| row.cell(i))
            .map_or(0.0, parse_price),
        device_type,
        grades,
    })
}
