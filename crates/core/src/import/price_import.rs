//! Price sheet import: catalog resolution followed by a batched upsert.
//!
//! Rows are processed strictly in file order. For each row the brand and
//! model are resolved (and created when the source allows it), the model's
//! configuration list is extended if needed, and a price table upsert is
//! queued. Queued upserts are written in one call once every row has been
//! resolved, so the price tables either all change or none do.

use serde::Serialize;

use crate::catalog::{
    brand_logo_url, CatalogBrand, CatalogModel, ModelConfig, NewBrand, NewDeviceModel,
    DEFAULT_BRAND_DEVICE_TYPE,
};
use crate::error::CoreError;
use crate::price_table::PriceTableUpsert;
use crate::store::{CatalogStore, PriceTableStore, UpsertOutcome};

use super::price_sheet::{parse_price_row, PriceColumns, PriceSheetRow};
use super::sheet::{read_csv, read_xlsx, SheetData, SpreadsheetFormat};
use super::ImportError;

/// Worksheet holding rows for brands that already exist.
pub const EXISTING_BRANDS_SHEET: &str = "Sheet1";
/// Worksheet holding rows whose brands may need to be created.
pub const NEW_MODELS_SHEET: &str = "Model Need to be Added";

// ── Sources ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandPolicy {
    /// Unknown brands reject the row.
    ExistingOnly,
    /// Unknown brands are created.
    CreateMissing,
}

#[derive(Debug, Clone)]
pub struct PriceImportSource {
    pub sheet: SheetData,
    pub brand_policy: BrandPolicy,
}

/// Split an uploaded file into import sources.
///
/// A CSV is a single source that may create brands. A workbook contributes
/// [`EXISTING_BRANDS_SHEET`] then [`NEW_MODELS_SHEET`]; at least one must be
/// present.
pub fn price_sources(
    format: SpreadsheetFormat,
    bytes: &[u8],
) -> Result<Vec<PriceImportSource>, ImportError> {
    let sources = match format {
        SpreadsheetFormat::Csv => vec![PriceImportSource {
            sheet: read_csv(bytes)?,
            brand_policy: BrandPolicy::CreateMissing,
        }],
        SpreadsheetFormat::Xlsx => {
            let mut sheets = read_xlsx(bytes)?;
            let mut take = |name: &str, brand_policy| {
                sheets
                    .iter()
                    .position(|s| s.name == name)
                    .map(|idx| PriceImportSource {
                        sheet: sheets.remove(idx),
                        brand_policy,
                    })
            };
            let existing = take(EXISTING_BRANDS_SHEET, BrandPolicy::ExistingOnly);
            let added = take(NEW_MODELS_SHEET, BrandPolicy::CreateMissing);
            let sources: Vec<_> = existing.into_iter().chain(added).collect();
            if sources.is_empty() {
                return Err(ImportError::MissingSheet(format!(
                    "'{EXISTING_BRANDS_SHEET}' or '{NEW_MODELS_SHEET}'"
                )));
            }
            sources
        }
    };

    if sources.iter().all(|s| s.sheet.rows.is_empty()) {
        return Err(ImportError::Empty);
    }
    Ok(sources)
}

// ── Summary ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Base URL for logos of brands created by the import.
    pub logo_base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Inserted,
    Updated,
    Rejected,
}

impl From<UpsertOutcome> for RowStatus {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Inserted => RowStatus::Inserted,
            UpsertOutcome::Updated => RowStatus::Updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOutcome {
    pub sheet: String,
    pub row: usize,
    pub brand: String,
    pub model: String,
    pub storage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub rejected: Vec<RowOutcome>,
    pub outcomes: Vec<RowOutcome>,
    pub message: String,
}

// ── Runner ──────────────────────────────────────────────────────────

struct Pending {
    outcome_idx: usize,
    upsert: PriceTableUpsert,
}

/// Import every row of `sources`, in order.
///
/// Row problems (missing fields, unknown brand, storage failures while
/// resolving the catalog) reject that row only. A failure of the final
/// price table write is returned as an error.
pub async fn run_price_import<S>(
    store: &S,
    sources: &[PriceImportSource],
    options: &ImportOptions,
) -> Result<PriceImportSummary, CoreError>
where
    S: CatalogStore + PriceTableStore,
{
    let mut outcomes: Vec<RowOutcome> = Vec::new();
    let mut pending: Vec<Pending> = Vec::new();

    for source in sources {
        if source.sheet.rows.is_empty() {
            continue;
        }
        let columns = PriceColumns::locate(&source.sheet)?;

        for row in &source.sheet.rows {
            let cell = |idx: usize| row.cell(idx).unwrap_or_default().to_string();
            let mut outcome = RowOutcome {
                sheet: source.sheet.name.clone(),
                row: row.number,
                brand: cell(columns.brand),
                model: cell(columns.model),
                storage: cell(columns.storage),
                ram: None,
                status: RowStatus::Rejected,
                reason: None,
            };

            let resolved = match parse_price_row(&columns, row) {
                Ok(parsed) => {
                    outcome.ram = parsed.ram.clone();
                    resolve_row(store, &parsed, source.brand_policy, options)
                        .await
                        .map(|model| (model, parsed))
                }
                Err(reason) => Err(reason),
            };

            match resolved {
                Ok((model, parsed)) => pending.push(Pending {
                    outcome_idx: outcomes.len(),
                    upsert: PriceTableUpsert {
                        model_id: model.id,
                        storage: parsed.storage,
                        ram: parsed.ram,
                        grades: parsed.grades,
                    },
                }),
                Err(reason) => outcome.reason = Some(reason),
            }
            outcomes.push(outcome);
        }
    }

    if !pending.is_empty() {
        let upserts: Vec<PriceTableUpsert> = pending.iter().map(|p| p.upsert.clone()).collect();
        let written = store.upsert_price_tables(&upserts).await?;
        for (p, result) in pending.iter().zip(written) {
            outcomes[p.outcome_idx].status = result.into();
        }
    }

    Ok(summarize(outcomes))
}

/// Find or create the brand and model of a row and make sure the model
/// lists the row's configuration.
async fn resolve_row<S>(
    store: &S,
    row: &PriceSheetRow,
    policy: BrandPolicy,
    options: &ImportOptions,
) -> Result<CatalogModel, String>
where
    S: CatalogStore,
{
    let brand = resolve_brand(store, &row.brand, policy, options).await?;

    let config = ModelConfig {
        storage: row.storage.clone(),
        ram: row.ram.clone(),
        base_price: row.base_price,
    };

    let existing = store
        .find_model(brand.id, &row.model, row.device_type)
        .await
        .map_err(|e| e.to_string())?;

    match existing {
        Some(model) => {
            if !model.has_config(&row.storage, row.ram.as_deref()) {
                store
                    .add_model_config(model.id, &config)
                    .await
                    .map_err(|e| e.to_string())?;
            }
            Ok(model)
        }
        None => store
            .create_model(&NewDeviceModel {
                brand_id: brand.id,
                name: row.model.clone(),
                device_type: row.device_type,
                config: vec![config],
            })
            .await
            .map_err(|e| e.to_string()),
    }
}

async fn resolve_brand<S>(
    store: &S,
    name: &str,
    policy: BrandPolicy,
    options: &ImportOptions,
) -> Result<CatalogBrand, String>
where
    S: CatalogStore,
{
    if let Some(brand) = store
        .find_brand_by_name(name)
        .await
        .map_err(|e| e.to_string())?
    {
        return Ok(brand);
    }

    match policy {
        BrandPolicy::ExistingOnly => Err(format!("brand not found: {name}")),
        BrandPolicy::CreateMissing => {
            let display_order = store
                .next_brand_display_order()
                .await
                .map_err(|e| e.to_string())?;
            store
                .create_brand(&NewBrand {
                    name: name.to_string(),
                    display_order,
                    logo_url: brand_logo_url(&options.logo_base_url, name),
                    device_type: DEFAULT_BRAND_DEVICE_TYPE,
                })
                .await
                .map_err(|e| e.to_string())
        }
    }
}

fn summarize(outcomes: Vec<RowOutcome>) -> PriceImportSummary {
    let count = |status| outcomes.iter().filter(|o| o.status == status).count();
    let inserted = count(RowStatus::Inserted);
    let updated = count(RowStatus::Updated);
    let rejected: Vec<RowOutcome> = outcomes
        .iter()
        .filter(|o| o.status == RowStatus::Rejected)
        .cloned()
        .collect();

    let message = format!(
        "Processed {} rows: {inserted} inserted, {updated} updated, {} rejected",
        outcomes.len(),
        rejected.len()
    );

    PriceImportSummary {
        inserted,
        updated,
        rejected,
        outcomes,
        message,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::device::DeviceKind;
    use crate::grade::PriceKey;
    use crate::import::sheet::fixtures;
    use crate::test_helpers::InMemoryStore;

    fn options() -> ImportOptions {
        ImportOptions {
            logo_base_url: "https://cdn.test/logos".into(),
        }
    }

    fn csv_sources(data: &str) -> Vec<PriceImportSource> {
        price_sources(SpreadsheetFormat::Csv, data.as_bytes()).unwrap()
    }

    const IPHONE_CSV: &str = "Brand,Model,Storage,RAM,Price,A+,A,A-,E\n\
        Apple,iPhone 12,128GB,6GB,30000,18000,17000,15000,2000\n\
        Apple,iPhone 12,256GB,6GB,34000,20000,19000,17000,2500\n";

    #[tokio::test]
    async fn csv_import_creates_catalog_and_price_tables() {
        let store = InMemoryStore::default();
        let summary = run_price_import(&store, &csv_sources(IPHONE_CSV), &options())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.updated, 0);
        assert!(summary.rejected.is_empty());
        assert_eq!(summary.message, "Processed 2 rows: 2 inserted, 0 updated, 0 rejected");

        let brands = store.brands();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].display_order, 1);
        assert_eq!(brands[0].logo_url.as_deref(), Some("https://cdn.test/logos/apple.png"));
        assert_eq!(brands[0].device_type, DeviceKind::Phone);

        let models = store.models();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].config.len(), 2);

        let tables = store.price_tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].grades.get(PriceKey::AMinus), Some(15000.0));
        assert_eq!(tables[0].ram.as_deref(), Some("6GB"));
    }

    #[tokio::test]
    async fn reimport_is_idempotent() {
        let store = InMemoryStore::default();
        run_price_import(&store, &csv_sources(IPHONE_CSV), &options())
            .await
            .unwrap();
        let tables_before = store.price_tables();
        let models_before = store.models();

        let summary = run_price_import(&store, &csv_sources(IPHONE_CSV), &options())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 0);
        assert_eq!(summary.updated, 2);
        assert_eq!(store.brands().len(), 1);
        assert_eq!(store.models(), models_before);
        assert_eq!(store.price_tables(), tables_before);
    }

    #[tokio::test]
    async fn merge_keeps_grades_outside_the_sheet() {
        let store = InMemoryStore::default();
        run_price_import(&store, &csv_sources(IPHONE_CSV), &options())
            .await
            .unwrap();

        let partial = "Brand,Model,Storage,RAM,A\napple,IPHONE 12,128GB,6GB,17500\n";
        run_price_import(&store, &csv_sources(partial), &options())
            .await
            .unwrap();

        let table = store
            .price_tables()
            .into_iter()
            .find(|t| t.storage == "128GB")
            .unwrap();
        assert_eq!(table.grades.get(PriceKey::A), Some(17500.0));
        assert_eq!(table.grades.get(PriceKey::AMinus), Some(15000.0));
        assert_eq!(store.models().len(), 1, "model matched case-insensitively");
    }

    #[tokio::test]
    async fn failing_row_does_not_affect_others() {
        let store = InMemoryStore::default();
        store.fail_on_brand("Broken");
        let data = "Brand,Model,Storage,A\n\
            Apple,iPhone 12,128GB,100\n\
            Broken,X1,64GB,50\n\
            Samsung,Galaxy S21,,70\n\
            Samsung,Galaxy S21,128GB,80\n";

        let summary = run_price_import(&store, &csv_sources(data), &options())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.rejected.len(), 2);
        assert_eq!(summary.rejected[0].row, 2);
        assert_matches!(summary.rejected[0].reason.as_deref(), Some(r) if r.contains("Broken"));
        assert_eq!(summary.rejected[1].row, 3);
        assert_eq!(summary.rejected[1].reason.as_deref(), Some("storage is required"));
        assert_eq!(summary.outcomes.len(), 4);
        assert_eq!(store.price_tables().len(), 2);

        let samsung = store.brands().into_iter().find(|b| b.name == "Samsung").unwrap();
        assert_eq!(samsung.display_order, 2);
    }

    #[tokio::test]
    async fn ramless_rows_are_a_distinct_configuration() {
        let store = InMemoryStore::default();
        let data = "Brand,Model,Storage,RAM,A\n\
            Apple,iPhone 12,128GB,,100\n\
            Apple,iPhone 12,128GB,6GB,120\n";
        let summary = run_price_import(&store, &csv_sources(data), &options())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 2);
        let model = &store.models()[0];
        assert!(model.has_config("128GB", None));
        assert!(model.has_config("128GB", Some("6GB")));
    }

    #[tokio::test]
    async fn workbook_sheet1_only_accepts_existing_brands() {
        let store = InMemoryStore::default();
        let bytes = fixtures::xlsx(&[
            (
                EXISTING_BRANDS_SHEET,
                vec![
                    vec!["Brand", "Model", "Storage", "A"],
                    vec!["Google", "Pixel 7", "128GB", "9000"],
                    vec!["Apple", "iPhone 13", "128GB", "21000"],
                ],
            ),
            (
                NEW_MODELS_SHEET,
                vec![
                    vec!["Brand Name", "Model Name", "Variant", "A"],
                    vec!["Apple", "iPhone 12", "128GB", "15000"],
                ],
            ),
        ]);
        let sources = price_sources(SpreadsheetFormat::Xlsx, &bytes).unwrap();
        assert_eq!(sources[0].brand_policy, BrandPolicy::ExistingOnly);

        let summary = run_price_import(&store, &sources, &options()).await.unwrap();

        // Apple is created by the second sheet, after Sheet1 was processed.
        assert_eq!(summary.rejected.len(), 2);
        assert!(summary
            .rejected
            .iter()
            .all(|r| r.sheet == EXISTING_BRANDS_SHEET
                && r.reason.as_deref().is_some_and(|m| m.starts_with("brand not found"))));
        assert_eq!(summary.inserted, 1);
        assert_eq!(store.brands().len(), 1);
    }

    #[test]
    fn workbook_without_known_sheets_is_rejected() {
        let bytes = fixtures::xlsx(&[("Prices", vec![vec!["Brand"], vec!["Apple"]])]);
        assert_matches!(
            price_sources(SpreadsheetFormat::Xlsx, &bytes),
            Err(ImportError::MissingSheet(_))
        );
    }

    #[test]
    fn header_only_file_is_empty() {
        assert_matches!(
            price_sources(SpreadsheetFormat::Csv, b"Brand,Model,Storage\n"),
            Err(ImportError::Empty)
        );
    }

    #[tokio::test]
    async fn missing_column_fails_the_import() {
        let store = InMemoryStore::default();
        let sources = csv_sources("Brand,Storage\nApple,128GB\n");
        assert_matches!(
            run_price_import(&store, &sources, &options()).await,
            Err(CoreError::Validation(msg)) if msg.contains("model")
        );
    }
}
