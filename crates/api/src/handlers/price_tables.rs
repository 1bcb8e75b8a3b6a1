//! Handlers for price tables: listing, spreadsheet import and sync.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tradein_core::catalog::CatalogModel;
use tradein_core::error::CoreError;
use tradein_core::import::price_import::{
    price_sources, run_price_import, ImportOptions, PriceImportSummary,
};
use tradein_core::import::sheet::SpreadsheetFormat;
use tradein_core::price_table::{backfill_entries, PriceTableEntry};
use tradein_core::types::DbId;
use tradein_db::repositories::{DeviceModelRepo, PriceTableRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::read_upload;
use crate::response::DataResponse;
use crate::state::AppState;

// ── List ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub model_id: DbId,
}

/// GET /api/v1/price-tables?model_id=
pub async fn list_price_tables(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<PriceTableEntry>>>> {
    let rows = PriceTableRepo::list_by_model(&state.pool, params.model_id).await?;
    Ok(Json(DataResponse {
        data: rows.into_iter().map(Into::into).collect(),
    }))
}

// ── Import ───────────────────────────────────────────────────────────

/// POST /api/v1/admin/price-tables/import
///
/// Multipart upload with a `file` field (`.csv` or `.xlsx`).
pub async fn import_price_tables(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<PriceImportSummary>>> {
    let upload = read_upload(multipart).await?;
    let format = SpreadsheetFormat::from_file_name(&upload.file_name).map_err(CoreError::from)?;

    let sources = tokio::task::spawn_blocking(move || price_sources(format, &upload.bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("Spreadsheet parsing failed: {e}")))?
        .map_err(CoreError::from)?;

    let options = ImportOptions {
        logo_base_url: state.config.brand_logo_base_url.clone(),
    };
    let summary = run_price_import(&state.store(), &sources, &options).await?;

    for row in &summary.rejected {
        tracing::warn!(
            sheet = %row.sheet,
            row = row.row,
            reason = row.reason.as_deref().unwrap_or_default(),
            "Price row rejected"
        );
    }
    tracing::info!(
        inserted = summary.inserted,
        updated = summary.updated,
        rejected = summary.rejected.len(),
        "Price import finished"
    );

    Ok(Json(DataResponse { data: summary }))
}

// ── Sync ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    /// Distinct configurations declared by models.
    pub configurations: usize,
    /// Price tables created for configurations that had none.
    pub created: u64,
}

/// POST /api/v1/admin/price-tables/sync
///
/// Create an empty price table for every model configuration lacking one.
pub async fn sync_price_tables(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SyncResult>>> {
    let models: Vec<CatalogModel> = DeviceModelRepo::list_all(&state.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let entries = backfill_entries(&models);
    let created = PriceTableRepo::insert_missing(&state.pool, &entries).await?;

    tracing::info!(configurations = entries.len(), created, "Price table sync finished");

    Ok(Json(DataResponse {
        data: SyncResult {
            configurations: entries.len(),
            created,
        },
    }))
}
