//! Handler for condition-grade table imports.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::Deserialize;
use tradein_core::classification::DeviceProfile;
use tradein_core::device::DeviceKind;
use tradein_core::error::CoreError;
use tradein_core::import::condition_import::{run_condition_import, ConditionImportSummary};
use tradein_core::import::sheet::{read_first_sheet, SpreadsheetFormat};

use crate::error::{AppError, AppResult};
use crate::handlers::read_upload;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportParams {
    /// `phone`, `tablet` or `watch`. Defaults to `phone`.
    pub device: Option<String>,
}

fn device_kind(params: &ImportParams) -> AppResult<DeviceKind> {
    match params.device.as_deref().map(str::trim) {
        None | Some("") => Ok(DeviceKind::default()),
        Some(value) => DeviceKind::parse(value).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown device '{value}', expected one of: {}",
                DeviceKind::ALL.join(", ")
            ))
        }),
    }
}

/// POST /api/v1/admin/condition-grades/import?device=
///
/// Multipart upload with a `file` field. Watches import into the watch
/// table; phones and tablets share the standard table.
pub async fn import_condition_grades(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ConditionImportSummary>>> {
    let kind = device_kind(&params)?;
    let shape = DeviceProfile::for_kind(kind).shape;

    let upload = read_upload(multipart).await?;
    let format = SpreadsheetFormat::from_file_name(&upload.file_name).map_err(CoreError::from)?;
    let sheet = tokio::task::spawn_blocking(move || read_first_sheet(format, &upload.bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("Spreadsheet parsing failed: {e}")))?
        .map_err(CoreError::from)?;

    let summary = run_condition_import(&state.store(), &sheet, shape).await?;

    for error in &summary.errors {
        tracing::warn!(row = error.row, reason = %error.message, "Condition row rejected");
    }
    tracing::info!(
        shape = shape.as_str(),
        inserted = summary.inserted_count,
        updated = summary.updated_count,
        errors = summary.error_count,
        "Condition grade import finished"
    );

    Ok(Json(DataResponse { data: summary }))
}
