//! Condition-grade table import.
//!
//! Each row carries every code of the table's shape plus the grade. An empty
//! cell is a valid (empty) code, a missing cell is not.

use serde::Serialize;

use crate::condition::{ConditionField, ConditionGradeRecord, ConditionQuery, ConditionShape};
use crate::error::CoreError;
use crate::grade::Grade;
use crate::store::{ConditionGradeStore, UpsertOutcome};

use super::sheet::{SheetData, SheetRow};

/// Row errors listed individually in a summary. The rest are only counted.
pub const MAX_REPORTED_ERRORS: usize = 10;

const GRADE_ALIASES: &[&str] = &["grade"];

/// Accepted headers for a condition column: the short name, the column
/// name and the API key, all lowercase.
fn field_aliases(field: ConditionField) -> [String; 3] {
    let api_key = serde_json::to_value(field)
        .ok()
        .and_then(|v| v.as_str().map(str::to_lowercase))
        .unwrap_or_default();
    [
        field.name().to_lowercase(),
        field.column().to_string(),
        api_key,
    ]
}

fn locate(sheet: &SheetData, field: ConditionField) -> Option<usize> {
    let aliases = field_aliases(field);
    let aliases: Vec<&str> = aliases.iter().map(String::as_str).collect();
    sheet.column(&aliases)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionRowError {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionImportSummary {
    pub updated_count: usize,
    pub inserted_count: usize,
    pub error_count: usize,
    pub total_processed: usize,
    pub errors: Vec<ConditionRowError>,
    pub additional_errors: usize,
    pub success: bool,
}

fn parse_row(
    row: &SheetRow,
    shape: ConditionShape,
    columns: &[(ConditionField, Option<usize>)],
    grade_column: Option<usize>,
) -> Result<ConditionGradeRecord, String> {
    let mut codes = ConditionQuery::new();
    for (field, column) in columns {
        let code = column
            .and_then(|idx| row.cell(idx))
            .ok_or_else(|| format!("missing value for '{}'", field.name()))?;
        codes.set(*field, code);
    }

    let label = grade_column
        .and_then(|idx| row.cell(idx))
        .ok_or_else(|| "missing value for 'grade'".to_string())?;
    let grade = Grade::from_label(label).ok_or_else(|| format!("invalid grade '{label}'"))?;

    ConditionGradeRecord::new(shape, codes, grade).map_err(|e| e.to_string())
}

/// Parse every row of `sheet`. Records carry their row number.
pub fn parse_condition_rows(
    sheet: &SheetData,
    shape: ConditionShape,
) -> (Vec<(usize, ConditionGradeRecord)>, Vec<ConditionRowError>) {
    let columns: Vec<_> = shape
        .fields()
        .iter()
        .map(|field| (*field, locate(sheet, *field)))
        .collect();
    let grade_column = sheet.column(GRADE_ALIASES);

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for row in &sheet.rows {
        match parse_row(row, shape, &columns, grade_column) {
            Ok(record) => records.push((row.number, record)),
            Err(message) => errors.push(ConditionRowError {
                row: row.number,
                message,
            }),
        }
    }
    (records, errors)
}

/// Upsert every valid row of `sheet` into the table for `shape`.
///
/// Parse and storage failures are reported per row; the import itself only
/// fails when the sheet has no data rows.
pub async fn run_condition_import<S>(
    store: &S,
    sheet: &SheetData,
    shape: ConditionShape,
) -> Result<ConditionImportSummary, CoreError>
where
    S: ConditionGradeStore,
{
    if sheet.rows.is_empty() {
        return Err(CoreError::Validation("file contains no data rows".to_string()));
    }

    let (records, mut errors) = parse_condition_rows(sheet, shape);
    let mut inserted = 0;
    let mut updated = 0;
    for (row, record) in &records {
        match store.upsert_condition_grade(record).await {
            Ok(UpsertOutcome::Inserted) => inserted += 1,
            Ok(UpsertOutcome::Updated) => updated += 1,
            Err(err) => errors.push(ConditionRowError {
                row: *row,
                message: err.to_string(),
            }),
        }
    }
    errors.sort_by_key(|e| e.row);

    let error_count = errors.len();
    let additional_errors = error_count.saturating_sub(MAX_REPORTED_ERRORS);
    errors.truncate(MAX_REPORTED_ERRORS);

    Ok(ConditionImportSummary {
        updated_count: updated,
        inserted_count: inserted,
        error_count,
        total_processed: sheet.rows.len(),
        errors,
        additional_errors,
        success: error_count == 0,
    })
}
