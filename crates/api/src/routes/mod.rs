pub mod catalog;
pub mod condition_grades;
pub mod health;
pub mod price_tables;
pub mod pricing;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pricing/quote                                    grade and price a device (POST)
/// /pricing/classify                                 questionnaire codes only (POST)
///
/// /price-tables?model_id=                           list tables for a model (GET)
///
/// /brands                                           list brands (GET)
/// /brands/{id}/models                               list a brand's models (GET)
///
/// /admin/price-tables/import                        spreadsheet upload (POST)
/// /admin/price-tables/sync                          backfill missing tables (POST)
///
/// /admin/condition-grades/import?device=            spreadsheet upload (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/pricing", pricing::router())
        .nest("/price-tables", price_tables::router())
        .nest("/brands", catalog::router())
        .nest("/admin/price-tables", price_tables::admin_router())
        .nest("/admin/condition-grades", condition_grades::router())
}
