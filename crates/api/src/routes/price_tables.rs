//! Route definitions for price tables.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::price_tables;
use crate::state::AppState;

/// Routes mounted at `/price-tables`.
///
/// ```text
/// GET /?model_id=   -> list_price_tables
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(price_tables::list_price_tables))
}

/// Routes mounted at `/admin/price-tables`.
///
/// ```text
/// POST /import      -> import_price_tables
/// POST /sync        -> sync_price_tables
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/import", post(price_tables::import_price_tables))
        .route("/sync", post(price_tables::sync_price_tables))
}
