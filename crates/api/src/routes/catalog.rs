//! Route definitions for the brand and model catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/brands`.
///
/// ```text
/// GET /                 -> list_brands
/// GET /{id}/models      -> list_brand_models
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_brands))
        .route("/{id}/models", get(catalog::list_brand_models))
}
