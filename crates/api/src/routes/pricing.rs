//! Route definitions for quoting.

use axum::routing::post;
use axum::Router;

use crate::handlers::pricing;
use crate::state::AppState;

/// Routes mounted at `/pricing`.
///
/// ```text
/// POST /quote       -> quote
/// POST /classify    -> classify_answers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(pricing::quote))
        .route("/classify", post(pricing::classify_answers))
}
