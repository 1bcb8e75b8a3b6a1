use axum::routing::post;
use axum::Router;

use crate::handlers::condition_grades;
use crate::state::AppState;

/// Routes mounted at `/admin/condition-grades`.
pub fn router() -> Router<AppState> {
    Router::new().route("/import", post(condition_grades::import_condition_grades))
}
