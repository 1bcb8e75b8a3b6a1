//! Handlers for quoting and classifying devices.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tradein_core::classification::{classify, Classification};
use tradein_core::device::DeviceKind;
use tradein_core::pricing::{self, PriceQuote, PricingRequest};
use tradein_core::questionnaire::QuestionnairePayload;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/pricing/quote
///
/// Grade the questionnaire and price the configuration.
pub async fn quote(
    State(state): State<AppState>,
    Json(input): Json<PricingRequest>,
) -> AppResult<Json<DataResponse<PriceQuote>>> {
    let quote = pricing::quote(&state.store(), &input).await?;

    tracing::info!(
        model_id = input.model_id,
        storage = %input.storage,
        grade = %quote.grade,
        price = ?quote.price,
        "Quote resolved"
    );

    Ok(Json(DataResponse { data: quote }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    #[serde(default)]
    pub device_type: DeviceKind,
    #[serde(default)]
    pub questionnaire: QuestionnairePayload,
}

/// POST /api/v1/pricing/classify
///
/// Codes only; nothing is read from the database.
pub async fn classify_answers(
    Json(input): Json<ClassifyRequest>,
) -> Json<DataResponse<Classification>> {
    let classification = classify(input.device_type, &input.questionnaire.answers());
    Json(DataResponse {
        data: classification,
    })
}
