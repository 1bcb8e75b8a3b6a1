//! End-to-end quote: questionnaire → codes → grade → price.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::classification::{classify, Classification};
use crate::condition::resolve_condition_grade;
use crate::device::DeviceKind;
use crate::error::CoreError;
use crate::grade::Grade;
use crate::price_table::{normalize_ram, resolve_price};
use crate::questionnaire::QuestionnairePayload;
use crate::store::{ConditionGradeStore, PriceTableStore};
use crate::types::DbId;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    #[validate(range(min = 1, message = "modelId must be positive"))]
    pub model_id: DbId,
    #[validate(length(min = 1, message = "storage is required"))]
    pub storage: String,
    #[serde(default)]
    pub ram: Option<String>,
    #[serde(default)]
    pub device_type: DeviceKind,
    #[serde(default)]
    pub questionnaire: QuestionnairePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub grade: Grade,
    pub price: Option<f64>,
    pub price_table_id: DbId,
    pub condition: Classification,
}

/// Grade the device and price it.
pub async fn quote<S>(store: &S, request: &PricingRequest) -> Result<PriceQuote, CoreError>
where
    S: ConditionGradeStore + PriceTableStore,
{
    request.validate()?;
    let storage = request.storage.trim();
    if storage.is_empty() {
        return Err(CoreError::Validation("storage is required".to_string()));
    }
    let ram = normalize_ram(request.ram.as_deref());

    let classification = classify(request.device_type, &request.questionnaire.answers());
    let grade =
        resolve_condition_grade(store, classification.shape, &classification.codes).await?;
    let resolved = resolve_price(store, request.model_id, storage, ram.as_deref(), grade).await?;

    Ok(PriceQuote {
        grade,
        price: resolved.price,
        price_table_id: resolved.price_table_id,
        condition: classification,
    })
}
