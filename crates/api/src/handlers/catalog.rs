//! Handlers for brands and their device models.

use axum::extract::{Path, State};
use axum::Json;
use tradein_core::catalog::{CatalogBrand, CatalogModel};
use tradein_core::error::CoreError;
use tradein_core::types::DbId;
use tradein_db::repositories::{BrandRepo, DeviceModelRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/brands
pub async fn list_brands(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CatalogBrand>>>> {
    let brands = BrandRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: brands.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/v1/brands/{id}/models
pub async fn list_brand_models(
    State(state): State<AppState>,
    Path(brand_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CatalogModel>>>> {
    BrandRepo::find_by_id(&state.pool, brand_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Brand",
            key: brand_id.to_string(),
        })?;

    let models = DeviceModelRepo::list_by_brand(&state.pool, brand_id).await?;
    Ok(Json(DataResponse {
        data: models.into_iter().map(Into::into).collect(),
    }))
}
