use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use comptoir_service::{Mutation as MutationCore, ProductInput, ProductUpdate, Query as QueryCore};
use entity::product;

use super::ListParams;
use crate::error::ApiError;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<product::Model>>, ApiError> {
    Ok(Json(
        QueryCore::list_products(&state.db, params.q.as_deref()).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<product::Model>), ApiError> {
    let created = MutationCore::create_product(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<product::Model>, ApiError> {
    let Some(found) = QueryCore::find_product_by_code(&state.db, &code).await? else {
        return Err(ApiError::not_found("product"));
    };
    Ok(Json(found))
}

pub async fn update(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<ProductUpdate>,
) -> Result<Json<product::Model>, ApiError> {
    Ok(Json(
        MutationCore::update_product(&state.db, &code, input).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    MutationCore::delete_product(&state.db, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}
