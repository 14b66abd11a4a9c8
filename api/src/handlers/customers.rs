use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use comptoir_service::{CustomerInput, Mutation as MutationCore, Query as QueryCore};
use entity::customer;

use super::ListParams;
use crate::error::ApiError;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<customer::Model>>, ApiError> {
    Ok(Json(
        QueryCore::list_customers(&state.db, params.q.as_deref()).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<customer::Model>), ApiError> {
    let created = MutationCore::create_customer(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<customer::Model>, ApiError> {
    let Some(found) = QueryCore::find_customer_by_slug(&state.db, &slug).await? else {
        return Err(ApiError::not_found("customer"));
    };
    Ok(Json(found))
}

pub async fn update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<customer::Model>, ApiError> {
    Ok(Json(
        MutationCore::update_customer(&state.db, &slug, input).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    MutationCore::delete_customer(&state.db, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
