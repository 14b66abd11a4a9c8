use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use comptoir_service::{Mutation as MutationCore, Query as QueryCore};
use entity::bill;

use super::DocumentListParams;
use crate::dto::{BillDetail, BillRequest, StatusBody};
use crate::error::ApiError;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> Result<Json<Vec<bill::Model>>, ApiError> {
    Ok(Json(
        QueryCore::list_bills(&state.db, params.q.as_deref(), params.status).await?,
    ))
}

/// Derives a bill from a quotation, copying its lines. A second bill
/// for the same quotation is refused.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<BillRequest>,
) -> Result<(StatusCode, Json<BillDetail>), ApiError> {
    let contents = MutationCore::bill_quotation(&state.db, body.quotation_id).await?;
    Ok((StatusCode::CREATED, Json(contents.into())))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BillDetail>, ApiError> {
    let contents = QueryCore::load_bill(&state.db, id).await?;
    Ok(Json(contents.into()))
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Result<Json<bill::Model>, ApiError> {
    Ok(Json(
        MutationCore::set_bill_status(&state.db, id, body.status).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    MutationCore::delete_bill(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
