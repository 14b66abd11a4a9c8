use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comptoir_service::{
    quotation_filename, render_quotation_pdf, Mutation as MutationCore, Query as QueryCore,
    QuotationInput, QuotationLineInput,
};
use entity::quotation;
use tera::Context;
use tracing::error;

use super::DocumentListParams;
use crate::dto::{DocumentLine, QuotationDetail, StatusBody};
use crate::error::ApiError;
use crate::mailer::quotation_message;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> Result<Json<Vec<quotation::Model>>, ApiError> {
    Ok(Json(
        QueryCore::list_quotations(&state.db, params.q.as_deref(), params.status).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<QuotationInput>,
) -> Result<(StatusCode, Json<QuotationDetail>), ApiError> {
    let contents = MutationCore::create_quotation(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(contents.into())))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<QuotationDetail>, ApiError> {
    let contents = QueryCore::load_quotation(&state.db, id).await?;
    Ok(Json(contents.into()))
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Result<Json<quotation::Model>, ApiError> {
    Ok(Json(
        MutationCore::set_quotation_status(&state.db, id, body.status).await?,
    ))
}

pub async fn add_line(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<QuotationLineInput>,
) -> Result<(StatusCode, Json<DocumentLine>), ApiError> {
    let (line, product) = MutationCore::add_quotation_line(&state.db, id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DocumentLine::new(line.id, line.quantity, &product)),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    MutationCore::delete_quotation(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Renders the quotation as a PDF, queues a copy for email to the
/// customer and returns the document as an attachment download.
pub async fn export_pdf(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let contents = QueryCore::load_quotation(&state.db, id).await?;
    let pdf = render_quotation_pdf(&contents)?;
    let filename = quotation_filename(&contents);

    let mut context = Context::new();
    context.insert("customer", &contents.customer);
    context.insert("quotation_id", &contents.quotation.id);
    context.insert(
        "date",
        &contents.quotation.date.format("%Y-%m-%d %H:%M").to_string(),
    );
    context.insert("totals", &contents.totals());
    let body = state
        .templates
        .render("quotation_email.txt.tera", &context)
        .map_err(|err| {
            error!(error = %err, "email template rendering failed");
            ApiError::internal("internal error")
        })?;

    let message = quotation_message(&state.mail_from, &contents, body, pdf.clone(), &filename)
        .map_err(|err| {
            error!(error = %err, "could not build quotation email");
            ApiError::internal("internal error")
        })?;
    state.mailer.enqueue(message)?;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        pdf,
    ))
}
