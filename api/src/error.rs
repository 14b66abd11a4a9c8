use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use comptoir_service::ServiceError;
use sea_orm::DbErr;
use serde_json::json;

use crate::mailer::MailError;

/// Error envelope every handler returns: an HTTP status plus an
/// `{"error": "..."}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn not_found(entity: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{entity} not found"),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::AlreadyBilled(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Render(_) | ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &err {
            // Database detail stays in the log, not in the response.
            ServiceError::Db(inner) => {
                tracing::error!(error = %inner, "database error");
                "internal error".to_owned()
            }
            ServiceError::Render(_) => {
                tracing::error!(error = %err, "render error");
                err.to_string()
            }
            _ => err.to_string(),
        };
        Self { status, message }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        ServiceError::Db(err).into()
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        tracing::error!(error = %err, "could not queue email");
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
