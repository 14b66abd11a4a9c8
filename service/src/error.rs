use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced by the query and mutation layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed record does not exist. Carries the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The quotation already has a bill attached.
    #[error("quotation {0} already has a bill")]
    AlreadyBilled(i32),

    /// Input failed a validation rule.
    #[error("{0}")]
    Validation(String),

    /// The document renderer could not produce output.
    #[error("document rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
