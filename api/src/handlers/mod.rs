use axum::Json;
use entity::sea_orm_active_enums::Status;
use serde::Deserialize;
use serde_json::{json, Value};

pub mod bills;
pub mod customers;
pub mod products;
pub mod quotations;

/// `?q=` free-text filter of the customer and product lists.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

/// `?q=&status=` filter of the quotation and bill lists. Both
/// parameters must be present for the filter to apply.
#[derive(Debug, Deserialize)]
pub struct DocumentListParams {
    pub q: Option<String>,
    pub status: Option<Status>,
}

/// `GET /` service banner.
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "comptoir",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
