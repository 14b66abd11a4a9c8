use chrono::NaiveDateTime;
use comptoir_service::{BillContents, QuotationContents, QuotationTotals};
use entity::sea_orm_active_enums::Status;
use entity::{customer, product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One priced document line, for quotations and bills alike.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentLine {
    pub id: i32,
    pub product_code: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl DocumentLine {
    pub(crate) fn new(id: i32, quantity: i32, product: &product::Model) -> Self {
        let line_total = (product.price * Decimal::from(quantity)).normalize();
        Self {
            id,
            product_code: product.code.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price.normalize(),
            line_total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuotationDetail {
    pub id: i32,
    pub date: NaiveDateTime,
    pub status: Status,
    pub customer: customer::Model,
    pub lines: Vec<DocumentLine>,
    #[serde(flatten)]
    pub totals: QuotationTotals,
}

impl From<QuotationContents> for QuotationDetail {
    fn from(contents: QuotationContents) -> Self {
        let totals = contents.totals();
        Self {
            id: contents.quotation.id,
            date: contents.quotation.date,
            status: contents.quotation.status,
            lines: contents
                .lines
                .iter()
                .map(|(line, product)| DocumentLine::new(line.id, line.quantity, product))
                .collect(),
            customer: contents.customer,
            totals,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillDetail {
    pub id: i32,
    pub date: NaiveDateTime,
    pub status: Status,
    pub quotation_id: i32,
    pub customer: customer::Model,
    pub lines: Vec<DocumentLine>,
    #[serde(flatten)]
    pub totals: QuotationTotals,
}

impl From<BillContents> for BillDetail {
    fn from(contents: BillContents) -> Self {
        let totals = contents.totals();
        Self {
            id: contents.bill.id,
            date: contents.bill.date,
            status: contents.bill.status,
            quotation_id: contents.bill.quotation_id,
            lines: contents
                .lines
                .iter()
                .map(|(line, product)| DocumentLine::new(line.id, line.quantity, product))
                .collect(),
            customer: contents.customer,
            totals,
        }
    }
}

/// Body of the status update endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: Status,
}

/// Body of `POST /bills`.
#[derive(Debug, Deserialize)]
pub struct BillRequest {
    pub quotation_id: i32,
}
