use ::entity::prelude::*;
use ::entity::sea_orm_active_enums::Status;
use ::entity::{bill, bill_line, customer, product, quotation, quotation_line};
use sea_orm::*;

use crate::error::ServiceError;
use crate::totals::QuotationTotals;

/// A quotation joined with everything needed to price and render it.
#[derive(Debug, Clone)]
pub struct QuotationContents {
    pub quotation: quotation::Model,
    pub customer: customer::Model,
    pub lines: Vec<(quotation_line::Model, product::Model)>,
}

impl QuotationContents {
    pub fn totals(&self) -> QuotationTotals {
        QuotationTotals::from_lines(
            self.lines
                .iter()
                .map(|(line, product)| (line.quantity, product.price)),
        )
    }
}

/// A bill joined with its source quotation, customer and lines.
#[derive(Debug, Clone)]
pub struct BillContents {
    pub bill: bill::Model,
    pub quotation: quotation::Model,
    pub customer: customer::Model,
    pub lines: Vec<(bill_line::Model, product::Model)>,
}

impl BillContents {
    pub fn totals(&self) -> QuotationTotals {
        QuotationTotals::from_lines(
            self.lines
                .iter()
                .map(|(line, product)| (line.quantity, product.price)),
        )
    }
}

pub struct Query;

impl Query {
    /// Lists customers, optionally narrowed by a case-sensitive
    /// substring match over first name, last name, zipcode and
    /// business.
    pub async fn list_customers(
        db: &DbConn,
        term: Option<&str>,
    ) -> Result<Vec<customer::Model>, DbErr> {
        let mut select = Customer::find().order_by_asc(customer::Column::Id);
        if let Some(term) = nonempty(term) {
            select = select.filter(customer_term_filter(term));
        }
        select.all(db).await
    }

    pub async fn find_customer_by_slug(
        db: &DbConn,
        slug: &str,
    ) -> Result<Option<customer::Model>, DbErr> {
        Customer::find()
            .filter(customer::Column::Slug.eq(slug))
            .one(db)
            .await
    }

    pub async fn list_products(
        db: &DbConn,
        term: Option<&str>,
    ) -> Result<Vec<product::Model>, DbErr> {
        let mut select = Product::find().order_by_asc(product::Column::Id);
        if let Some(term) = nonempty(term) {
            select = select.filter(
                Condition::any()
                    .add(product::Column::Name.contains(term))
                    .add(product::Column::Code.contains(term)),
            );
        }
        select.all(db).await
    }

    pub async fn find_product_by_code(
        db: &DbConn,
        code: &str,
    ) -> Result<Option<product::Model>, DbErr> {
        Product::find()
            .filter(product::Column::Code.eq(code))
            .one(db)
            .await
    }

    /// Lists quotations. The filter applies only when both `term` and
    /// `status` are given: status must match exactly and the term
    /// substring-matches the owning customer. A lone parameter returns
    /// the full set; an empty term counts as given and matches every
    /// customer, leaving the status filter in effect.
    pub async fn list_quotations(
        db: &DbConn,
        term: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<quotation::Model>, DbErr> {
        let mut select = Quotation::find().order_by_asc(quotation::Column::Id);
        if let (Some(term), Some(status)) = (term, status) {
            select = select
                .inner_join(Customer)
                .filter(quotation::Column::Status.eq(status))
                .filter(customer_term_filter(term));
        }
        select.all(db).await
    }

    /// Lists bills under the same both-or-nothing filter policy as
    /// [`Query::list_quotations`]; the customer is reached through the
    /// billed quotation.
    pub async fn list_bills(
        db: &DbConn,
        term: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<bill::Model>, DbErr> {
        let mut select = Bill::find().order_by_asc(bill::Column::Id);
        if let (Some(term), Some(status)) = (term, status) {
            select = select
                .inner_join(Quotation)
                .join(JoinType::InnerJoin, quotation::Relation::Customer.def())
                .filter(bill::Column::Status.eq(status))
                .filter(customer_term_filter(term));
        }
        select.all(db).await
    }

    /// Loads a quotation with its customer and its lines joined to
    /// their products.
    pub async fn load_quotation(db: &DbConn, id: i32) -> Result<QuotationContents, ServiceError> {
        let found = Quotation::find_by_id(id)
            .find_also_related(Customer)
            .one(db)
            .await?;
        let Some((quotation, Some(customer))) = found else {
            return Err(ServiceError::NotFound("quotation"));
        };
        let lines = lines_with_products(
            quotation
                .find_related(QuotationLine)
                .find_also_related(Product)
                .order_by_asc(quotation_line::Column::Id)
                .all(db)
                .await?,
        )?;
        Ok(QuotationContents {
            quotation,
            customer,
            lines,
        })
    }

    /// Loads a bill with its source quotation, the customer and the
    /// billed lines joined to their products.
    pub async fn load_bill(db: &DbConn, id: i32) -> Result<BillContents, ServiceError> {
        let found = Bill::find_by_id(id)
            .find_also_related(Quotation)
            .one(db)
            .await?;
        let Some((bill, Some(quotation))) = found else {
            return Err(ServiceError::NotFound("bill"));
        };
        let Some(customer) = quotation.find_related(Customer).one(db).await? else {
            return Err(ServiceError::NotFound("customer"));
        };
        let lines = lines_with_products(
            bill.find_related(BillLine)
                .find_also_related(Product)
                .order_by_asc(bill_line::Column::Id)
                .all(db)
                .await?,
        )?;
        Ok(BillContents {
            bill,
            quotation,
            customer,
            lines,
        })
    }
}

/// Treats an empty search term as no term at all.
fn nonempty(term: Option<&str>) -> Option<&str> {
    term.filter(|term| !term.is_empty())
}

fn customer_term_filter(term: &str) -> Condition {
    Condition::any()
        .add(customer::Column::FirstName.contains(term))
        .add(customer::Column::LastName.contains(term))
        .add(customer::Column::Zipcode.contains(term))
        .add(customer::Column::Business.contains(term))
}

fn lines_with_products<L>(
    rows: Vec<(L, Option<product::Model>)>,
) -> Result<Vec<(L, product::Model)>, ServiceError> {
    let mut lines = Vec::with_capacity(rows.len());
    for (line, product) in rows {
        let Some(product) = product else {
            return Err(ServiceError::NotFound("product"));
        };
        lines.push((line, product));
    }
    Ok(lines)
}
