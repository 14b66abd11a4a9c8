use ::entity::prelude::*;
use ::entity::sea_orm_active_enums::Status;
use ::entity::{bill, bill_line, customer, product, quotation, quotation_line};
use chrono::Utc;
use sea_orm::*;
use tracing::info;

use crate::error::ServiceError;
use crate::input::{CustomerInput, ProductInput, ProductUpdate, QuotationInput, QuotationLineInput};
use crate::query::{BillContents, Query, QuotationContents};
use crate::util::slugify;

pub struct Mutation;

impl Mutation {
    /// Creates a customer. The slug is derived from the business and
    /// contact names at creation and never changes afterwards.
    pub async fn create_customer(
        db: &DbConn,
        input: CustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;
        let slug = slugify(&format!(
            "{} {} {}",
            input.business, input.first_name, input.last_name
        ));
        if slug.is_empty() {
            return Err(ServiceError::validation(
                "business and contact names must contain at least one alphanumeric character",
            ));
        }
        if Query::find_customer_by_slug(db, &slug).await?.is_some() {
            return Err(ServiceError::validation(format!(
                "a customer with slug '{slug}' already exists"
            )));
        }
        if account_taken(db, input.account_id).await? {
            return Err(ServiceError::validation(format!(
                "account_id {} is already linked to a customer",
                input.account_id
            )));
        }
        let created = customer::ActiveModel {
            slug: Set(slug),
            business: Set(input.business),
            siren: Set(input.siren),
            logo: Set(input.logo),
            address: Set(input.address),
            zipcode: Set(input.zipcode),
            city: Set(input.city),
            country: Set(input.country),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            account_id: Set(input.account_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(customer = created.id, slug = %created.slug, "created customer");
        Ok(created)
    }

    /// Replaces a customer's fields. The slug stays what it was at
    /// creation so URLs remain stable.
    pub async fn update_customer(
        db: &DbConn,
        slug: &str,
        input: CustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;
        let Some(existing) = Query::find_customer_by_slug(db, slug).await? else {
            return Err(ServiceError::NotFound("customer"));
        };
        if input.account_id != existing.account_id && account_taken(db, input.account_id).await? {
            return Err(ServiceError::validation(format!(
                "account_id {} is already linked to a customer",
                input.account_id
            )));
        }
        let mut model: customer::ActiveModel = existing.into();
        model.business = Set(input.business);
        model.siren = Set(input.siren);
        model.logo = Set(input.logo);
        model.address = Set(input.address);
        model.zipcode = Set(input.zipcode);
        model.city = Set(input.city);
        model.country = Set(input.country);
        model.first_name = Set(input.first_name);
        model.last_name = Set(input.last_name);
        model.email = Set(input.email);
        model.account_id = Set(input.account_id);
        Ok(model.update(db).await?)
    }

    pub async fn delete_customer(db: &DbConn, slug: &str) -> Result<(), ServiceError> {
        let Some(existing) = Query::find_customer_by_slug(db, slug).await? else {
            return Err(ServiceError::NotFound("customer"));
        };
        let id = existing.id;
        existing.delete(db).await?;
        info!(customer = id, "deleted customer");
        Ok(())
    }

    pub async fn create_product(
        db: &DbConn,
        input: ProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        if Query::find_product_by_code(db, &input.code).await?.is_some() {
            return Err(ServiceError::validation(format!(
                "product code '{}' is already in use",
                input.code
            )));
        }
        let created = product::ActiveModel {
            code: Set(input.code),
            name: Set(input.name),
            description: Set(input.description),
            short_desc: Set(input.short_desc),
            picture: Set(input.picture),
            price: Set(input.price),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(product = created.id, code = %created.code, "created product");
        Ok(created)
    }

    /// Replaces a product's fields. The code is the product's external
    /// identifier and cannot change.
    pub async fn update_product(
        db: &DbConn,
        code: &str,
        input: ProductUpdate,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let Some(existing) = Query::find_product_by_code(db, code).await? else {
            return Err(ServiceError::NotFound("product"));
        };
        let mut model: product::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.description = Set(input.description);
        model.short_desc = Set(input.short_desc);
        model.picture = Set(input.picture);
        model.price = Set(input.price);
        Ok(model.update(db).await?)
    }

    pub async fn delete_product(db: &DbConn, code: &str) -> Result<(), ServiceError> {
        let Some(existing) = Query::find_product_by_code(db, code).await? else {
            return Err(ServiceError::NotFound("product"));
        };
        let id = existing.id;
        existing.delete(db).await?;
        info!(product = id, "deleted product");
        Ok(())
    }

    /// Creates a quotation together with its lines in one transaction.
    /// A line naming an unknown product rolls the whole creation back.
    pub async fn create_quotation(
        db: &DbConn,
        input: QuotationInput,
    ) -> Result<QuotationContents, ServiceError> {
        input.validate()?;
        let txn = db.begin().await?;
        let Some(customer) = Customer::find_by_id(input.customer_id).one(&txn).await? else {
            return Err(ServiceError::validation(format!(
                "unknown customer id {}",
                input.customer_id
            )));
        };
        let quotation = quotation::ActiveModel {
            date: Set(Utc::now().naive_utc()),
            status: Set(input.status.unwrap_or(Status::AwaitingPayment)),
            customer_id: Set(customer.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            lines.push(insert_line(&txn, quotation.id, line).await?);
        }
        txn.commit().await?;
        info!(
            quotation = quotation.id,
            customer = customer.id,
            lines = lines.len(),
            "created quotation"
        );
        Ok(QuotationContents {
            quotation,
            customer,
            lines,
        })
    }

    /// Appends a line to an existing quotation. Any bill derived
    /// beforehand keeps its snapshot.
    pub async fn add_quotation_line(
        db: &DbConn,
        quotation_id: i32,
        input: QuotationLineInput,
    ) -> Result<(quotation_line::Model, product::Model), ServiceError> {
        input.validate()?;
        if Quotation::find_by_id(quotation_id).one(db).await?.is_none() {
            return Err(ServiceError::NotFound("quotation"));
        }
        insert_line(db, quotation_id, &input).await
    }

    pub async fn set_quotation_status(
        db: &DbConn,
        id: i32,
        status: Status,
    ) -> Result<quotation::Model, ServiceError> {
        let Some(existing) = Quotation::find_by_id(id).one(db).await? else {
            return Err(ServiceError::NotFound("quotation"));
        };
        let mut model: quotation::ActiveModel = existing.into();
        model.status = Set(status);
        Ok(model.update(db).await?)
    }

    pub async fn delete_quotation(db: &DbConn, id: i32) -> Result<(), ServiceError> {
        let Some(existing) = Quotation::find_by_id(id).one(db).await? else {
            return Err(ServiceError::NotFound("quotation"));
        };
        existing.delete(db).await?;
        info!(quotation = id, "deleted quotation");
        Ok(())
    }

    /// Derives a bill from a quotation: one bill row plus a verbatim
    /// copy of every quotation line, all in one transaction. At most
    /// one bill may exist per quotation; the in-transaction check and
    /// the unique index on the bill table together rule out a second
    /// one.
    pub async fn bill_quotation(
        db: &DbConn,
        quotation_id: i32,
    ) -> Result<BillContents, ServiceError> {
        let txn = db.begin().await?;
        let Some(quotation) = Quotation::find_by_id(quotation_id).one(&txn).await? else {
            return Err(ServiceError::NotFound("quotation"));
        };
        if quotation.find_related(Bill).one(&txn).await?.is_some() {
            return Err(ServiceError::AlreadyBilled(quotation.id));
        }
        // A concurrent billing can slip past the check above; the
        // unique index stops its insert, reported as the same conflict.
        let bill = match (bill::ActiveModel {
            date: Set(Utc::now().naive_utc()),
            status: Set(Status::AwaitingSettlement),
            quotation_id: Set(quotation.id),
            ..Default::default()
        })
        .insert(&txn)
        .await
        {
            Ok(bill) => bill,
            Err(err) => {
                return Err(match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        ServiceError::AlreadyBilled(quotation.id)
                    }
                    _ => err.into(),
                });
            }
        };
        let quotation_lines = quotation
            .find_related(QuotationLine)
            .order_by_asc(quotation_line::Column::Id)
            .all(&txn)
            .await?;
        let copied = quotation_lines.len();
        for line in quotation_lines {
            bill_line::ActiveModel {
                bill_id: Set(bill.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        info!(
            bill = bill.id,
            quotation = quotation.id,
            lines = copied,
            "derived bill from quotation"
        );
        Query::load_bill(db, bill.id).await
    }

    pub async fn set_bill_status(
        db: &DbConn,
        id: i32,
        status: Status,
    ) -> Result<bill::Model, ServiceError> {
        let Some(existing) = Bill::find_by_id(id).one(db).await? else {
            return Err(ServiceError::NotFound("bill"));
        };
        let mut model: bill::ActiveModel = existing.into();
        model.status = Set(status);
        Ok(model.update(db).await?)
    }

    pub async fn delete_bill(db: &DbConn, id: i32) -> Result<(), ServiceError> {
        let Some(existing) = Bill::find_by_id(id).one(db).await? else {
            return Err(ServiceError::NotFound("bill"));
        };
        existing.delete(db).await?;
        info!(bill = id, "deleted bill");
        Ok(())
    }
}

async fn account_taken(db: &DbConn, account_id: i64) -> Result<bool, DbErr> {
    let count = Customer::find()
        .filter(customer::Column::AccountId.eq(account_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

async fn insert_line<C: ConnectionTrait>(
    conn: &C,
    quotation_id: i32,
    input: &QuotationLineInput,
) -> Result<(quotation_line::Model, product::Model), ServiceError> {
    let Some(product) = Product::find()
        .filter(product::Column::Code.eq(input.product_code.as_str()))
        .one(conn)
        .await?
    else {
        return Err(ServiceError::validation(format!(
            "unknown product code '{}'",
            input.product_code
        )));
    };
    let line = quotation_line::ActiveModel {
        quotation_id: Set(quotation_id),
        product_id: Set(product.id),
        quantity: Set(input.quantity),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok((line, product))
}
