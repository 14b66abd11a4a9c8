use entity::sea_orm_active_enums::Status;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ServiceError;

/// SIREN registration numbers carry at most 14 digits.
const SIREN_MAX: i64 = 99_999_999_999_999;

const CODE_MAX_LEN: usize = 64;

fn require(field: &'static str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), ServiceError> {
    let ok = matches!(
        value.split_once('@'),
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    );
    if !ok {
        return Err(ServiceError::validation("email must be a valid address"));
    }
    Ok(())
}

/// Customer fields as accepted on create and full update. The slug is
/// derived server-side and never part of the input.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    pub business: String,
    pub siren: i64,
    #[serde(default)]
    pub logo: Option<String>,
    pub address: String,
    pub zipcode: String,
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub account_id: i64,
}

impl CustomerInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require("business", &self.business)?;
        require("address", &self.address)?;
        require("zipcode", &self.zipcode)?;
        require("city", &self.city)?;
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        require_email(&self.email)?;
        if !(1..=SIREN_MAX).contains(&self.siren) {
            return Err(ServiceError::validation(
                "siren must be a positive number of at most 14 digits",
            ));
        }
        if self.account_id <= 0 {
            return Err(ServiceError::validation("account_id must be positive"));
        }
        Ok(())
    }
}

/// Product fields accepted on create. The code is the product's
/// external identifier and is fixed once created.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub code: String,
    pub name: String,
    pub description: String,
    pub short_desc: String,
    pub picture: String,
    pub price: Decimal,
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_code(&self.code)?;
        validate_product_fields(
            &self.name,
            &self.description,
            &self.short_desc,
            &self.picture,
            self.price,
        )
    }
}

/// Updatable product fields; everything but the code.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub short_desc: String,
    pub picture: String,
    pub price: Decimal,
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_product_fields(
            &self.name,
            &self.description,
            &self.short_desc,
            &self.picture,
            self.price,
        )
    }
}

fn validate_product_fields(
    name: &str,
    description: &str,
    short_desc: &str,
    picture: &str,
    price: Decimal,
) -> Result<(), ServiceError> {
    require("name", name)?;
    require("description", description)?;
    require("short_desc", short_desc)?;
    require("picture", picture)?;
    if price.is_sign_negative() {
        return Err(ServiceError::validation("price must not be negative"));
    }
    Ok(())
}

fn validate_code(code: &str) -> Result<(), ServiceError> {
    require("code", code)?;
    if code.len() > CODE_MAX_LEN {
        return Err(ServiceError::validation(format!(
            "code must be at most {CODE_MAX_LEN} characters"
        )));
    }
    if !code
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(ServiceError::validation(
            "code may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

/// A quotation created in one shot with its line items.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotationInput {
    pub customer_id: i32,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub lines: Vec<QuotationLineInput>,
}

impl QuotationInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.customer_id <= 0 {
            return Err(ServiceError::validation("customer_id must be positive"));
        }
        for line in &self.lines {
            line.validate()?;
        }
        Ok(())
    }
}

/// One line item: a product referenced by its code, and a quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotationLineInput {
    pub product_code: String,
    pub quantity: i32,
}

impl QuotationLineInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require("product_code", &self.product_code)?;
        if self.quantity < 1 {
            return Err(ServiceError::validation("quantity must be at least 1"));
        }
        Ok(())
    }
}
