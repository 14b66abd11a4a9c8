pub mod prelude;

pub mod bill;
pub mod bill_line;
pub mod customer;
pub mod product;
pub mod quotation;
pub mod quotation_line;
pub mod sea_orm_active_enums;
