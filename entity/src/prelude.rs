pub use super::bill::Entity as Bill;
pub use super::bill_line::Entity as BillLine;
pub use super::customer::Entity as Customer;
pub use super::product::Entity as Product;
pub use super::quotation::Entity as Quotation;
pub use super::quotation_line::Entity as QuotationLine;
