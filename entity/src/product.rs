use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// External identifier; products are addressed by code, not by id.
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub short_desc: String,
    pub picture: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quotation_line::Entity")]
    QuotationLine,
    #[sea_orm(has_many = "super::bill_line::Entity")]
    BillLine,
}

impl Related<super::quotation_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationLine.def()
    }
}

impl Related<super::bill_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
