use super::sea_orm_active_enums::Status;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bill")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: DateTime,
    pub status: Status,
    /// At most one bill per quotation; the unique index is the guard
    /// against double billing.
    #[sea_orm(unique)]
    pub quotation_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotation::Entity",
        from = "Column::QuotationId",
        to = "super::quotation::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Quotation,
    #[sea_orm(has_many = "super::bill_line::Entity")]
    BillLine,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotation.def()
    }
}

impl Related<super::bill_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
