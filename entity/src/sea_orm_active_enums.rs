use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle vocabulary shared by quotations and bills. Stored as plain
/// strings; filtering compares whole values, never substrings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "awaiting_payment")]
    AwaitingPayment,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "awaiting_settlement")]
    AwaitingSettlement,
    #[sea_orm(string_value = "settled")]
    Settled,
}
