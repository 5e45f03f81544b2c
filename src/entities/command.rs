use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Delivery state of a command.
///
/// The UI drives these forward (NOT_DELIVERED -> DELIVERED -> GOT_PROFIT) but
/// the API accepts any assignment. Entering a state that entails stock
/// withdrawal marks every linked product unavailable; leaving one does not
/// restock.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    #[sea_orm(string_value = "NOT_DELIVERED")]
    NotDelivered,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "GOT_PROFIT")]
    GotProfit,
}

impl CommandStatus {
    /// Whether assigning this status removes the linked products from
    /// sellable stock.
    pub fn entails_stock_withdrawal(self) -> bool {
        matches!(self, Self::Delivered | Self::GotProfit)
    }
}

impl Default for CommandStatus {
    fn default() -> Self {
        Self::NotDelivered
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_count: i32,
    pub sale_price: Decimal,
    pub purchase_price: Decimal,
    pub status: CommandStatus,
    pub delivery_address: String,
    pub delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::command_detail::Entity")]
    Details,
}

impl Related<super::command_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_delivered_states_withdraw_stock() {
        assert!(!CommandStatus::NotDelivered.entails_stock_withdrawal());
        assert!(CommandStatus::Delivered.entails_stock_withdrawal());
        assert!(CommandStatus::GotProfit.entails_stock_withdrawal());
    }

    #[test]
    fn status_round_trips_through_serde() {
        let json = serde_json::to_string(&CommandStatus::GotProfit).unwrap();
        assert_eq!(json, "\"GOT_PROFIT\"");
        let back: CommandStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CommandStatus::GotProfit);
    }
}
