use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable article, either owned stock or consigned (depot) goods.
///
/// `gain` is denormalized: it is recomputed by the product service whenever a
/// priced attribute changes, never read back from client input.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sale_price: Decimal,
    /// Absent for consigned products; the shop never bought them.
    pub purchase_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub is_consigned: bool,
    /// Share of the sale price owed to the shop, 0-100. Only meaningful when
    /// `is_consigned` is true.
    pub consignment_percent: Option<Decimal>,
    pub surcharge: Decimal,
    pub gain: Decimal,
    pub is_available: bool,
    pub category_id: Uuid,
    pub co_client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::co_client::Entity",
        from = "Column::CoClientId",
        to = "super::co_client::Column::Id"
    )]
    CoClient,
    #[sea_orm(has_many = "super::product_photo::Entity")]
    Photos,
    #[sea_orm(has_many = "super::command_detail::Entity")]
    CommandDetails,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::co_client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoClient.def()
    }
}

impl Related<super::product_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl Related<super::command_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommandDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
