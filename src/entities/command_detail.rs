use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a command: a product bought by a client, optionally sourced
/// from a co-client.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "command_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub command_id: Uuid,
    pub product_id: Uuid,
    pub client_id: Uuid,
    pub co_client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::command::Entity",
        from = "Column::CommandId",
        to = "super::command::Column::Id",
        on_delete = "Cascade"
    )]
    Command,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::co_client::Entity",
        from = "Column::CoClientId",
        to = "super::co_client::Column::Id"
    )]
    CoClient,
}

impl Related<super::command::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Command.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::co_client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoClient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
