use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::db::DbPool;
use crate::entities::{client, co_client, command, command_detail, product, CommandStatus};
use crate::errors::ServiceError;
use crate::{default_limit, default_page, page_window, PaginatedResponse};

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("price fields must not be negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommand {
    #[validate(range(min = 1, message = "Product count must be at least 1"))]
    pub product_count: i32,
    #[validate(custom = "validate_non_negative")]
    pub sale_price: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub purchase_price: Decimal,
    #[validate(length(min = 1, message = "At least one product is required"))]
    pub product_ids: Vec<Uuid>,
    pub client_id: Uuid,
    pub co_client_id: Option<Uuid>,
    pub status: Option<CommandStatus>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Delivery address is required"))]
    pub delivery_address: String,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCommand {
    #[validate(range(min = 1, message = "Product count must be at least 1"))]
    pub product_count: Option<i32>,
    #[validate(custom = "validate_non_negative")]
    pub sale_price: Option<Decimal>,
    #[validate(custom = "validate_non_negative")]
    pub purchase_price: Option<Decimal>,
    pub status: Option<CommandStatus>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub delivery_address: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCommandsParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search over the delivery address
    pub search: Option<String>,
    pub status: Option<CommandStatus>,
}

#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub sale_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ClientSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct CommandDetailView {
    pub id: Uuid,
    pub product: Option<ProductSummary>,
    pub client: Option<ClientSummary>,
    pub co_client: Option<ClientSummary>,
}

#[derive(Debug, Serialize)]
pub struct CommandView {
    #[serde(flatten)]
    pub command: command::Model,
    pub details: Vec<CommandDetailView>,
}

#[derive(Clone)]
pub struct CommandService {
    db: Arc<DbPool>,
}

impl CommandService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Creates the command header and one detail row per product, atomically:
    /// a failure on any row rolls the whole command back.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateCommand) -> Result<CommandView, ServiceError> {
        input.validate()?;

        client::Entity::find_by_id(input.client_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Client with ID {} not found", input.client_id))
            })?;

        if let Some(co_client_id) = input.co_client_id {
            co_client::Entity::find_by_id(co_client_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("CoClient with ID {co_client_id} not found"))
                })?;
        }

        let known: HashSet<Uuid> = product::Entity::find()
            .filter(product::Column::Id.is_in(input.product_ids.clone()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if let Some(missing) = input.product_ids.iter().find(|id| !known.contains(id)) {
            return Err(ServiceError::NotFound(format!(
                "Product with ID {missing} not found"
            )));
        }

        let command_id = Uuid::new_v4();
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let header = command::ActiveModel {
            id: Set(command_id),
            product_count: Set(input.product_count),
            sale_price: Set(input.sale_price),
            purchase_price: Set(input.purchase_price),
            status: Set(input.status.unwrap_or_default()),
            delivery_address: Set(input.delivery_address),
            delivery_date: Set(input.delivery_date),
            created_at: Set(now),
        };
        header.insert(&txn).await?;

        for product_id in &input.product_ids {
            let detail = command_detail::ActiveModel {
                id: Set(Uuid::new_v4()),
                command_id: Set(command_id),
                product_id: Set(*product_id),
                client_id: Set(input.client_id),
                co_client_id: Set(input.co_client_id),
                created_at: Set(now),
            };
            detail.insert(&txn).await?;
        }

        txn.commit().await?;
        info!(%command_id, products = input.product_ids.len(), "command created");

        self.find_one(command_id).await
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        params: &ListCommandsParams,
    ) -> Result<PaginatedResponse<CommandView>, ServiceError> {
        let (page, limit) = page_window(params.page, params.limit);

        let mut condition = Condition::all();
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            condition = condition.add(command::Column::DeliveryAddress.like(&pattern));
        }
        if let Some(status) = params.status {
            condition = condition.add(command::Column::Status.eq(status));
        }

        let total = command::Entity::find()
            .filter(condition.clone())
            .count(&*self.db)
            .await?;

        let commands = command::Entity::find()
            .filter(condition)
            .order_by_desc(command::Column::CreatedAt)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&*self.db)
            .await?;

        let views = self.assemble(commands).await?;

        Ok(PaginatedResponse::new(views, page, limit, total))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<CommandView, ServiceError> {
        let model = command::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Command with ID {id} not found")))?;

        let mut views = self.assemble(vec![model]).await?;
        Ok(views.remove(0))
    }

    /// Applies a patch. Moving into a state that entails stock withdrawal
    /// marks every product on this command unavailable; the operation is
    /// idempotent and never reverses.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: UpdateCommand) -> Result<CommandView, ServiceError> {
        patch.validate()?;

        let existing = command::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Command with ID {id} not found")))?;

        if patch
            .status
            .is_some_and(CommandStatus::entails_stock_withdrawal)
        {
            let product_ids: Vec<Uuid> = command_detail::Entity::find()
                .filter(command_detail::Column::CommandId.eq(id))
                .all(&*self.db)
                .await?
                .into_iter()
                .map(|d| d.product_id)
                .collect();

            if !product_ids.is_empty() {
                let withdrawn = product::Entity::update_many()
                    .col_expr(product::Column::IsAvailable, Expr::value(false))
                    .filter(product::Column::Id.is_in(product_ids))
                    .exec(&*self.db)
                    .await?;
                info!(command_id = %id, rows = withdrawn.rows_affected, "products withdrawn from stock");
            }
        }

        let mut model: command::ActiveModel = existing.into();
        if let Some(product_count) = patch.product_count {
            model.product_count = Set(product_count);
        }
        if let Some(sale_price) = patch.sale_price {
            model.sale_price = Set(sale_price);
        }
        if let Some(purchase_price) = patch.purchase_price {
            model.purchase_price = Set(purchase_price);
        }
        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        if let Some(delivery_date) = patch.delivery_date {
            model.delivery_date = Set(Some(delivery_date));
        }
        if let Some(delivery_address) = patch.delivery_address {
            model.delivery_address = Set(delivery_address);
        }

        let updated = model.update(&*self.db).await?;
        self.find_one(updated.id).await
    }

    /// Deletes the command and its detail rows. Product availability is not
    /// restored.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        command::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Command with ID {id} not found")))?;

        let txn = self.db.begin().await?;
        command_detail::Entity::delete_many()
            .filter(command_detail::Column::CommandId.eq(id))
            .exec(&txn)
            .await?;
        command::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Full snapshot for CSV/PDF export, capped to keep exports bounded.
    #[instrument(skip(self))]
    pub async fn export_snapshot(&self, cap: u64) -> Result<Vec<CommandView>, ServiceError> {
        let commands = command::Entity::find()
            .order_by_desc(command::Column::CreatedAt)
            .limit(cap)
            .all(&*self.db)
            .await?;

        self.assemble(commands).await
    }

    /// Loads detail rows for a batch of commands and resolves their product,
    /// client and co-client references.
    async fn assemble(
        &self,
        commands: Vec<command::Model>,
    ) -> Result<Vec<CommandView>, ServiceError> {
        let command_ids: Vec<Uuid> = commands.iter().map(|c| c.id).collect();

        let details = command_detail::Entity::find()
            .filter(command_detail::Column::CommandId.is_in(command_ids))
            .all(&*self.db)
            .await?;

        let product_ids: HashSet<Uuid> = details.iter().map(|d| d.product_id).collect();
        let products: HashMap<Uuid, product::Model> = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let client_ids: HashSet<Uuid> = details.iter().map(|d| d.client_id).collect();
        let clients: HashMap<Uuid, client::Model> = client::Entity::find()
            .filter(client::Column::Id.is_in(client_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let co_client_ids: HashSet<Uuid> = details.iter().filter_map(|d| d.co_client_id).collect();
        let co_clients: HashMap<Uuid, co_client::Model> = co_client::Entity::find()
            .filter(co_client::Column::Id.is_in(co_client_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut grouped: HashMap<Uuid, Vec<CommandDetailView>> = HashMap::new();
        for detail in details {
            let product = products.get(&detail.product_id).map(|p| ProductSummary {
                id: p.id,
                name: p.name.clone(),
                sale_price: p.sale_price,
            });
            let client = clients.get(&detail.client_id).map(|c| ClientSummary {
                id: c.id,
                first_name: c.first_name.clone(),
                last_name: c.last_name.clone(),
            });
            let co_client = detail
                .co_client_id
                .and_then(|id| co_clients.get(&id))
                .map(|c| ClientSummary {
                    id: c.id,
                    first_name: c.first_name.clone(),
                    last_name: c.last_name.clone(),
                });

            grouped.entry(detail.command_id).or_default().push(
                CommandDetailView {
                    id: detail.id,
                    product,
                    client,
                    co_client,
                },
            );
        }

        Ok(commands
            .into_iter()
            .map(|c| {
                let details = grouped.remove(&c.id).unwrap_or_default();
                CommandView {
                    command: c,
                    details,
                }
            })
            .collect())
    }
}
