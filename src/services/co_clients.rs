use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{co_client, product};
use crate::errors::ServiceError;
use crate::{default_limit, default_page, page_window, PaginatedResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCoClient {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    pub address: String,
    /// Bank account reference used for consignment payouts
    #[validate(length(min = 1, message = "RIB is required"))]
    pub rib: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCoClientsParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search over names, email, phone number and RIB
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct CoClientService {
    db: Arc<DbPool>,
}

impl CoClientService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateCoClient) -> Result<co_client::Model, ServiceError> {
        input.validate()?;

        let model = co_client::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone_number: Set(input.phone_number),
            address: Set(input.address),
            rib: Set(input.rib),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        params: &ListCoClientsParams,
    ) -> Result<PaginatedResponse<co_client::Model>, ServiceError> {
        let (page, limit) = page_window(params.page, params.limit);

        let mut condition = Condition::all();
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(co_client::Column::FirstName.like(&pattern))
                    .add(co_client::Column::LastName.like(&pattern))
                    .add(co_client::Column::Email.like(&pattern))
                    .add(co_client::Column::PhoneNumber.like(&pattern))
                    .add(co_client::Column::Rib.like(&pattern)),
            );
        }

        let total = co_client::Entity::find()
            .filter(condition.clone())
            .count(&*self.db)
            .await?;

        let data = co_client::Entity::find()
            .filter(condition)
            .order_by_desc(co_client::Column::CreatedAt)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(PaginatedResponse::new(data, page, limit, total))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<co_client::Model, ServiceError> {
        co_client::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("CoClient with ID {id} not found")))
    }

    /// All products this co-client has ever brought in, newest first.
    #[instrument(skip(self))]
    pub async fn product_history(&self, id: Uuid) -> Result<Vec<product::Model>, ServiceError> {
        let co_client = self.find_one(id).await?;

        Ok(product::Entity::find()
            .filter(product::Column::CoClientId.eq(co_client.id))
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.find_one(id).await?;
        co_client::Entity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    /// Full snapshot for CSV/PDF export, capped to keep exports bounded.
    #[instrument(skip(self))]
    pub async fn export_snapshot(&self, cap: u64) -> Result<Vec<co_client::Model>, ServiceError> {
        Ok(co_client::Entity::find()
            .order_by_desc(co_client::Column::CreatedAt)
            .limit(cap)
            .all(&*self.db)
            .await?)
    }
}
