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
use crate::entities::client;
use crate::errors::ServiceError;
use crate::{default_limit, default_page, page_window, PaginatedResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    pub address: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListClientsParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search over names, email and phone number
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ClientService {
    db: Arc<DbPool>,
}

impl ClientService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateClient) -> Result<client::Model, ServiceError> {
        input.validate()?;

        let model = client::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone_number: Set(input.phone_number),
            address: Set(input.address),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        params: &ListClientsParams,
    ) -> Result<PaginatedResponse<client::Model>, ServiceError> {
        let (page, limit) = page_window(params.page, params.limit);

        let mut condition = Condition::all();
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(client::Column::FirstName.like(&pattern))
                    .add(client::Column::LastName.like(&pattern))
                    .add(client::Column::Email.like(&pattern))
                    .add(client::Column::PhoneNumber.like(&pattern)),
            );
        }

        let total = client::Entity::find()
            .filter(condition.clone())
            .count(&*self.db)
            .await?;

        let data = client::Entity::find()
            .filter(condition)
            .order_by_desc(client::Column::CreatedAt)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(PaginatedResponse::new(data, page, limit, total))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<client::Model, ServiceError> {
        client::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Client with ID {id} not found")))
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.find_one(id).await?;
        client::Entity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    /// Full snapshot for CSV/PDF export, capped to keep exports bounded.
    #[instrument(skip(self))]
    pub async fn export_snapshot(&self, cap: u64) -> Result<Vec<client::Model>, ServiceError> {
        Ok(client::Entity::find()
            .order_by_desc(client::Column::CreatedAt)
            .limit(cap)
            .all(&*self.db)
            .await?)
    }
}
