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

use crate::auth::hash_password;
use crate::db::DbPool;
use crate::entities::user;
use crate::errors::ServiceError;
use crate::{default_limit, default_page, page_window, PaginatedResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search over names and email
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateUser) -> Result<user::Model, ServiceError> {
        input.validate()?;

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)?),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        params: &ListUsersParams,
    ) -> Result<PaginatedResponse<user::Model>, ServiceError> {
        let (page, limit) = page_window(params.page, params.limit);

        let mut condition = Condition::all();
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(user::Column::FirstName.like(&pattern))
                    .add(user::Column::LastName.like(&pattern))
                    .add(user::Column::Email.like(&pattern)),
            );
        }

        let total = user::Entity::find()
            .filter(condition.clone())
            .count(&*self.db)
            .await?;

        let data = user::Entity::find()
            .filter(condition)
            .order_by_desc(user::Column::CreatedAt)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(PaginatedResponse::new(data, page, limit, total))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User with ID {id} not found")))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: UpdateUser) -> Result<user::Model, ServiceError> {
        patch.validate()?;
        let existing = self.find_one(id).await?;

        let mut model: user::ActiveModel = existing.into();
        if let Some(email) = patch.email {
            model.email = Set(email);
        }
        if let Some(password) = patch.password {
            model.password_hash = Set(hash_password(&password)?);
        }
        if let Some(first_name) = patch.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = patch.last_name {
            model.last_name = Set(last_name);
        }

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.find_one(id).await?;
        user::Entity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
