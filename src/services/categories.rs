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
use crate::entities::category;
use crate::errors::ServiceError;
use crate::{default_limit, default_page, page_window, PaginatedResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCategoriesParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search over name and description
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DbPool>,
}

impl CategoryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateCategory) -> Result<category::Model, ServiceError> {
        input.validate()?;

        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        params: &ListCategoriesParams,
    ) -> Result<PaginatedResponse<category::Model>, ServiceError> {
        let (page, limit) = page_window(params.page, params.limit);

        let mut condition = Condition::all();
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(category::Column::Name.like(&pattern))
                    .add(category::Column::Description.like(&pattern)),
            );
        }

        let total = category::Entity::find()
            .filter(condition.clone())
            .count(&*self.db)
            .await?;

        let data = category::Entity::find()
            .filter(condition)
            .order_by_desc(category::Column::CreatedAt)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(PaginatedResponse::new(data, page, limit, total))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<category::Model, ServiceError> {
        category::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category with ID {id} not found")))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateCategory,
    ) -> Result<category::Model, ServiceError> {
        let existing = self.find_one(id).await?;

        let mut model: category::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(description) = patch.description {
            model.description = Set(Some(description));
        }

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.find_one(id).await?;
        category::Entity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
