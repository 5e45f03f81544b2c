use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{product, product_photo};
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct ProductPhotoService {
    db: Arc<DbPool>,
}

impl ProductPhotoService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    async fn ensure_product(&self, id: Uuid) -> Result<(), ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {id} not found")))?;
        Ok(())
    }

    /// Records a stored file path against a product.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        product_id: Uuid,
        path: String,
    ) -> Result<product_photo::Model, ServiceError> {
        self.ensure_product(product_id).await?;

        let model = product_photo::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            path: Set(path),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&*self.db).await?)
    }

    /// Bulk registration of already-stored paths.
    #[instrument(skip(self, paths))]
    pub async fn create_many(
        &self,
        product_id: Uuid,
        paths: Vec<String>,
    ) -> Result<Vec<product_photo::Model>, ServiceError> {
        self.ensure_product(product_id).await?;

        let mut created = Vec::with_capacity(paths.len());
        for path in paths {
            let model = product_photo::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(product_id),
                path: Set(path),
                created_at: Set(Utc::now()),
            };
            created.push(model.insert(&*self.db).await?);
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn find_by_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<product_photo::Model>, ServiceError> {
        Ok(product_photo::Entity::find()
            .filter(product_photo::Column::ProductId.eq(product_id))
            .order_by_asc(product_photo::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        let photo = product_photo::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Photo with ID {id} not found")))?;

        product_photo::Entity::delete_by_id(photo.id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
