use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::db::DbPool;
use crate::entities::{category, co_client, command, command_detail, product, product_photo};
use crate::errors::ServiceError;
use crate::pricing::{compute_gain, PriceInputs};
use crate::{default_limit, default_page, page_window, PaginatedResponse};

fn validate_percent(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > dec!(100) {
        return Err(ValidationError::new(
            "consignment_percent must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("price fields must not be negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_non_negative")]
    pub sale_price: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub purchase_price: Option<Decimal>,
    #[serde(default)]
    pub stock_quantity: i32,
    pub is_consigned: bool,
    #[validate(custom = "validate_percent")]
    pub consignment_percent: Option<Decimal>,
    #[validate(custom = "validate_non_negative")]
    pub surcharge: Option<Decimal>,
    pub co_client_id: Option<Uuid>,
    pub category_id: Uuid,
}

/// Partial update: every field optional, omitted fields keep their stored
/// value. The gain is recomputed from the merged result.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_non_negative")]
    pub sale_price: Option<Decimal>,
    #[validate(custom = "validate_non_negative")]
    pub purchase_price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub is_consigned: Option<bool>,
    #[validate(custom = "validate_percent")]
    pub consignment_percent: Option<Decimal>,
    #[validate(custom = "validate_non_negative")]
    pub surcharge: Option<Decimal>,
    pub is_available: Option<bool>,
    pub co_client_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListProductsParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search over name and description
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub co_client_id: Option<Uuid>,
    pub is_consigned: Option<bool>,
    /// Lower bound on sale price
    pub min_price: Option<Decimal>,
    /// Upper bound on sale price
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CoClientSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// List item: the product plus display context and whether any command has
/// already sold it.
#[derive(Debug, Serialize)]
pub struct ProductListItem {
    #[serde(flatten)]
    pub product: product::Model,
    pub category: Option<CategorySummary>,
    pub co_client: Option<CoClientSummary>,
    /// First photo path, when one exists
    pub photo: Option<String>,
    pub is_sold: bool,
}

#[derive(Debug, Serialize)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: product::Model,
    pub category: Option<category::Model>,
    pub co_client: Option<co_client::Model>,
    pub photos: Vec<product_photo::Model>,
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    async fn ensure_category(&self, id: Uuid) -> Result<(), ServiceError> {
        category::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category with ID {id} not found")))?;
        Ok(())
    }

    async fn ensure_co_client(&self, id: Uuid) -> Result<(), ServiceError> {
        co_client::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("CoClient with ID {id} not found")))?;
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateProduct) -> Result<product::Model, ServiceError> {
        input.validate()?;
        self.ensure_category(input.category_id).await?;
        if let Some(co_client_id) = input.co_client_id {
            self.ensure_co_client(co_client_id).await?;
        }

        let surcharge = input.surcharge.unwrap_or(Decimal::ZERO);
        let gain = compute_gain(&PriceInputs {
            sale_price: input.sale_price,
            purchase_price: input.purchase_price,
            is_consigned: input.is_consigned,
            consignment_percent: input.consignment_percent,
            surcharge,
        });

        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            sale_price: Set(input.sale_price),
            purchase_price: Set(input.purchase_price),
            stock_quantity: Set(input.stock_quantity),
            is_consigned: Set(input.is_consigned),
            consignment_percent: Set(input.consignment_percent),
            surcharge: Set(surcharge),
            gain: Set(gain),
            is_available: Set(true),
            category_id: Set(input.category_id),
            co_client_id: Set(input.co_client_id),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        params: &ListProductsParams,
    ) -> Result<PaginatedResponse<ProductListItem>, ServiceError> {
        let (page, limit) = page_window(params.page, params.limit);

        let mut condition = Condition::all();
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(product::Column::Name.like(&pattern))
                    .add(product::Column::Description.like(&pattern)),
            );
        }
        if let Some(category_id) = params.category_id {
            condition = condition.add(product::Column::CategoryId.eq(category_id));
        }
        if let Some(co_client_id) = params.co_client_id {
            condition = condition.add(product::Column::CoClientId.eq(co_client_id));
        }
        if let Some(is_consigned) = params.is_consigned {
            condition = condition.add(product::Column::IsConsigned.eq(is_consigned));
        }
        if let Some(min_price) = params.min_price {
            condition = condition.add(product::Column::SalePrice.gte(min_price));
        }
        if let Some(max_price) = params.max_price {
            condition = condition.add(product::Column::SalePrice.lte(max_price));
        }

        let total = product::Entity::find()
            .filter(condition.clone())
            .count(&*self.db)
            .await?;

        let products = product::Entity::find()
            .filter(condition)
            .order_by_desc(product::Column::CreatedAt)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&*self.db)
            .await?;

        let items = self.annotate(products).await?;

        Ok(PaginatedResponse::new(items, page, limit, total))
    }

    /// Attaches category/co-client summaries, the first photo and the sold
    /// flag to a batch of products.
    async fn annotate(
        &self,
        products: Vec<product::Model>,
    ) -> Result<Vec<ProductListItem>, ServiceError> {
        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();

        let category_ids: HashSet<Uuid> = products.iter().map(|p| p.category_id).collect();
        let categories: HashMap<Uuid, category::Model> = category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let co_client_ids: HashSet<Uuid> =
            products.iter().filter_map(|p| p.co_client_id).collect();
        let co_clients: HashMap<Uuid, co_client::Model> = co_client::Entity::find()
            .filter(co_client::Column::Id.is_in(co_client_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut first_photos: HashMap<Uuid, String> = HashMap::new();
        for photo in product_photo::Entity::find()
            .filter(product_photo::Column::ProductId.is_in(ids.clone()))
            .order_by_asc(product_photo::Column::CreatedAt)
            .all(&*self.db)
            .await?
        {
            first_photos.entry(photo.product_id).or_insert(photo.path);
        }

        let sold_ids: HashSet<Uuid> = command_detail::Entity::find()
            .filter(command_detail::Column::ProductId.is_in(ids))
            .find_also_related(command::Entity)
            .all(&*self.db)
            .await?
            .into_iter()
            .filter(|(_, cmd)| {
                cmd.as_ref()
                    .is_some_and(|c| c.status.entails_stock_withdrawal())
            })
            .map(|(detail, _)| detail.product_id)
            .collect();

        Ok(products
            .into_iter()
            .map(|p| {
                let category = categories.get(&p.category_id).map(|c| CategorySummary {
                    id: c.id,
                    name: c.name.clone(),
                });
                let co_client = p
                    .co_client_id
                    .and_then(|id| co_clients.get(&id))
                    .map(|c| CoClientSummary {
                        id: c.id,
                        first_name: c.first_name.clone(),
                        last_name: c.last_name.clone(),
                    });
                let photo = first_photos.get(&p.id).cloned();
                let is_sold = sold_ids.contains(&p.id);
                ProductListItem {
                    product: p,
                    category,
                    co_client,
                    photo,
                    is_sold,
                }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {id} not found")))
    }

    #[instrument(skip(self))]
    pub async fn find_details(&self, id: Uuid) -> Result<ProductDetails, ServiceError> {
        let product = self.find_one(id).await?;

        let category = category::Entity::find_by_id(product.category_id)
            .one(&*self.db)
            .await?;
        let co_client = match product.co_client_id {
            Some(co_client_id) => {
                co_client::Entity::find_by_id(co_client_id)
                    .one(&*self.db)
                    .await?
            }
            None => None,
        };
        let photos = product_photo::Entity::find()
            .filter(product_photo::Column::ProductId.eq(product.id))
            .order_by_asc(product_photo::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(ProductDetails {
            product,
            category,
            co_client,
            photos,
        })
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateProduct,
    ) -> Result<product::Model, ServiceError> {
        patch.validate()?;
        let existing = self.find_one(id).await?;

        if let Some(category_id) = patch.category_id {
            self.ensure_category(category_id).await?;
        }
        if let Some(co_client_id) = patch.co_client_id {
            self.ensure_co_client(co_client_id).await?;
        }

        // Recompute gain from the merged values, never from the patch alone:
        // omitted fields must keep their stored contribution.
        let merged = PriceInputs::merged(&existing, &patch);
        let gain = compute_gain(&merged);

        let mut model: product::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(description) = patch.description {
            model.description = Set(Some(description));
        }
        if let Some(sale_price) = patch.sale_price {
            model.sale_price = Set(sale_price);
        }
        if let Some(purchase_price) = patch.purchase_price {
            model.purchase_price = Set(Some(purchase_price));
        }
        if let Some(stock_quantity) = patch.stock_quantity {
            model.stock_quantity = Set(stock_quantity);
        }
        if let Some(is_consigned) = patch.is_consigned {
            model.is_consigned = Set(is_consigned);
        }
        if let Some(consignment_percent) = patch.consignment_percent {
            model.consignment_percent = Set(Some(consignment_percent));
        }
        if let Some(is_available) = patch.is_available {
            model.is_available = Set(is_available);
        }
        if let Some(co_client_id) = patch.co_client_id {
            model.co_client_id = Set(Some(co_client_id));
        }
        if let Some(category_id) = patch.category_id {
            model.category_id = Set(category_id);
        }
        model.surcharge = Set(merged.surcharge);
        model.gain = Set(gain);

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.find_one(id).await?;
        product::Entity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    /// Full snapshot for CSV/PDF export, capped to keep exports bounded.
    #[instrument(skip(self))]
    pub async fn export_snapshot(&self, cap: u64) -> Result<Vec<product::Model>, ServiceError> {
        Ok(product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .limit(cap)
            .all(&*self.db)
            .await?)
    }
}
