//! Read-only reporting projections for the dashboard.
//!
//! Every figure is computed by grouping and summing live rows at request
//! time; nothing is cached or materialized.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{category, client, co_client, command, command_detail, product, product_photo, CommandStatus};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Month,
    Year,
    All,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StatsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub period: Option<StatsPeriod>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct Kpis {
    pub total_products: u64,
    pub total_commands: u64,
    pub total_clients: u64,
    pub total_co_clients: u64,
    pub total_revenue: Decimal,
    pub total_purchase_cost: Decimal,
    pub total_profit: Decimal,
    pub delivered_commands: u64,
    pub profit_commands: u64,
    pub avg_order_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category_id: Uuid,
    pub category_name: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: CommandStatus,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MonthlyProfit {
    pub month: String,
    pub profit: Decimal,
    pub revenue: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct TopProduct {
    pub rank: usize,
    pub product_id: Uuid,
    pub product_name: String,
    pub category_name: String,
    pub count: u64,
    pub total_value: Decimal,
    pub sale_price: Decimal,
    pub photo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevenueBreakdown {
    pub total_revenue: Decimal,
    pub buying_revenue: Decimal,
    pub depot_revenue: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OwnershipSplit {
    pub depot: u64,
    pub buying: u64,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct TotalSurcharge {
    pub total_surcharge: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CommandLocation {
    pub id: Uuid,
    pub address: String,
    pub revenue: Decimal,
    pub date: DateTime<Utc>,
    pub client: String,
}

fn month_key(date: DateTime<Utc>) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

fn start_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

#[derive(Clone)]
pub struct StatsService {
    db: Arc<DbPool>,
}

impl StatsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Resolves the requested window. An explicit range wins over a named
    /// period; with neither, no date filtering applies.
    fn date_window(query: &StatsQuery) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            return Some((start, end));
        }

        let now = Utc::now();
        match query.period {
            Some(StatsPeriod::Month) => Some((start_of_month(now), now)),
            Some(StatsPeriod::Year) => Some((start_of_year(now), now)),
            _ => None,
        }
    }

    fn command_condition(query: &StatsQuery) -> Condition {
        let mut condition = Condition::all();
        if let Some((start, end)) = Self::date_window(query) {
            condition = condition
                .add(command::Column::CreatedAt.gte(start))
                .add(command::Column::CreatedAt.lte(end));
        }
        condition
    }

    fn product_condition(query: &StatsQuery) -> Condition {
        let mut condition = Condition::all();
        if let Some(category_id) = query.category_id {
            condition = condition.add(product::Column::CategoryId.eq(category_id));
        }
        if let Some((start, end)) = Self::date_window(query) {
            condition = condition
                .add(product::Column::CreatedAt.gte(start))
                .add(product::Column::CreatedAt.lte(end));
        }
        condition
    }

    async fn filtered_commands(
        &self,
        query: &StatsQuery,
    ) -> Result<Vec<command::Model>, ServiceError> {
        Ok(command::Entity::find()
            .filter(Self::command_condition(query))
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn kpis(&self, query: &StatsQuery) -> Result<Kpis, ServiceError> {
        let total_products = product::Entity::find()
            .filter(Self::product_condition(query))
            .count(&*self.db)
            .await?;

        let mut client_condition = Condition::all();
        let mut co_client_condition = Condition::all();
        if let Some((start, end)) = Self::date_window(query) {
            client_condition = client_condition
                .add(client::Column::CreatedAt.gte(start))
                .add(client::Column::CreatedAt.lte(end));
            co_client_condition = co_client_condition
                .add(co_client::Column::CreatedAt.gte(start))
                .add(co_client::Column::CreatedAt.lte(end));
        }
        let total_clients = client::Entity::find()
            .filter(client_condition)
            .count(&*self.db)
            .await?;
        let total_co_clients = co_client::Entity::find()
            .filter(co_client_condition)
            .count(&*self.db)
            .await?;

        let commands = self.filtered_commands(query).await?;
        let total_commands = commands.len() as u64;
        let total_revenue: Decimal = commands.iter().map(|c| c.sale_price).sum();
        let total_purchase_cost: Decimal = commands.iter().map(|c| c.purchase_price).sum();
        let delivered_commands = commands
            .iter()
            .filter(|c| c.status == CommandStatus::Delivered)
            .count() as u64;
        let profit_commands = commands
            .iter()
            .filter(|c| c.status == CommandStatus::GotProfit)
            .count() as u64;

        let avg_order_value = if total_commands > 0 {
            total_revenue / Decimal::from(total_commands)
        } else {
            Decimal::ZERO
        };

        Ok(Kpis {
            total_products,
            total_commands,
            total_clients,
            total_co_clients,
            total_revenue,
            total_purchase_cost,
            total_profit: total_revenue - total_purchase_cost,
            delivered_commands,
            profit_commands,
            avg_order_value,
        })
    }

    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        query: &StatsQuery,
    ) -> Result<Vec<CategoryCount>, ServiceError> {
        let products = product::Entity::find()
            .filter(Self::product_condition(query))
            .all(&*self.db)
            .await?;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for p in &products {
            *counts.entry(p.category_id).or_default() += 1;
        }

        let categories: HashMap<Uuid, String> = category::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(counts
            .into_iter()
            .map(|(category_id, count)| CategoryCount {
                category_id,
                category_name: categories
                    .get(&category_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                count,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn commands_by_status(
        &self,
        query: &StatsQuery,
    ) -> Result<Vec<StatusCount>, ServiceError> {
        let commands = self.filtered_commands(query).await?;

        let mut counts: HashMap<CommandStatus, u64> = HashMap::new();
        for c in &commands {
            *counts.entry(c.status).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn monthly_revenue(
        &self,
        query: &StatsQuery,
    ) -> Result<Vec<MonthlyRevenue>, ServiceError> {
        let commands = self.filtered_commands(query).await?;

        let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
        for c in &commands {
            *buckets.entry(month_key(c.created_at)).or_default() += c.sale_price;
        }

        Ok(buckets
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenue { month, revenue })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn monthly_profit(
        &self,
        query: &StatsQuery,
    ) -> Result<Vec<MonthlyProfit>, ServiceError> {
        let commands = self.filtered_commands(query).await?;

        let mut buckets: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for c in &commands {
            let entry = buckets.entry(month_key(c.created_at)).or_default();
            entry.0 += c.sale_price;
            entry.1 += c.purchase_price;
        }

        Ok(buckets
            .into_iter()
            .map(|(month, (revenue, cost))| MonthlyProfit {
                month,
                profit: revenue - cost,
                revenue,
                cost,
            })
            .collect())
    }

    /// Top products by cumulative sale value across command details.
    #[instrument(skip(self))]
    pub async fn top_products(
        &self,
        query: &StatsQuery,
        limit: usize,
    ) -> Result<Vec<TopProduct>, ServiceError> {
        let mut details = command_detail::Entity::find();
        if Self::date_window(query).is_some() {
            let command_ids: Vec<Uuid> = self
                .filtered_commands(query)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();
            details = details.filter(command_detail::Column::CommandId.is_in(command_ids));
        }
        let details = details.all(&*self.db).await?;

        let mut tally: HashMap<Uuid, u64> = HashMap::new();
        for d in &details {
            *tally.entry(d.product_id).or_default() += 1;
        }

        let products: HashMap<Uuid, product::Model> = product::Entity::find()
            .filter(product::Column::Id.is_in(tally.keys().copied().collect::<Vec<_>>()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let categories: HashMap<Uuid, String> = category::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut first_photos: HashMap<Uuid, String> = HashMap::new();
        for photo in product_photo::Entity::find()
            .filter(
                product_photo::Column::ProductId
                    .is_in(tally.keys().copied().collect::<Vec<_>>()),
            )
            .order_by_asc(product_photo::Column::CreatedAt)
            .all(&*self.db)
            .await?
        {
            first_photos.entry(photo.product_id).or_insert(photo.path);
        }

        let mut ranked: Vec<(u64, Decimal, product::Model)> = tally
            .into_iter()
            .filter_map(|(product_id, count)| {
                products.get(&product_id).map(|p| {
                    let total_value = p.sale_price * Decimal::from(count);
                    (count, total_value, p.clone())
                })
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (count, total_value, p))| TopProduct {
                rank: i + 1,
                product_id: p.id,
                product_name: p.name.clone(),
                category_name: categories
                    .get(&p.category_id)
                    .cloned()
                    .unwrap_or_else(|| "N/A".to_string()),
                count,
                total_value,
                sale_price: p.sale_price,
                photo: first_photos.get(&p.id).cloned(),
            })
            .collect())
    }

    /// Shop revenue split by ownership mode: margin on owned stock vs
    /// recorded gain on consigned goods.
    #[instrument(skip(self))]
    pub async fn revenue_breakdown(
        &self,
        query: &StatsQuery,
    ) -> Result<RevenueBreakdown, ServiceError> {
        let products = product::Entity::find()
            .filter(Self::product_condition(query))
            .all(&*self.db)
            .await?;

        let mut buying_revenue = Decimal::ZERO;
        let mut depot_revenue = Decimal::ZERO;
        for p in &products {
            if p.is_consigned {
                depot_revenue += p.gain;
            } else {
                buying_revenue += p.sale_price - p.purchase_price.unwrap_or(Decimal::ZERO);
            }
        }

        Ok(RevenueBreakdown {
            total_revenue: buying_revenue + depot_revenue,
            buying_revenue,
            depot_revenue,
        })
    }

    /// Products sold per month of the current year; months without sales are
    /// present with a zero count.
    #[instrument(skip(self))]
    pub async fn monthly_sold_products(
        &self,
        query: &StatsQuery,
    ) -> Result<Vec<MonthlyCount>, ServiceError> {
        let now = Utc::now();
        let year_start = start_of_year(now);

        let mut condition = Self::command_condition(query);
        condition = condition
            .add(command::Column::CreatedAt.gte(year_start))
            .add(command::Column::CreatedAt.lte(now));

        let commands = command::Entity::find()
            .filter(condition)
            .all(&*self.db)
            .await?;

        let mut buckets: BTreeMap<String, i64> = (1..=12)
            .map(|m| (format!("{}-{m:02}", now.year()), 0))
            .collect();
        for c in &commands {
            let key = month_key(c.created_at);
            if let Some(count) = buckets.get_mut(&key) {
                *count += i64::from(c.product_count);
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(month, count)| MonthlyCount { month, count })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn depot_vs_buying(
        &self,
        query: &StatsQuery,
    ) -> Result<OwnershipSplit, ServiceError> {
        let depot = product::Entity::find()
            .filter(
                Self::product_condition(query).add(product::Column::IsConsigned.eq(true)),
            )
            .count(&*self.db)
            .await?;
        let buying = product::Entity::find()
            .filter(
                Self::product_condition(query).add(product::Column::IsConsigned.eq(false)),
            )
            .count(&*self.db)
            .await?;

        Ok(OwnershipSplit {
            depot,
            buying,
            total: depot + buying,
        })
    }

    #[instrument(skip(self))]
    pub async fn total_surcharge(
        &self,
        query: &StatsQuery,
    ) -> Result<TotalSurcharge, ServiceError> {
        let products = product::Entity::find()
            .filter(Self::product_condition(query))
            .all(&*self.db)
            .await?;

        Ok(TotalSurcharge {
            total_surcharge: products.iter().map(|p| p.surcharge).sum(),
        })
    }

    /// Commands with a usable delivery address, for map markers. The display
    /// name comes from the first detail's client, falling back to its
    /// co-client.
    #[instrument(skip(self))]
    pub async fn command_locations(
        &self,
        query: &StatsQuery,
    ) -> Result<Vec<CommandLocation>, ServiceError> {
        let commands: Vec<command::Model> = self
            .filtered_commands(query)
            .await?
            .into_iter()
            .filter(|c| !c.delivery_address.trim().is_empty())
            .collect();

        let command_ids: Vec<Uuid> = commands.iter().map(|c| c.id).collect();
        let details = command_detail::Entity::find()
            .filter(command_detail::Column::CommandId.is_in(command_ids))
            .order_by_asc(command_detail::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut first_detail: HashMap<Uuid, command_detail::Model> = HashMap::new();
        for d in details {
            first_detail.entry(d.command_id).or_insert(d);
        }

        let clients: HashMap<Uuid, client::Model> = client::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let co_clients: HashMap<Uuid, co_client::Model> = co_client::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(commands
            .into_iter()
            .map(|c| {
                let display_name = first_detail
                    .get(&c.id)
                    .and_then(|d| {
                        clients
                            .get(&d.client_id)
                            .map(|cl| format!("{} {}", cl.first_name, cl.last_name))
                            .or_else(|| {
                                d.co_client_id.and_then(|id| {
                                    co_clients
                                        .get(&id)
                                        .map(|co| format!("{} {}", co.first_name, co.last_name))
                                })
                            })
                    })
                    .unwrap_or_else(|| "N/A".to_string());

                CommandLocation {
                    id: c.id,
                    address: c.delivery_address.clone(),
                    revenue: c.sale_price,
                    date: c.created_at,
                    client: display_name,
                }
            })
            .collect())
    }
}
