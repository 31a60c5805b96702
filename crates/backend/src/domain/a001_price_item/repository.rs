use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::domain::a001_price_item::{PriceItem, DATE_FORMAT};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set};

use super::filter::PriceFilter;

/// Хранилище позиций прайса.
///
/// Единственный разделяемый ресурс между запросами; согласованность
/// параллельных записей обеспечивает реализация, а не конвейер импорта.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Записывает позицию и возвращает id, присвоенный хранилищем.
    /// id из CSV не сохраняется.
    async fn insert(&self, item: &PriceItem) -> Result<i64>;

    /// Все позиции по возрастанию id
    async fn list(&self) -> Result<Vec<PriceItem>>;

    /// Позиции, удовлетворяющие фильтру, по возрастанию id
    async fn list_filtered(&self, filter: &PriceFilter) -> Result<Vec<PriceItem>>;
}

/// Строка таблицы `items`
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    pub category: String,

    pub price: f64,

    /// Дата в виде `YYYY-MM-DD`: строковое сравнение совпадает с календарным
    pub create_date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_item(self) -> PriceItem {
        let create_date = match NaiveDate::parse_from_str(&self.create_date, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                tracing::warn!(
                    "Item {} has invalid create_date {:?}",
                    self.id,
                    self.create_date
                );
                None
            }
        };
        PriceItem {
            id: self.id,
            name: self.name,
            category: self.category,
            price: self.price,
            create_date,
        }
    }
}

fn to_active_model(item: &PriceItem) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(item.name.clone()),
        category: Set(item.category.clone()),
        price: Set(item.price),
        create_date: Set(item
            .create_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn apply_filter(mut query: Select<Entity>, filter: &PriceFilter) -> Select<Entity> {
    if let Some(start) = filter.start {
        query = query.filter(Column::CreateDate.gte(format_date(start)));
    }
    if let Some(end) = filter.end {
        query = query.filter(Column::CreateDate.lte(format_date(end)));
    }
    if let Some(min) = filter.min {
        query = query.filter(Column::Price.gte(min));
    }
    if let Some(max) = filter.max {
        query = query.filter(Column::Price.lte(max));
    }
    query
}

/// [`RowStore`] поверх SQLite через sea-orm
#[derive(Clone)]
pub struct SeaOrmRowStore {
    db: DatabaseConnection,
}

impl SeaOrmRowStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RowStore for SeaOrmRowStore {
    async fn insert(&self, item: &PriceItem) -> Result<i64> {
        let result = Entity::insert(to_active_model(item)).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn list(&self) -> Result<Vec<PriceItem>> {
        let models = Entity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Model::into_item).collect())
    }

    async fn list_filtered(&self, filter: &PriceFilter) -> Result<Vec<PriceItem>> {
        let models = apply_filter(Entity::find(), filter)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Model::into_item).collect())
    }
}
