use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Формат даты `create_date` на входе и на выходе
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Aggregate
// ============================================================================

/// Позиция прайс-листа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    /// Идентификатор: из CSV при импорте, из хранилища при чтении
    pub id: i64,

    pub name: String,

    pub category: String,

    pub price: f64,

    /// `None`, если в хранилище лежит значение, которое не является датой
    pub create_date: Option<NaiveDate>,
}

impl PriceItem {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        create_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            price,
            create_date: Some(create_date),
        }
    }

    /// Позиция попадает в выгрузку только при положительной цене,
    /// непустых названии и категории и корректной дате.
    pub fn is_exportable(&self) -> bool {
        self.price > 0.0
            && !self.name.is_empty()
            && !self.category.is_empty()
            && self.create_date.is_some()
    }
}
