use std::collections::HashSet;

use contracts::domain::a001_price_item::{ImportStats, PriceItem};

use super::csv_row::RowOutcome;

/// Счётчики одной загрузки. Создаётся заново на каждый запрос.
#[derive(Debug, Default)]
pub struct ImportAggregator {
    total_count: usize,
    duplicates_count: usize,
    total_items: usize,
    total_price: f64,
    seen_ids: HashSet<i64>,
    categories: HashSet<String>,
}

impl ImportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Учитывает строку до записи в хранилище: `total_count` и дубли id.
    ///
    /// id запоминается, даже если строка потом не прошла проверку цены или даты.
    pub fn observe(&mut self, outcome: &RowOutcome) {
        let id = match outcome {
            RowOutcome::Header => return,
            RowOutcome::Accepted(item) => Some(item.id),
            RowOutcome::Rejected(rejection) => {
                if !rejection.is_counted() {
                    return;
                }
                rejection.id()
            }
        };

        self.total_count += 1;

        if let Some(id) = id {
            if !self.seen_ids.insert(id) {
                self.duplicates_count += 1;
            }
        }
    }

    /// Учитывает позицию, запись которой хранилище подтвердило
    pub fn record_stored(&mut self, item: &PriceItem) {
        self.total_items += 1;
        self.total_price += item.price;
        if !self.categories.contains(&item.category) {
            self.categories.insert(item.category.clone());
        }
    }

    pub fn finish(self) -> ImportStats {
        ImportStats {
            total_count: self.total_count,
            duplicates_count: self.duplicates_count,
            total_items: self.total_items,
            total_categories: self.categories.len(),
            total_price: self.total_price,
        }
    }
}
