use std::sync::Arc;

use crate::domain::a001_price_item::archive::DEFAULT_MAX_ENTRY_BYTES;
use crate::domain::a001_price_item::repository::RowStore;

/// Состояние роутера: создаётся один раз в `main` и клонируется в каждый запрос
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RowStore>,
    /// Предел распакованного размера одного CSV файла при загрузке
    pub max_entry_bytes: u64,
}

impl AppState {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            store,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }

    pub fn with_max_entry_bytes(mut self, max_entry_bytes: u64) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }
}
