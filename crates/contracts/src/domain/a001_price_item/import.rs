use serde::{Deserialize, Serialize};

/// Query-параметры загрузки: `?type=zip`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportParams {
    #[serde(rename = "type", default)]
    pub archive_type: Option<String>,
}

/// Итог одной загрузки архива
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportStats {
    /// Строки с пятью и более полями (кроме заголовка)
    pub total_count: usize,

    /// Строки, чей id уже встречался в этой же загрузке
    pub duplicates_count: usize,

    /// Строки, записанные в хранилище
    pub total_items: usize,

    /// Количество различных категорий среди записанных строк
    pub total_categories: usize,

    /// Сумма цен записанных строк
    pub total_price: f64,
}
