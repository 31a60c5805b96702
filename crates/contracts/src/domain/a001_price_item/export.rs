use serde::{Deserialize, Serialize};

/// Имя единственного файла внутри архива выгрузки
pub const EXPORT_ENTRY_NAME: &str = "data.csv";

/// Заголовок CSV выгрузки
pub const EXPORT_HEADER: [&str; 5] = ["id", "name", "category", "price", "create_date"];

/// Фильтры выгрузки в текстовом виде, как они пришли в query string.
/// Пустая строка равнозначна отсутствию параметра.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
}
