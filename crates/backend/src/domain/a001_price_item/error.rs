use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Ошибки загрузки архива. Любая из них прерывает запрос целиком.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Only zip available")]
    UnsupportedType,

    #[error("File not found")]
    MissingFile,

    #[error("Failed to read file: {0}")]
    UnreadableFile(String),

    #[error("Invalid zip: {0}")]
    InvalidArchive(#[from] zip::result::ZipError),
}

/// Ошибка одного файла внутри архива; файл пропускается, загрузка продолжается
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("can't open csv file: {0}")]
    Open(#[from] zip::result::ZipError),

    #[error("fail to unpack csv file: {0}")]
    Unpack(#[from] std::io::Error),

    #[error("csv file is larger than {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("fail to read csv file: {0}")]
    Read(#[from] csv::Error),

    #[error("import cancelled")]
    Cancelled,
}

/// Некорректный параметр фильтра выгрузки
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("invalid date in '{param}': {value:?}")]
    InvalidDate { param: &'static str, value: String },

    #[error("invalid price in '{param}': {value:?}")]
    InvalidPrice { param: &'static str, value: String },
}

/// Ошибки выгрузки: всё или ничего
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Failed to query database: {0}")]
    Store(anyhow::Error),

    #[error("Failed to write archive: {0}")]
    Encode(String),
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Encode(e.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(e: zip::result::ZipError) -> Self {
        ExportError::Encode(e.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Encode(e.to_string())
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

impl IntoResponse for FilterError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        match self {
            ExportError::Filter(e) => e.into_response(),
            // Детали внутренних ошибок остаются в логе
            ExportError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to query database",
            )
                .into_response(),
            ExportError::Encode(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to write CSV").into_response()
            }
        }
    }
}
