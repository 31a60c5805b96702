use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a001_price_item::{ExportParams, ImportParams, ImportStats};

use crate::domain::a001_price_item::{service, ExportError, ImportError};
use crate::shared::app_state::AppState;

const ARCHIVE_TYPE_ZIP: &str = "zip";
const FILE_FIELD: &str = "file";

/// POST /api/v0/prices?type=zip
///
/// multipart поле `file` с zip архивом; ответ — статистика загрузки
pub async fn import_prices(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportStats>, ImportError> {
    if params.archive_type.as_deref() != Some(ARCHIVE_TYPE_ZIP) {
        tracing::warn!("Import rejected: type={:?}", params.archive_type);
        return Err(ImportError::UnsupportedType);
    }

    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("Import rejected: not a multipart request: {}", e);
        ImportError::MissingFile
    })?;
    let payload = read_file_field(&mut multipart).await?;
    tracing::info!("Import request: {} bytes", payload.len());

    match service::import_archive(state.store.as_ref(), payload, state.max_entry_bytes).await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => {
            tracing::error!("Failed to import prices: {}", e);
            Err(e)
        }
    }
}

/// Содержимое поля `file`; остальные поля формы пропускаются
async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, ImportError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImportError::UnreadableFile(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ImportError::UnreadableFile(e.to_string()))?;
        return Ok(bytes.to_vec());
    }
    Err(ImportError::MissingFile)
}

/// GET /api/v0/prices?start=&end=&min=&max=
///
/// zip архив с `data.csv`
pub async fn export_prices(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Response, ExportError> {
    tracing::info!(
        "Export request: start={:?}, end={:?}, min={:?}, max={:?}",
        params.start,
        params.end,
        params.min,
        params.max
    );

    match service::export_archive(state.store.as_ref(), &params).await {
        Ok(archive) => Ok((
            [
                (header::CONTENT_TYPE, "application/zip"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"data.zip\"",
                ),
            ],
            archive,
        )
            .into_response()),
        Err(e) => {
            match &e {
                ExportError::Filter(_) => tracing::warn!("Export rejected: {}", e),
                _ => tracing::error!("Failed to export prices: {}", e),
            }
            Err(e)
        }
    }
}
