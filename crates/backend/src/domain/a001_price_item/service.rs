use contracts::domain::a001_price_item::{ExportParams, ImportStats};
use tokio::sync::mpsc;

use super::aggregator::ImportAggregator;
use super::archive::{ArchiveEntry, ArchiveWalker, CancelFlag};
use super::csv_row::{RowOutcome, RowRejection};
use super::error::{ExportError, ImportError};
use super::export::encode_archive;
use super::filter::PriceFilter;
use super::repository::RowStore;

/// Сколько строк обрабатывается между точками, где загрузка отдаёт управление
const YIELD_EVERY_ROWS: usize = 1024;

/// Останавливает обход архива, если загрузка закончилась или её future сброшен
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Загрузка zip архива с CSV файлами.
///
/// Битые строки и нечитаемые файлы пропускаются с записью в лог.
/// Ошибка записи отдельной строки тоже не прерывает загрузку; такая строка
/// не попадает в `total_items`, `total_categories` и `total_price`.
///
/// Распаковка и разбор идут в blocking пуле, поэтому таймаут запроса
/// срабатывает и на архивах, где нет ни одной годной строки.
pub async fn import_archive(
    store: &dyn RowStore,
    payload: Vec<u8>,
    max_entry_bytes: u64,
) -> Result<ImportStats, ImportError> {
    let started_at = std::time::Instant::now();
    let mut walker = ArchiveWalker::open(payload, max_entry_bytes)?;
    let _cancel = CancelOnDrop(walker.cancel_flag());

    let (tx, mut rx) = mpsc::channel::<ArchiveEntry>(1);
    let walk = tokio::task::spawn_blocking(move || {
        for entry in walker.entries() {
            if tx.blocking_send(entry).is_err() {
                break;
            }
        }
    });

    let mut aggregator = ImportAggregator::new();
    let mut skipped_files = 0usize;
    let mut rows_since_yield = 0usize;

    while let Some(entry) = rx.recv().await {
        let outcomes = match entry.outcomes {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::warn!("Skip file {}: {}", entry.name, e);
                skipped_files += 1;
                continue;
            }
        };

        for (position, outcome) in outcomes.into_iter().enumerate() {
            rows_since_yield += 1;
            if rows_since_yield == YIELD_EVERY_ROWS {
                rows_since_yield = 0;
                tokio::task::yield_now().await;
            }

            aggregator.observe(&outcome);

            match outcome {
                RowOutcome::Header => {}
                RowOutcome::Rejected(reason @ RowRejection::Malformed { .. }) => {
                    tracing::debug!("Skip row {} in {}: {}", position, entry.name, reason);
                }
                RowOutcome::Rejected(reason) => {
                    tracing::warn!("Skip row {} in {}: {}", position, entry.name, reason);
                }
                RowOutcome::Accepted(item) => match store.insert(&item).await {
                    Ok(_) => aggregator.record_stored(&item),
                    Err(e) => {
                        tracing::error!(
                            "Failed to insert row {} of {}: {}",
                            position,
                            entry.name,
                            e
                        );
                    }
                },
            }
        }
    }

    if let Err(e) = walk.await {
        tracing::error!("Archive walk failed: {}", e);
    }

    let stats = aggregator.finish();
    tracing::info!(
        "Import finished: total_count={}, duplicates={}, stored={}, categories={}, skipped_files={}, elapsed_ms={}",
        stats.total_count,
        stats.duplicates_count,
        stats.total_items,
        stats.total_categories,
        skipped_files,
        started_at.elapsed().as_millis()
    );
    Ok(stats)
}

/// Выгрузка позиций в zip с `data.csv`.
///
/// Параметры проверяются до обращения к хранилищу, так что при ошибке
/// в фильтре ничего не читается и не формируется.
pub async fn export_archive(
    store: &dyn RowStore,
    params: &ExportParams,
) -> Result<Vec<u8>, ExportError> {
    let filter = PriceFilter::from_params(params)?;

    let items = if filter.is_empty() {
        store.list().await
    } else {
        store.list_filtered(&filter).await
    }
    .map_err(ExportError::Store)?;

    let archive = encode_archive(&items)?;
    tracing::info!(
        "Export finished: {} items read, {} bytes",
        items.len(),
        archive.len()
    );
    Ok(archive)
}
