use std::borrow::Cow;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use zip::ZipArchive;

use super::csv_row::{parse_row, RowOutcome};
use super::error::{EntryError, ImportError};

/// Предел распакованного размера одного файла по умолчанию (64 MiB)
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

/// Флаг отмены проверяется каждые столько строк
const CANCEL_CHECK_ROWS: usize = 1024;

/// Один `.csv` файл архива: разобранные строки либо причина пропуска файла
#[derive(Debug)]
pub struct ArchiveEntry {
    pub name: String,
    pub outcomes: Result<Vec<RowOutcome>, EntryError>,
}

/// Общий флаг отмены обхода; клоны указывают на один и тот же флаг
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Обход CSV файлов внутри zip архива.
///
/// Файлы отдаются в порядке архива, строки внутри файла в исходном порядке.
/// Каждый вызов [`ArchiveWalker::entries`] начинает обход заново.
/// Распакованный файл больше `max_entry_bytes` считается нечитаемым.
pub struct ArchiveWalker {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    max_entry_bytes: u64,
    cancel: CancelFlag,
}

impl ArchiveWalker {
    /// Открывает архив; если это не zip, загрузка прерывается целиком
    pub fn open(payload: Vec<u8>, max_entry_bytes: u64) -> Result<Self, ImportError> {
        let archive = ZipArchive::new(Cursor::new(payload))?;
        Ok(Self {
            archive,
            max_entry_bytes,
            cancel: CancelFlag::default(),
        })
    }

    /// После `cancel()` обход останавливается на ближайшей проверке
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn entries(&mut self) -> Entries<'_> {
        Entries {
            archive: &mut self.archive,
            max_entry_bytes: self.max_entry_bytes,
            cancel: &self.cancel,
            index: 0,
        }
    }
}

/// Ленивый итератор по CSV файлам архива
pub struct Entries<'a> {
    archive: &'a mut ZipArchive<Cursor<Vec<u8>>>,
    max_entry_bytes: u64,
    cancel: &'a CancelFlag,
    index: usize,
}

impl Iterator for Entries<'_> {
    type Item = ArchiveEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.archive.len() {
            if self.cancel.is_cancelled() {
                return None;
            }
            let index = self.index;
            self.index += 1;

            // Суффикс проверяется с учётом регистра: `.CSV` не подходит
            let name = match self.archive.name_for_index(index) {
                Some(name) if is_csv_name(name) => name.to_string(),
                _ => continue,
            };

            let outcomes = match self.archive.by_index(index) {
                Ok(file) => read_outcomes(file, self.max_entry_bytes, self.cancel),
                Err(e) => Err(EntryError::Open(e)),
            };
            return Some(ArchiveEntry { name, outcomes });
        }
        None
    }
}

fn is_csv_name(name: &str) -> bool {
    name.ends_with(".csv")
}

/// Распаковывает файл не больше `limit` байт и разбирает строки.
///
/// Ошибка распаковки или превышение предела делают нечитаемым весь файл.
/// Байты не в UTF-8 заменяются на U+FFFD в пределах своего поля.
fn read_outcomes<R: Read>(
    file: R,
    limit: u64,
    cancel: &CancelFlag,
) -> Result<Vec<RowOutcome>, EntryError> {
    let mut data = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut data)?;
    if data.len() as u64 > limit {
        return Err(EntryError::TooLarge { limit });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_slice());

    let mut outcomes = Vec::new();
    for (position, record) in reader.byte_records().enumerate() {
        if position % CANCEL_CHECK_ROWS == 0 && cancel.is_cancelled() {
            return Err(EntryError::Cancelled);
        }
        let record = record?;
        let fields: Vec<Cow<'_, str>> = record.iter().map(String::from_utf8_lossy).collect();
        outcomes.push(parse_row(fields.iter().map(|f| &**f), position));
    }
    Ok(outcomes)
}
