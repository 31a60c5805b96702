use std::io::{Cursor, Read, Write};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::domain::a001_price_item::PriceItem;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::filter::PriceFilter;
use super::repository::RowStore;

/// Хранилище в памяти: id присваиваются по порядку, как в SQLite
#[derive(Default)]
pub struct MemoryRowStore {
    items: Mutex<Vec<PriceItem>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Кладёт позиции как есть, с их id, в обход проверок импорта
    pub fn with_items(items: Vec<PriceItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    pub fn items(&self) -> Vec<PriceItem> {
        let mut items = self.items.lock().unwrap().clone();
        items.sort_by_key(|i| i.id);
        items
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn insert(&self, item: &PriceItem) -> Result<i64> {
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        items.push(PriceItem {
            id,
            ..item.clone()
        });
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<PriceItem>> {
        Ok(self.items())
    }

    async fn list_filtered(&self, filter: &PriceFilter) -> Result<Vec<PriceItem>> {
        Ok(self
            .items()
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect())
    }
}

/// Хранилище, у которого отказывает любая операция
pub struct FailingRowStore;

#[async_trait]
impl RowStore for FailingRowStore {
    async fn insert(&self, _item: &PriceItem) -> Result<i64> {
        anyhow::bail!("database is locked")
    }

    async fn list(&self) -> Result<Vec<PriceItem>> {
        anyhow::bail!("database is locked")
    }

    async fn list_filtered(&self, _filter: &PriceFilter) -> Result<Vec<PriceItem>> {
        anyhow::bail!("database is locked")
    }
}

/// Хранилище, которое отвечает на каждую запись с задержкой
pub struct SlowRowStore {
    delay: Duration,
    inner: MemoryRowStore,
}

impl SlowRowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: MemoryRowStore::new(),
        }
    }

    pub fn items(&self) -> Vec<PriceItem> {
        self.inner.items()
    }
}

#[async_trait]
impl RowStore for SlowRowStore {
    async fn insert(&self, item: &PriceItem) -> Result<i64> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(item).await
    }

    async fn list(&self) -> Result<Vec<PriceItem>> {
        self.inner.list().await
    }

    async fn list_filtered(&self, filter: &PriceFilter) -> Result<Vec<PriceItem>> {
        self.inner.list_filtered(filter).await
    }
}

pub fn milk_and_bread() -> Vec<PriceItem> {
    vec![
        PriceItem::new(
            1,
            "Milk",
            "Dairy",
            2.5,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ),
        PriceItem::new(
            2,
            "Bread",
            "Bakery",
            1.0,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        ),
    ]
}

pub fn zip_of_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn zip_of(files: &[(&str, &str)]) -> Vec<u8> {
    let files: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(name, content)| (*name, content.as_bytes()))
        .collect();
    zip_of_bytes(&files)
}

pub fn read_entry(archive: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}
