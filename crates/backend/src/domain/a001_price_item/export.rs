use std::io::{Cursor, Write};

use contracts::domain::a001_price_item::{
    PriceItem, DATE_FORMAT, EXPORT_ENTRY_NAME, EXPORT_HEADER,
};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::ExportError;

/// Цена в выгрузке всегда с двумя знаками после точки
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// CSV выгрузки: заголовок и по строке на каждую выгружаемую позицию.
/// Позиции, не прошедшие [`PriceItem::is_exportable`], пропускаются.
pub fn encode_csv(items: &[PriceItem]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;

    for item in items {
        let Some(date) = item.create_date.filter(|_| item.is_exportable()) else {
            continue;
        };
        let id = item.id.to_string();
        let price = format_price(item.price);
        let date = date.format(DATE_FORMAT).to_string();
        writer.write_record([
            id.as_str(),
            item.name.as_str(),
            item.category.as_str(),
            price.as_str(),
            date.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Encode(e.to_string()))
}

/// Упаковывает CSV в zip с единственным файлом `data.csv`.
///
/// Архив собирается в памяти полностью; при любой ошибке буфер отбрасывается.
pub fn encode_archive(items: &[PriceItem]) -> Result<Vec<u8>, ExportError> {
    let csv_bytes = encode_csv(items)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(EXPORT_ENTRY_NAME, options)?;
    zip.write_all(&csv_bytes)?;
    let cursor = zip.finish()?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_price_item::testing::{milk_and_bread, read_entry};

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(2.5), "2.50");
        assert_eq!(format_price(1.0), "1.00");
        assert_eq!(format_price(0.126), "0.13");
        assert_eq!(format_price(1234.5), "1234.50");
    }

    #[test]
    fn test_encode_csv_exact_output() {
        let csv = encode_csv(&milk_and_bread()).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "id,name,category,price,create_date\n\
             1,Milk,Dairy,2.50,2024-01-01\n\
             2,Bread,Bakery,1.00,2024-01-02\n"
        );
    }

    #[test]
    fn test_empty_list_has_header_only() {
        let csv = encode_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "id,name,category,price,create_date\n"
        );
    }

    #[test]
    fn test_non_exportable_items_are_skipped() {
        let mut items = milk_and_bread();
        let mut free = items[0].clone();
        free.id = 3;
        free.price = 0.0;
        let mut nameless = items[0].clone();
        nameless.id = 4;
        nameless.name.clear();
        let mut undated = items[0].clone();
        undated.id = 5;
        undated.create_date = None;
        items.extend([free, nameless, undated]);

        let csv = String::from_utf8(encode_csv(&items).unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(!csv.contains("\n3,"));
        assert!(!csv.contains("\n4,"));
        assert!(!csv.contains("\n5,"));
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut items = milk_and_bread();
        items[0].name = "Milk, 1L".to_string();
        let csv = String::from_utf8(encode_csv(&items[..1]).unwrap()).unwrap();
        assert!(csv.contains("1,\"Milk, 1L\",Dairy,2.50,2024-01-01\n"));
    }

    #[test]
    fn test_archive_has_single_data_csv() {
        let bytes = encode_archive(&milk_and_bread()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.name_for_index(0), Some("data.csv"));

        let content = read_entry(&bytes, "data.csv");
        assert!(content.starts_with("id,name,category,price,create_date\n"));
        assert!(content.ends_with("2,Bread,Bakery,1.00,2024-01-02\n"));
    }
}
