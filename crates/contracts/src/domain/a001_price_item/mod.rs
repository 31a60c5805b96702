pub mod aggregate;
pub mod export;
pub mod import;

pub use aggregate::{PriceItem, DATE_FORMAT};
pub use export::{ExportParams, EXPORT_ENTRY_NAME, EXPORT_HEADER};
pub use import::{ImportParams, ImportStats};
