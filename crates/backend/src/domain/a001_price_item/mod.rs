pub mod aggregator;
pub mod archive;
pub mod csv_row;
pub mod error;
pub mod export;
pub mod filter;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ExportError, FilterError, ImportError};
pub use repository::{RowStore, SeaOrmRowStore};
