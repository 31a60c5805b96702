// Aggregate handlers
pub mod a001_price_item;
