//! HTTP сервис загрузки и выгрузки прайс-листов (CSV в zip).

pub mod api;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod system;
