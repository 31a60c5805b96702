//! Общие типы (DTO) между backend и клиентами сервиса прайс-листов.

pub mod domain;
