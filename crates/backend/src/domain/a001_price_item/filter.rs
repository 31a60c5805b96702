use chrono::NaiveDate;
#[cfg(test)]
use contracts::domain::a001_price_item::PriceItem;
use contracts::domain::a001_price_item::{ExportParams, DATE_FORMAT};

use super::csv_row::parse_price;
use super::error::FilterError;

/// Условия выгрузки. Заданные условия объединяются через AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceFilter {
    /// Проверяет все параметры до обращения к хранилищу.
    /// Пустая строка равнозначна отсутствию параметра.
    pub fn from_params(params: &ExportParams) -> Result<Self, FilterError> {
        Ok(Self {
            start: parse_date_param("start", params.start.as_deref())?,
            end: parse_date_param("end", params.end.as_deref())?,
            min: parse_price_param("min", params.min.as_deref())?,
            max: parse_price_param("max", params.max.as_deref())?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.min.is_none() && self.max.is_none()
    }

    /// То же условие, что и SQL в хранилище; нужно только хранилищу в памяти
    #[cfg(test)]
    pub fn matches(&self, item: &PriceItem) -> bool {
        if let Some(start) = self.start {
            if !item.create_date.is_some_and(|d| d >= start) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if !item.create_date.is_some_and(|d| d <= end) {
                return false;
            }
        }
        if let Some(min) = self.min {
            if item.price < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if item.price > max {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_date_param(
    param: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, FilterError> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FilterError::InvalidDate {
            param,
            value: value.to_string(),
        })
}

fn parse_price_param(param: &'static str, value: Option<&str>) -> Result<Option<f64>, FilterError> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };
    parse_price(value)
        .map(Some)
        .ok_or_else(|| FilterError::InvalidPrice {
            param,
            value: value.to_string(),
        })
}
