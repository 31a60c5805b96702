use chrono::NaiveDate;
use contracts::domain::a001_price_item::{PriceItem, DATE_FORMAT};
use std::fmt;

/// Минимальное число полей в строке: id, name, category, price, create_date
pub const REQUIRED_FIELDS: usize = 5;

/// Результат разбора одной CSV строки
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Строка 0 файла, не проверяется
    Header,
    Accepted(PriceItem),
    Rejected(RowRejection),
}

/// Причина, по которой строка не стала позицией прайса
#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    /// Меньше пяти полей; такая строка не участвует в подсчётах
    Malformed { fields: usize },
    InvalidId { value: String },
    InvalidPrice { id: i64, value: String },
    InvalidDate { id: i64, value: String },
}

impl RowRejection {
    /// id строки, если он успел разобраться до ошибки
    pub fn id(&self) -> Option<i64> {
        match self {
            RowRejection::Malformed { .. } | RowRejection::InvalidId { .. } => None,
            RowRejection::InvalidPrice { id, .. } | RowRejection::InvalidDate { id, .. } => {
                Some(*id)
            }
        }
    }

    /// Учитывается ли строка в `total_count`
    pub fn is_counted(&self) -> bool {
        !matches!(self, RowRejection::Malformed { .. })
    }
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::Malformed { fields } => {
                write!(f, "malformed row: {} of {} fields", fields, REQUIRED_FIELDS)
            }
            RowRejection::InvalidId { value } => write!(f, "invalid id {:?}", value),
            RowRejection::InvalidPrice { value, .. } => write!(f, "invalid price {:?}", value),
            RowRejection::InvalidDate { value, .. } => write!(f, "invalid date {:?}", value),
        }
    }
}

/// Разбирает одну запись CSV. `position` — номер записи в файле, начиная с 0.
///
/// Функция чистая: ничего не пишет и не считает, только возвращает решение.
pub fn parse_row<'a, I>(fields: I, position: usize) -> RowOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    if position == 0 {
        return RowOutcome::Header;
    }

    let fields: Vec<&str> = fields.into_iter().map(str::trim).collect();
    if fields.len() < REQUIRED_FIELDS {
        return RowOutcome::Rejected(RowRejection::Malformed {
            fields: fields.len(),
        });
    }

    let id = match fields[0].parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            return RowOutcome::Rejected(RowRejection::InvalidId {
                value: fields[0].to_string(),
            })
        }
    };

    let price = match parse_price(fields[3]) {
        Some(price) => price,
        None => {
            return RowOutcome::Rejected(RowRejection::InvalidPrice {
                id,
                value: fields[3].to_string(),
            })
        }
    };

    let create_date = match NaiveDate::parse_from_str(fields[4], DATE_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            return RowOutcome::Rejected(RowRejection::InvalidDate {
                id,
                value: fields[4].to_string(),
            })
        }
    };

    RowOutcome::Accepted(PriceItem::new(id, fields[1], fields[2], price, create_date))
}

/// Любое конечное вещественное число; NaN и бесконечности отбрасываются
pub fn parse_price(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_header_is_skipped_without_validation() {
        let outcome = parse_row(["id", "name", "category", "price", "create_date"], 0);
        assert_eq!(outcome, RowOutcome::Header);

        // Даже мусор на позиции 0 не проверяется
        assert_eq!(parse_row(["x"], 0), RowOutcome::Header);
    }

    #[test]
    fn test_valid_row_is_trimmed_and_parsed() {
        let outcome = parse_row([" 7 ", "  Milk ", "Dairy  ", " 2.50", "2024-01-01 "], 3);
        assert_eq!(
            outcome,
            RowOutcome::Accepted(PriceItem::new(7, "Milk", "Dairy", 2.5, date(2024, 1, 1)))
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let outcome = parse_row(["1", "Milk", "Dairy", "2.5", "2024-01-01", "extra"], 1);
        assert!(matches!(outcome, RowOutcome::Accepted(_)));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let outcome = parse_row(["1", "Milk", "Dairy", "2.5"], 1);
        let RowOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(rejection, RowRejection::Malformed { fields: 4 });
        assert!(!rejection.is_counted());
        assert_eq!(rejection.id(), None);
    }

    #[test]
    fn test_invalid_id() {
        let outcome = parse_row(["abc", "Milk", "Dairy", "2.5", "2024-01-01"], 1);
        let RowOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert!(matches!(rejection, RowRejection::InvalidId { .. }));
        assert!(rejection.is_counted());
        assert_eq!(rejection.id(), None);
    }

    #[test]
    fn test_invalid_price_keeps_id() {
        let outcome = parse_row(["5", "Milk", "Dairy", "cheap", "2024-01-01"], 1);
        let RowOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(
            rejection,
            RowRejection::InvalidPrice {
                id: 5,
                value: "cheap".to_string()
            }
        );
        assert_eq!(rejection.id(), Some(5));
    }

    #[test]
    fn test_invalid_date() {
        let outcome = parse_row(["3", "Eggs", "Dairy", "3.00", "not-a-date"], 2);
        let RowOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(
            rejection,
            RowRejection::InvalidDate {
                id: 3,
                value: "not-a-date".to_string()
            }
        );
        assert!(rejection.is_counted());
    }

    #[test]
    fn test_impossible_calendar_date() {
        let outcome = parse_row(["3", "Eggs", "Dairy", "3.00", "2024-02-30"], 2);
        assert!(matches!(
            outcome,
            RowOutcome::Rejected(RowRejection::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("2.50"), Some(2.5));
        assert_eq!(parse_price("-1"), Some(-1.0));
        assert_eq!(parse_price("1e2"), Some(100.0));
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("5309,00"), None);
    }
}
