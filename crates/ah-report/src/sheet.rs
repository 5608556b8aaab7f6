//! 워크북과 독립적인 시트 표현.

use ah_core::{format_trade_date, parse_trade_date, DecimalExt};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// 시트 셀 값.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Decimal 값. `None`이면 빈 셀.
    pub fn decimal(value: Option<Decimal>) -> Self {
        match value {
            Some(v) => Cell::Number(v.to_cell_value()),
            None => Cell::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// 셀을 Decimal로 해석합니다. 비어 있거나 숫자가 아니면 `None`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Number(v) => ah_core::decimal_from_f64(*v),
            Cell::Text(s) => Decimal::from_str(s.trim()).ok(),
            Cell::Empty | Cell::Date(_) => None,
        }
    }

    /// 셀을 날짜로 해석합니다 (문자열, 날짜, 날짜 일련번호).
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_trade_date(s).ok(),
            Cell::Number(v) => ah_core::date_from_excel_serial(*v),
            Cell::Empty => None,
        }
    }

    /// 셀을 문자열로 표시합니다. 빈 셀은 `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Cell::Text(_) | Cell::Empty => None,
            Cell::Number(v) => Some(v.to_string()),
            Cell::Date(d) => Some(format_trade_date(*d)),
        }
    }
}

/// 이름, 헤더 행, 데이터 행으로 구성된 시트.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// 헤더 이름의 열 위치.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversions() {
        assert_eq!(Cell::Number(0.25).as_decimal(), Some(Decimal::new(25, 2)));
        assert_eq!(Cell::text(" 1.5 ").as_decimal(), Some(Decimal::new(15, 1)));
        assert_eq!(Cell::Number(f64::NAN).as_decimal(), None);
        assert_eq!(Cell::Empty.as_decimal(), None);
        assert!(Cell::decimal(None).is_empty());
    }

    #[test]
    fn test_cell_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(Cell::text("2024-01-01").as_date(), expected);
        assert_eq!(Cell::Number(45292.0).as_date(), expected);
        assert_eq!(Cell::text("stock_name").as_date(), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::text("  ").as_text(), None);
        assert_eq!(
            Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()).as_text(),
            Some("2024-01-02".to_string())
        );
    }
}
