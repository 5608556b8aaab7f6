//! Provider 응답 타입.
//!
//! 단말은 모든 조회에 대해 같은 모양의 결과 객체를 돌려줍니다:
//! `ErrorCode`, `Codes`, `Fields`, `Times`, `Data` (열 우선: `Data[i]`가 i번째 코드 또는 필드).
//! 이 모듈은 그 원시 응답을 경계에서 검증하여 조회 종류별 타입으로 변환합니다.

use ah_core::{decimal_from_f64, parse_trade_date};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{DataError, Result};

/// 단말 원시 응답.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    /// 0이면 성공
    #[serde(rename = "ErrorCode")]
    pub error_code: i64,
    #[serde(rename = "Codes", default)]
    pub codes: Vec<String>,
    #[serde(rename = "Fields", default)]
    pub fields: Vec<String>,
    #[serde(rename = "Times", default)]
    pub times: Vec<String>,
    #[serde(rename = "Data", default)]
    pub data: Vec<Vec<Value>>,
}

impl RawResponse {
    /// 성공 응답을 만듭니다.
    pub fn ok(
        codes: Vec<String>,
        fields: Vec<String>,
        times: Vec<String>,
        data: Vec<Vec<Value>>,
    ) -> Self {
        Self {
            error_code: 0,
            codes,
            fields,
            times,
            data,
        }
    }

    /// 실패 응답을 만듭니다.
    pub fn failed(error_code: i64) -> Self {
        Self {
            error_code,
            ..Default::default()
        }
    }

    /// ErrorCode와 빈 응답을 검사합니다.
    pub fn check(self, query: &str) -> Result<Self> {
        if self.error_code != 0 {
            return Err(DataError::provider(query, self.error_code));
        }
        if self.data.first().map_or(true, |column| column.is_empty()) {
            return Err(DataError::empty(query));
        }
        Ok(self)
    }

    /// 필드 이름의 열 위치 (대소문자 무시).
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.eq_ignore_ascii_case(name))
    }

    /// `tdaysoffset` 응답에서 거래일을 꺼냅니다.
    pub fn into_trade_day(self, query: &str) -> Result<NaiveDate> {
        let raw = self.check(query)?;
        let value = &raw.data[0][0];
        value_as_date(value).ok_or_else(|| {
            DataError::InvalidData(format!("{}: 거래일을 해석할 수 없습니다: {}", query, value))
        })
    }
}

/// 섹터 구성 종목 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorMember {
    /// 종목 코드
    pub code: String,
    /// 표시 이름
    pub name: Option<String>,
}

/// 섹터 구성 종목 (`wset sectorconstituent`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorConstituents {
    pub members: Vec<SectorMember>,
}

impl SectorConstituents {
    /// `wind_code` 필드는 필수이고 `sec_name`은 선택입니다.
    pub fn from_raw(raw: RawResponse, query: &str) -> Result<Self> {
        let raw = raw.check(query)?;

        let code_idx = raw.field_index("wind_code").ok_or_else(|| {
            DataError::InvalidData(format!("{}: 'wind_code' 필드가 없습니다", query))
        })?;
        let name_idx = raw.field_index("sec_name");

        let codes = raw.data.get(code_idx).ok_or_else(|| {
            DataError::InvalidData(format!("{}: 'wind_code' 열이 없습니다", query))
        })?;
        let names = name_idx.and_then(|idx| raw.data.get(idx));

        let members = codes
            .iter()
            .enumerate()
            .filter_map(|(row, code)| {
                let code = value_as_string(code)?;
                let name = names
                    .and_then(|column| column.get(row))
                    .and_then(value_as_string);
                Some(SectorMember { code, name })
            })
            .collect();

        Ok(Self { members })
    }

    /// 종목 코드 집합.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.code.as_str())
    }

    /// 코드의 표시 이름 (처음 나온 항목 기준).
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.code == code)
            .and_then(|m| m.name.as_deref())
    }
}

/// H주 → A주 코드 매핑 (`wss asharewindcode`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareMapping {
    /// (H주 코드, A주 코드). A주가 없으면 `None`
    pub pairs: Vec<(String, Option<String>)>,
}

impl ShareMapping {
    /// 응답의 `Codes`가 비어 있으면 요청한 코드 순서를 사용합니다.
    pub fn from_raw(raw: RawResponse, requested: &[String], query: &str) -> Result<Self> {
        let raw = raw.check(query)?;
        let codes: &[String] = if raw.codes.is_empty() {
            requested
        } else {
            &raw.codes
        };

        let column = &raw.data[0];
        if column.len() != codes.len() {
            return Err(DataError::InvalidData(format!(
                "{}: 코드 {}개에 값 {}개",
                query,
                codes.len(),
                column.len()
            )));
        }

        let pairs = codes
            .iter()
            .zip(column)
            .map(|(h_code, a_code)| (h_code.clone(), value_as_string(a_code)))
            .collect();

        Ok(Self { pairs })
    }
}

/// 종가 시계열 (`wsd`).
///
/// `values[code][time]`, 결측은 `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloseSeries {
    pub times: Vec<NaiveDate>,
    pub codes: Vec<String>,
    pub values: Vec<Vec<Option<Decimal>>>,
}

impl CloseSeries {
    pub fn from_raw(raw: RawResponse, query: &str) -> Result<Self> {
        let raw = raw.check(query)?;

        let times = raw
            .times
            .iter()
            .map(|t| parse_trade_date(t).map_err(DataError::from))
            .collect::<Result<Vec<_>>>()?;

        if raw.data.len() != raw.codes.len() {
            return Err(DataError::InvalidData(format!(
                "{}: 코드 {}개에 데이터 열 {}개",
                query,
                raw.codes.len(),
                raw.data.len()
            )));
        }

        let values = raw
            .data
            .iter()
            .map(|column| {
                if column.len() != times.len() {
                    return Err(DataError::InvalidData(format!(
                        "{}: 날짜 {}개에 값 {}개",
                        query,
                        times.len(),
                        column.len()
                    )));
                }
                Ok(column.iter().map(value_as_decimal).collect())
            })
            .collect::<Result<Vec<Vec<_>>>>()?;

        Ok(Self {
            times,
            codes: raw.codes,
            values,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.codes.is_empty()
    }

    /// wide(코드 × 날짜) → long(날짜, 코드, 값) 변환.
    pub fn iter_long(&self) -> impl Iterator<Item = (NaiveDate, &str, Option<Decimal>)> + '_ {
        self.codes.iter().enumerate().flat_map(move |(ci, code)| {
            self.times
                .iter()
                .enumerate()
                .map(move |(ti, date)| (*date, code.as_str(), self.values[ci][ti]))
        })
    }

    /// 단일 코드 시계열을 날짜별로 꺼냅니다.
    pub fn series(&self, code: &str) -> Option<impl Iterator<Item = (NaiveDate, Option<Decimal>)> + '_> {
        let idx = self.codes.iter().position(|c| c == code)?;
        Some(
            self.times
                .iter()
                .zip(&self.values[idx])
                .map(|(date, value)| (*date, *value)),
        )
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.as_f64().and_then(decimal_from_f64),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn value_as_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_trade_date(s).ok(),
        _ => None,
    }
}
