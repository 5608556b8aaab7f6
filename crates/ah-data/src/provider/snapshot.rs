//! JSON 스냅샷 Provider.
//!
//! 단말 없이 같은 파이프라인을 재현하기 위한 오프라인 Provider입니다.
//! 스냅샷 파일 형식:
//!
//! ```json
//! {
//!   "trade_days": ["2024-01-02", "2024-01-03"],
//!   "sectors": {
//!     "a002010600000000": [{"code": "0939.HK", "name": "建设银行"}]
//!   },
//!   "a_share_codes": {"0939.HK": "601939.SH"},
//!   "closes": {
//!     "601939.SH": {"2024-01-02": 6.5},
//!     "0939.HK": {"2024-01-02": 4.8},
//!     "HKDCNYFIX.HKS": {"2024-01-02": 0.91}
//!   }
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use ah_core::format_trade_date;
use serde_json::Value;

use super::response::{CloseSeries, RawResponse, SectorConstituents, SectorMember, ShareMapping};
use super::{MarketDataProvider, MarketDataSession};
use crate::error::{DataError, Result};

/// 시장 데이터 스냅샷.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// 거래일 (정렬되지 않아도 로드 시 정렬됨)
    #[serde(default)]
    pub trade_days: Vec<NaiveDate>,
    /// 섹터 ID → 구성 종목
    #[serde(default)]
    pub sectors: BTreeMap<String, Vec<SectorMember>>,
    /// H주 코드 → A주 코드
    #[serde(default)]
    pub a_share_codes: BTreeMap<String, Option<String>>,
    /// 코드 → (거래일 → 종가)
    #[serde(default)]
    pub closes: BTreeMap<String, BTreeMap<NaiveDate, Option<Decimal>>>,
}

impl MarketSnapshot {
    /// 파일에서 스냅샷을 읽습니다.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DataError::Io(format!("스냅샷 파일을 읽을 수 없습니다 {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// JSON 문자열에서 스냅샷을 읽습니다.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut snapshot: MarketSnapshot = serde_json::from_str(content)?;
        snapshot.normalize();
        Ok(snapshot)
    }

    /// 스냅샷을 파일로 저장합니다.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.trade_days.sort();
        self.trade_days.dedup();
    }

    /// 거래일을 추가합니다.
    pub fn with_trade_days(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.trade_days.extend(days);
        self.normalize();
        self
    }

    /// 섹터 구성 종목을 추가합니다.
    pub fn with_sector_member(
        mut self,
        sector_id: &str,
        code: &str,
        name: Option<&str>,
    ) -> Self {
        self.sectors
            .entry(sector_id.to_string())
            .or_default()
            .push(SectorMember {
                code: code.to_string(),
                name: name.map(str::to_string),
            });
        self
    }

    /// H주 → A주 코드 매핑을 추가합니다.
    pub fn with_a_share_code(mut self, h_code: &str, a_code: Option<&str>) -> Self {
        self.a_share_codes
            .insert(h_code.to_string(), a_code.map(str::to_string));
        self
    }

    /// 종가를 추가합니다.
    pub fn with_close(mut self, code: &str, date: NaiveDate, close: Option<Decimal>) -> Self {
        self.closes
            .entry(code.to_string())
            .or_default()
            .insert(date, close);
        self
    }
}

/// 스냅샷 Provider.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: Arc<MarketSnapshot>,
}

impl SnapshotProvider {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    /// 파일에서 스냅샷을 읽어 Provider를 생성합니다.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(MarketSnapshot::from_path(path)?))
    }
}

#[async_trait]
impl MarketDataProvider for SnapshotProvider {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn start(&self) -> Result<Box<dyn MarketDataSession>> {
        Ok(Box::new(SnapshotSession {
            snapshot: self.snapshot.clone(),
        }))
    }
}

struct SnapshotSession {
    snapshot: Arc<MarketSnapshot>,
}

#[async_trait]
impl MarketDataSession for SnapshotSession {
    async fn trade_day_offset(&self, offset: i32, date: NaiveDate) -> Result<NaiveDate> {
        let days = &self.snapshot.trade_days;
        // date 이하 최근 거래일의 위치
        let anchor = days.partition_point(|d| *d <= date);
        if anchor == 0 {
            return Err(DataError::empty("tdaysoffset"));
        }

        let target = (anchor - 1) as i64 + i64::from(offset);
        usize::try_from(target)
            .ok()
            .and_then(|idx| days.get(idx))
            .copied()
            .ok_or_else(|| DataError::empty("tdaysoffset"))
    }

    async fn sector_constituents(
        &self,
        _date: NaiveDate,
        sector_id: &str,
    ) -> Result<SectorConstituents> {
        let members = self
            .snapshot
            .sectors
            .get(sector_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let codes = members.iter().map(|m| Value::from(m.code.clone())).collect();
        let names = members
            .iter()
            .map(|m| m.name.clone().map_or(Value::Null, Value::from))
            .collect();
        let raw = RawResponse::ok(
            vec![],
            vec!["wind_code".to_string(), "sec_name".to_string()],
            vec![],
            vec![codes, names],
        );
        SectorConstituents::from_raw(raw, &format!("wset sectorconstituent {}", sector_id))
    }

    async fn paired_a_codes(&self, h_codes: &[String]) -> Result<ShareMapping> {
        let column = h_codes
            .iter()
            .map(|h_code| {
                self.snapshot
                    .a_share_codes
                    .get(h_code)
                    .cloned()
                    .flatten()
                    .map_or(Value::Null, Value::from)
            })
            .collect();
        let raw = RawResponse::ok(
            h_codes.to_vec(),
            vec!["ASHAREWINDCODE".to_string()],
            vec![],
            vec![column],
        );
        ShareMapping::from_raw(raw, h_codes, "wss asharewindcode")
    }

    async fn close_series(
        &self,
        codes: &[String],
        field: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<CloseSeries> {
        let times: Vec<NaiveDate> = self
            .snapshot
            .trade_days
            .iter()
            .copied()
            .filter(|d| *d >= start && end.map_or(true, |end| *d <= end))
            .collect();

        let data = codes
            .iter()
            .map(|code| {
                let series = self.snapshot.closes.get(code);
                times
                    .iter()
                    .map(|date| {
                        series
                            .and_then(|s| s.get(date).copied().flatten())
                            .map_or(Value::Null, |close| Value::from(close.to_string()))
                    })
                    .collect()
            })
            .collect();
        let raw = RawResponse::ok(
            codes.to_vec(),
            vec![field.to_uppercase()],
            times.iter().map(|d| format_trade_date(*d)).collect(),
            data,
        );
        CloseSeries::from_raw(raw, &format!("wsd {}", field))
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}
