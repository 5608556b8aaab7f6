//! 리포트 워크북 구성.
//!
//! - 모니터링 리포트: 지표별 wide 테이블 4개 (프리미엄, A주 종가, H주 종가, 환율)
//! - 기간 분석 리포트: 통계 요약 + long format 상세 데이터
//! - 간이 리포트: long format 상세 데이터 한 시트

use ah_core::{PriceObservation, StatSummary};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

use crate::error::{ReportError, Result};
use crate::sheet::{Cell, SheetTable};
use crate::wide::{Metric, WideTable};
use crate::workbook::{read_sheets, write_workbook};

/// 기간 분석 리포트의 통계 요약 시트.
pub const SUMMARY_SHEET: &str = "统计摘要";
/// 기간 분석 리포트의 상세 데이터 시트.
pub const DETAIL_SHEET: &str = "详细数据";
/// 간이 리포트 시트.
pub const QUICK_SHEET: &str = "Sheet1";

const OBSERVATION_HEADERS: [&str; 8] = [
    "date",
    "stock_name",
    "A_stock_code",
    "H_stock_code",
    "A_price",
    "H_price",
    "exchange_rate",
    "HA_premium_rate",
];

const STATS_HEADERS: [&str; 10] = [
    "stock_name",
    "A_stock_code",
    "H_stock_code",
    "premium_mean",
    "premium_median",
    "premium_min",
    "premium_max",
    "premium_p5",
    "premium_p95",
    "premium_std",
];

/// long format 관측치 시트.
pub fn observations_sheet(name: &str, observations: &[PriceObservation]) -> SheetTable {
    let mut sheet = SheetTable::new(name, headers(&OBSERVATION_HEADERS));
    for row in observations {
        sheet.push_row(vec![
            Cell::Date(row.date),
            Cell::text(row.stock_name.clone()),
            Cell::text(row.a_code.clone()),
            Cell::text(row.h_code.clone()),
            Cell::decimal(Some(row.a_price)),
            Cell::decimal(Some(row.h_price)),
            Cell::decimal(Some(row.fx_rate)),
            Cell::decimal(row.premium),
        ]);
    }
    sheet
}

/// 종목별 통계 요약 시트.
pub fn stats_sheet(name: &str, stats: &[StatSummary]) -> SheetTable {
    let mut sheet = SheetTable::new(name, headers(&STATS_HEADERS));
    for s in stats {
        sheet.push_row(vec![
            Cell::text(s.stock_name.clone()),
            Cell::text(s.a_code.clone()),
            Cell::text(s.h_code.clone()),
            Cell::decimal(s.premium_mean),
            Cell::decimal(s.premium_median),
            Cell::decimal(s.premium_min),
            Cell::decimal(s.premium_max),
            Cell::decimal(s.premium_p5),
            Cell::decimal(s.premium_p95),
            Cell::decimal(s.premium_std),
        ]);
    }
    sheet
}

/// 기간 분석 리포트 시트 (통계 요약, 상세 데이터 순).
pub fn history_sheets(stats: &[StatSummary], observations: &[PriceObservation]) -> Vec<SheetTable> {
    vec![
        stats_sheet(SUMMARY_SHEET, stats),
        observations_sheet(DETAIL_SHEET, observations),
    ]
}

/// 간이 리포트 시트.
pub fn quick_sheet(observations: &[PriceObservation]) -> SheetTable {
    observations_sheet(QUICK_SHEET, observations)
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// 모니터링 리포트.
///
/// 네 테이블은 항상 같은 행/열 집합을 가집니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorReport {
    pub premium: WideTable,
    pub a_price: WideTable,
    pub h_price: WideTable,
    pub fx_rate: WideTable,
}

impl MonitorReport {
    /// 관측치를 지표별로 pivot합니다.
    pub fn from_observations(observations: &[PriceObservation]) -> Self {
        Self {
            premium: WideTable::pivot(observations, Metric::Premium),
            a_price: WideTable::pivot(observations, Metric::APrice),
            h_price: WideTable::pivot(observations, Metric::HPrice),
            fx_rate: WideTable::pivot(observations, Metric::FxRate),
        }
    }

    pub fn table(&self, metric: Metric) -> &WideTable {
        match metric {
            Metric::Premium => &self.premium,
            Metric::APrice => &self.a_price,
            Metric::HPrice => &self.h_price,
            Metric::FxRate => &self.fx_rate,
        }
    }

    /// 테이블별로 새 열을 이어 붙입니다.
    pub fn merge(&self, newer: &MonitorReport) -> MonitorReport {
        MonitorReport {
            premium: self.premium.merge(&newer.premium),
            a_price: self.a_price.merge(&newer.a_price),
            h_price: self.h_price.merge(&newer.h_price),
            fx_rate: self.fx_rate.merge(&newer.fx_rate),
        }
    }

    /// 프리미엄 시트의 마지막 날짜.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.premium.last_date()
    }

    /// 종목 수.
    pub fn stock_count(&self) -> usize {
        self.premium.rows().len()
    }

    /// 날짜 열 수.
    pub fn date_count(&self) -> usize {
        self.premium.columns().len()
    }

    /// 기존 리포트를 읽습니다. 네 시트가 모두 있어야 합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let names = Metric::ALL.map(|m| m.sheet_name());
        let sheets = read_sheets(path, &names)?;

        let mut tables = sheets.iter().map(WideTable::from_sheet);
        let mut next = || {
            tables
                .next()
                .unwrap_or_else(|| Err(ReportError::Read("시트 수가 부족합니다".to_string())))
        };

        Ok(Self {
            premium: next()?,
            a_price: next()?,
            h_price: next()?,
            fx_rate: next()?,
        })
    }

    /// 네 시트를 저장합니다 (기존 파일 교체).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let sheets: Vec<SheetTable> = Metric::ALL
            .iter()
            .map(|m| self.table(*m).to_sheet(m.sheet_name()))
            .collect();
        write_workbook(path, &sheets)?;

        info!(
            path = %path.display(),
            stocks = self.stock_count(),
            dates = self.date_count(),
            "모니터링 리포트 저장"
        );
        Ok(())
    }
}
