//! 스프레드시트 리포트 계층.
//!
//! 이 crate는 다음을 제공합니다:
//! - long format 관측치 → 종목 × 거래일 wide 테이블 변환 (pivot)
//! - 기존 wide 테이블 뒤에 새 거래일 열을 붙이는 증분 병합
//! - 모니터링/기간 분석/간이 리포트 워크북 구성
//! - xlsx 읽기(calamine) 및 원자적 쓰기(rust_xlsxwriter)

pub mod error;
pub mod reports;
pub mod sheet;
pub mod wide;
pub mod workbook;

pub use error::{ReportError, Result};
pub use reports::{
    history_sheets, observations_sheet, quick_sheet, stats_sheet, MonitorReport, DETAIL_SHEET,
    QUICK_SHEET, SUMMARY_SHEET,
};
pub use sheet::{Cell, SheetTable};
pub use wide::{Metric, WideTable, LABEL_HEADER};
pub use workbook::{read_sheet, read_sheets, write_workbook};
