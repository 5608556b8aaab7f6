//! 거래일 표기 유틸리티.
//!
//! 리포트의 날짜 열 헤더와 Provider 응답의 날짜는 모두 `YYYY-MM-DD`로 통일합니다.

use chrono::{Duration, NaiveDate};

use crate::error::{AhError, AhResult};

/// 리포트/응답에서 사용하는 날짜 형식.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 날짜를 `YYYY-MM-DD` 문자열로 변환합니다.
pub fn format_trade_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 날짜 문자열을 파싱합니다.
///
/// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYYMMDD`를 허용합니다.
/// 시간 부분은 무시합니다.
pub fn parse_trade_date(raw: &str) -> AhResult<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y%m%d"))
        .map_err(|_| AhError::InvalidInput(format!("날짜 형식 오류: {}", raw)))
}

/// 스프레드시트 날짜 일련번호(1900 체계)를 날짜로 변환합니다.
pub fn date_from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
