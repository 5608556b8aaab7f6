//! 리포트 모듈 오류 타입.

use thiserror::Error;

/// 리포트 읽기/쓰기 오류.
#[derive(Debug, Error)]
pub enum ReportError {
    /// 워크북을 열거나 읽을 수 없음
    #[error("Workbook read error: {0}")]
    Read(String),

    /// 워크북 저장 실패
    #[error("Workbook write error: {0}")]
    Write(String),

    /// 필요한 시트가 없음
    #[error("Missing sheet: {0}")]
    MissingSheet(String),

    /// 시트 구조가 기대와 다름
    #[error("Invalid sheet {sheet}: {reason}")]
    InvalidSheet { sheet: String, reason: String },

    /// 파일 시스템 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub(crate) fn invalid(sheet: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::InvalidSheet {
            sheet: sheet.into(),
            reason: reason.into(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Write(err.to_string())
    }
}

impl From<calamine::XlsxError> for ReportError {
    fn from(err: calamine::XlsxError) -> Self {
        ReportError::Read(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
