//! 에러 타입 정의.

use std::fmt;

use ah_core::AhError;
use ah_data::DataError;
use ah_report::ReportError;

/// 모니터 실행 에러 타입
#[derive(Debug)]
pub enum MonitorError {
    /// 설정 에러
    Config(String),
    /// 시장 데이터 에러 (세션 시작 실패, 전송 오류 등)
    Data(DataError),
    /// 리포트 파일 에러
    Report(ReportError),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Data(e) => write!(f, "Market data error: {}", e),
            Self::Report(e) => write!(f, "Report error: {}", e),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(_) => None,
            Self::Data(e) => Some(e),
            Self::Report(e) => Some(e),
        }
    }
}

impl From<DataError> for MonitorError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

impl From<ReportError> for MonitorError {
    fn from(err: ReportError) -> Self {
        Self::Report(err)
    }
}

impl From<AhError> for MonitorError {
    fn from(err: AhError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, MonitorError>;
