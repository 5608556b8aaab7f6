//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// Provider 세션을 열 수 없음 (실행 중단 사유)
    #[error("Provider connection error: {0}")]
    ConnectionError(String),

    /// Provider가 0이 아닌 ErrorCode를 반환
    #[error("Provider error on {query}: ErrorCode={code}")]
    ProviderError { query: String, code: i64 },

    /// Provider 응답에 데이터가 없음
    #[error("Empty payload from {query}")]
    EmptyPayload { query: String },

    /// 응답 구조가 기대와 다름
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 데이터 가져오기 오류 (전송 계층)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 스냅샷 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(String),
}

impl DataError {
    /// "데이터 없음"으로 취급할 오류인지 확인합니다.
    ///
    /// 조회 오류 코드와 빈 응답은 해당 단계를 빈 결과로 끝내고 실행만 중단합니다.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            DataError::ProviderError { .. } | DataError::EmptyPayload { .. }
        )
    }

    pub(crate) fn provider(query: impl Into<String>, code: i64) -> Self {
        DataError::ProviderError {
            query: query.into(),
            code,
        }
    }

    pub(crate) fn empty(query: impl Into<String>) -> Self {
        DataError::EmptyPayload {
            query: query.into(),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::SerializationError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Io(err.to_string())
    }
}

impl From<ah_core::AhError> for DataError {
    fn from(err: ah_core::AhError) -> Self {
        DataError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
