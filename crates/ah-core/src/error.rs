//! AH 프리미엄 모니터의 에러 타입.
//!
//! 이 모듈은 도메인 계층 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum AhError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type AhResult<T> = Result<T, AhError>;

impl AhError {
    /// 실행을 중단해야 하는 설정 단계 에러인지 확인합니다.
    pub fn is_config(&self) -> bool {
        matches!(self, AhError::Config(_))
    }
}

impl From<serde_json::Error> for AhError {
    fn from(err: serde_json::Error) -> Self {
        AhError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AhError {
    fn from(err: config::ConfigError) -> Self {
        AhError::Config(err.to_string())
    }
}
