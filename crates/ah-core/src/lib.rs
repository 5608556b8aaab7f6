//! # AH Core
//!
//! AH 프리미엄 모니터의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 풀 (A주 코드 ↔ H주 코드 ↔ 종목명)
//! - 일별 가격 관측치 및 프리미엄 계산
//! - 종목별 프리미엄 통계 요약
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
