//! AH 프리미엄 모니터.
//!
//! 이 crate는 세 가지 실행 흐름을 제공합니다:
//! - 모니터링 리포트 증분 갱신 (마지막 거래일 다음 날부터)
//! - 기간 분석 리포트 (통계 요약 + 상세 데이터)
//! - 간이 프리미엄 리포트 (최근 N일)

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::{load_config, open_provider};
pub use error::{MonitorError, Result};
pub use modules::{RunOutcome, RunReport};
pub use stats::RunStats;
