//! 실행 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 한 번의 실행 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// 종목 풀 크기
    pub pool_size: usize,
    /// 조회된 관측치 행 수 (결측 행 제외 후)
    pub rows: usize,
    /// 이번 실행에서 추가된 거래일 수
    pub new_dates: usize,
    /// 저장된 리포트의 전체 거래일 수
    pub total_dates: usize,
    /// 저장된 리포트의 종목 수
    pub stocks: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            pool_size = self.pool_size,
            rows = self.rows,
            new_dates = self.new_dates,
            total_dates = self.total_dates,
            stocks = self.stocks,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "실행 완료"
        );
    }
}
