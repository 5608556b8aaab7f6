//! 실행 흐름 모듈.
//!
//! 모든 흐름은 열린 Provider 세션과 설정, 기준일(오늘)을 받습니다.
//! 종목 풀이나 조회 결과가 비어 있으면 파일을 쓰지 않고 끝냅니다.

pub mod history;
pub mod monitor;
pub mod quick;

pub use history::run_history;
pub use monitor::run_monitor;
pub use quick::run_quick;

use std::path::PathBuf;
use std::time::Instant;

use crate::stats::RunStats;

/// 실행 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// 리포트를 새로 저장
    Created(PathBuf),
    /// 기존 리포트에 새 거래일을 추가
    Updated(PathBuf),
    /// 새 거래일이 없음
    UpToDate,
    /// 조회된 가격 데이터가 없음
    NoData,
    /// 종목 풀이 비어 있음
    EmptyPool,
}

impl RunOutcome {
    /// 리포트 파일을 썼는지 여부.
    pub fn wrote_report(&self) -> bool {
        matches!(self, RunOutcome::Created(_) | RunOutcome::Updated(_))
    }
}

/// 실행 결과와 통계.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub stats: RunStats,
}

impl RunReport {
    pub(crate) fn new(outcome: RunOutcome, stats: RunStats) -> Self {
        Self { outcome, stats }
    }
}

/// 소요 시간을 기록하고 실행 결과를 만듭니다.
pub(crate) fn finish(outcome: RunOutcome, mut stats: RunStats, started: Instant) -> RunReport {
    stats.elapsed = started.elapsed();
    RunReport::new(outcome, stats)
}
