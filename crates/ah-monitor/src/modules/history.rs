//! 기간 분석 리포트.
//!
//! [시작일, 종료일] 전체 구간을 조회하여 종목별 통계 요약과 상세 데이터를
//! 기간이 찍힌 파일 하나로 저장합니다.

use chrono::NaiveDate;
use std::time::Instant;
use tracing::{info, warn};

use ah_core::{summarize_premiums, AppConfig, DecimalExt};
use ah_data::{fetch_premium_data, resolve_stock_pool, MarketDataSession};
use ah_report::{history_sheets, write_workbook};

use super::{finish, RunOutcome, RunReport};
use crate::error::MonitorError;
use crate::stats::RunStats;
use crate::Result;

/// 기간 분석 리포트를 생성합니다.
pub async fn run_history(
    session: &dyn MarketDataSession,
    config: &AppConfig,
    today: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RunReport> {
    if start > end {
        return Err(MonitorError::Config(format!(
            "시작일({})이 종료일({})보다 늦습니다",
            start, end
        )));
    }

    let started = Instant::now();
    let mut stats = RunStats::new();

    info!("Step 1/3: 종목 풀 조회");
    let pool = resolve_stock_pool(session, &config.universe, today).await?;
    stats.pool_size = pool.len();
    if pool.is_empty() {
        warn!("종목 풀을 가져오지 못해 실행을 종료합니다");
        return Ok(finish(RunOutcome::EmptyPool, stats, started));
    }

    info!(%start, %end, "Step 2/3: 상세 프리미엄 데이터 조회");
    let rows = fetch_premium_data(session, &pool, &config.universe, start, Some(end)).await?;
    stats.rows = rows.len();
    if rows.is_empty() {
        warn!("상세 프리미엄 데이터를 가져오지 못해 실행을 종료합니다");
        return Ok(finish(RunOutcome::NoData, stats, started));
    }

    info!("Step 3/3: 통계 요약 계산 및 저장");
    let summary = summarize_premiums(&rows);
    for s in summary.iter().take(5) {
        info!(
            stock = %s.stock_name,
            mean = %s.premium_mean.map(|v| v.to_percentage_string()).unwrap_or_default(),
            median = %s.premium_median.map(|v| v.to_percentage_string()).unwrap_or_default(),
            "통계 요약 미리보기"
        );
    }

    let path = config.report.history_path(start, end);
    write_workbook(&path, &history_sheets(&summary, &rows))?;
    info!(path = %path.display(), "기간 분석 리포트 저장");

    let mut dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    dates.dedup();
    stats.new_dates = dates.len();
    stats.total_dates = dates.len();
    stats.stocks = summary.len();

    Ok(finish(RunOutcome::Created(path), stats, started))
}
