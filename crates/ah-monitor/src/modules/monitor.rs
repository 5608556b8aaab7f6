//! 모니터링 리포트 증분 갱신.
//!
//! 1. 종목 풀 조회 (비어 있으면 종료)
//! 2. 기존 리포트의 마지막 날짜 다음 날을 시작일로 결정 (없거나 읽을 수 없으면 처음부터)
//! 3. 시작일이 최근 거래일이나 오늘보다 늦으면 종료
//! 4. [시작일, 오늘] 구간 조회 후 지표별 pivot
//! 5. 기존 테이블 뒤에 새 열을 붙여 저장

use chrono::{Duration, NaiveDate};
use std::time::Instant;
use tracing::{info, warn};

use ah_core::AppConfig;
use ah_data::{fetch_premium_data, resolve_stock_pool, MarketDataSession};
use ah_report::MonitorReport;

use super::{finish, RunOutcome, RunReport};
use crate::stats::RunStats;
use crate::Result;

/// 모니터링 리포트를 갱신합니다.
pub async fn run_monitor(
    session: &dyn MarketDataSession,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<RunReport> {
    let started = Instant::now();
    let mut stats = RunStats::new();
    let path = &config.report.monitor_path;

    info!("Step 1/4: 종목 풀 조회");
    let pool = resolve_stock_pool(session, &config.universe, today).await?;
    stats.pool_size = pool.len();
    if pool.is_empty() {
        warn!("종목 풀을 가져오지 못해 실행을 종료합니다");
        return Ok(finish(RunOutcome::EmptyPool, stats, started));
    }

    info!("Step 2/4: 기존 리포트 확인");
    let existing = load_existing(path);
    let start = match existing.as_ref().and_then(MonitorReport::last_date) {
        Some(last) => last + Duration::days(1),
        None => config.report.monitor_start,
    };

    match session.trade_day_offset(0, today).await {
        Ok(latest) if start > latest => {
            info!(%latest, "데이터가 이미 최신입니다");
            return Ok(finish(RunOutcome::UpToDate, stats, started));
        }
        Ok(_) => {}
        Err(e) if e.is_no_data() => {
            warn!(error = %e, "최근 거래일을 확인하지 못했습니다");
        }
        Err(e) => return Err(e.into()),
    }
    if start > today {
        info!("데이터가 이미 최신입니다");
        return Ok(finish(RunOutcome::UpToDate, stats, started));
    }

    info!(%start, end = %today, "Step 3/4: 프리미엄 데이터 조회");
    let rows = fetch_premium_data(session, &pool, &config.universe, start, Some(today)).await?;
    stats.rows = rows.len();
    if rows.is_empty() {
        warn!("새 데이터를 가져오지 못했습니다. 당일 데이터가 아직 갱신되지 않았을 수 있습니다");
        return Ok(finish(RunOutcome::NoData, stats, started));
    }

    info!("Step 4/4: 리포트 저장");
    let window = MonitorReport::from_observations(&rows);
    stats.new_dates = window.date_count();

    let (report, outcome) = match existing {
        Some(existing) => {
            info!("기존 데이터와 병합합니다");
            (existing.merge(&window), RunOutcome::Updated(path.clone()))
        }
        None => {
            info!("새 리포트를 생성합니다");
            (window, RunOutcome::Created(path.clone()))
        }
    };
    report.save(path)?;

    stats.total_dates = report.date_count();
    stats.stocks = report.stock_count();
    Ok(finish(outcome, stats, started))
}

/// 기존 리포트를 읽습니다. 없거나 읽을 수 없으면 `None`.
fn load_existing(path: &std::path::Path) -> Option<MonitorReport> {
    if !path.exists() {
        info!(path = %path.display(), "기존 리포트가 없어 새로 생성합니다");
        return None;
    }

    match MonitorReport::load(path) {
        Ok(report) => {
            info!(
                path = %path.display(),
                last_date = ?report.last_date(),
                "기존 리포트를 증분 갱신합니다"
            );
            Some(report)
        }
        Err(e) => {
            warn!(error = %e, "기존 리포트를 읽지 못해 처음부터 다시 생성합니다");
            None
        }
    }
}
