//! 간이 프리미엄 리포트 (최근 N일 long format).

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{info, warn};

use ah_core::{AppConfig, DecimalExt, PriceObservation};
use ah_data::{fetch_premium_data, resolve_stock_pool, MarketDataSession};
use ah_report::{quick_sheet, write_workbook};

use super::{finish, RunOutcome, RunReport};
use crate::error::MonitorError;
use crate::stats::RunStats;
use crate::Result;

const PREVIEW_ROWS: usize = 10;

/// 간이 프리미엄 리포트를 생성합니다.
pub async fn run_quick(
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

    let pool = resolve_stock_pool(session, &config.universe, today).await?;
    stats.pool_size = pool.len();
    if pool.is_empty() {
        warn!("종목 풀을 가져오지 못해 실행을 종료합니다");
        return Ok(finish(RunOutcome::EmptyPool, stats, started));
    }

    let rows = fetch_premium_data(session, &pool, &config.universe, start, Some(end)).await?;
    stats.rows = rows.len();
    if rows.is_empty() {
        warn!("프리미엄 리포트를 생성하지 못했습니다");
        return Ok(finish(RunOutcome::NoData, stats, started));
    }

    log_preview(&rows);

    let path = config.report.quick_path.clone();
    write_workbook(&path, &[quick_sheet(&rows)])?;
    info!(path = %path.display(), "간이 프리미엄 리포트 저장");

    let mut dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    dates.dedup();
    stats.new_dates = dates.len();
    stats.total_dates = dates.len();
    stats.stocks = rows
        .iter()
        .map(|r| r.stock_name.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    Ok(finish(RunOutcome::Created(path), stats, started))
}

/// 앞/뒤 몇 행을 로그로 보여줍니다.
fn log_preview(rows: &[PriceObservation]) {
    let head = rows.iter().take(PREVIEW_ROWS);
    let tail_start = rows.len().saturating_sub(PREVIEW_ROWS).max(PREVIEW_ROWS);
    let tail = rows.iter().skip(tail_start);

    for row in head.chain(tail) {
        info!(
            date = %row.date,
            stock = %row.stock_name,
            a_price = %row.a_price,
            h_price = %row.h_price,
            fx = %row.fx_rate,
            premium = %row.premium.map(|v| v.to_percentage_string()).unwrap_or_default(),
            "프리미엄"
        );
    }
}
