//! 종가/환율 조회 및 프리미엄 long format 변환.
//!
//! 풀의 A주와 H주 코드를 한 번에 조회하고 환율은 따로 조회한 뒤,
//! (거래일, 종목) 한 행씩 A주 종가, H주 종가, 환율을 맞춰 프리미엄을 계산합니다.
//! 세 값 중 하나라도 없는 행은 버립니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use ah_core::{sort_observations, PriceObservation, StockPool, UniverseConfig};

use crate::error::Result;
use crate::provider::{CloseSeries, MarketDataSession};

/// `[start, end]` 기간의 프리미엄 관측치를 조회합니다.
///
/// `end`가 `None`이면 `start` 하루만 조회합니다.
/// 결과는 (거래일, 종목명) 순으로 정렬됩니다.
/// 풀이 비어 있거나 조회 오류 코드/빈 응답이면 빈 결과를 반환합니다.
pub async fn fetch_premium_data(
    session: &dyn MarketDataSession,
    pool: &StockPool,
    universe: &UniverseConfig,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<Vec<PriceObservation>> {
    if pool.is_empty() {
        warn!("종목 풀이 비어 있어 가격을 조회하지 않습니다");
        return Ok(Vec::new());
    }

    let end = end.unwrap_or(start);
    let codes = price_codes(pool);
    debug!(codes = codes.len(), %start, %end, "종가 조회");

    let Some(prices) = no_data_as_none(
        session
            .close_series(&codes, &universe.price_field, start, Some(end))
            .await,
    )?
    else {
        return Ok(Vec::new());
    };

    let fx_codes = [universe.fx_code.clone()];
    let Some(fx) = no_data_as_none(
        session
            .close_series(&fx_codes, &universe.price_field, start, Some(end))
            .await,
    )?
    else {
        return Ok(Vec::new());
    };

    let observations = join_observations(pool, &prices, &fx, &universe.fx_code);
    info!(
        rows = observations.len(),
        dates = prices.times.len(),
        stocks = pool.len(),
        "프리미엄 데이터 조회 완료"
    );

    Ok(observations)
}

/// 풀 순서의 A주 코드 다음 H주 코드 (중복 제거).
fn price_codes(pool: &StockPool) -> Vec<String> {
    let mut seen = HashSet::new();
    pool.a_codes()
        .into_iter()
        .chain(pool.h_codes())
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

fn no_data_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_no_data() => {
            warn!(error = %e, "가격 조회 결과가 없습니다");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// 종가 시계열과 환율을 풀 항목별 long format 행으로 맞춥니다.
fn join_observations(
    pool: &StockPool,
    prices: &CloseSeries,
    fx: &CloseSeries,
    fx_code: &str,
) -> Vec<PriceObservation> {
    let mut closes: HashMap<(&str, NaiveDate), Option<Decimal>> = HashMap::new();
    for (date, code, value) in prices.iter_long() {
        closes.entry((code, date)).or_insert(value);
    }

    let mut rates: HashMap<NaiveDate, Option<Decimal>> = HashMap::new();
    if let Some(series) = fx.series(fx_code) {
        for (date, value) in series {
            rates.entry(date).or_insert(value);
        }
    }

    let mut observations = Vec::new();
    let mut incomplete = 0usize;

    for date in &prices.times {
        for entry in pool.entries() {
            let a_price = closes.get(&(entry.a_code.as_str(), *date)).copied().flatten();
            let h_price = closes.get(&(entry.h_code.as_str(), *date)).copied().flatten();
            let fx_rate = rates.get(date).copied().flatten();

            match PriceObservation::resolve(
                *date,
                &entry.name,
                &entry.a_code,
                &entry.h_code,
                a_price,
                h_price,
                fx_rate,
            ) {
                Some(row) => observations.push(row),
                None => incomplete += 1,
            }
        }
    }

    if incomplete > 0 {
        debug!(incomplete, "가격 또는 환율이 없는 행 제외");
    }

    sort_observations(&mut observations);
    observations
}
