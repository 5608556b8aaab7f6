//! 후강퉁 AH 종목 풀 조회.
//!
//! 1. 오늘 기준 최근 거래일을 구합니다.
//! 2. 그 날짜의 AH 섹터와 후강퉁 섹터 구성 종목을 조회합니다.
//! 3. 두 H주 코드 집합의 교집합을 정렬합니다.
//! 4. 교집합 H주의 A주 코드를 조회하고, A주가 없는 종목은 제외합니다.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use ah_core::{StockPool, StockPoolEntry, UniverseConfig};

use crate::error::Result;
use crate::provider::{MarketDataSession, SectorConstituents, ShareMapping};

/// 후강퉁 AH 종목 풀을 조회합니다.
///
/// 조회 오류 코드나 빈 응답은 경고를 남기고 빈 풀을 반환합니다.
/// 전송 계층 오류는 그대로 전파합니다.
pub async fn resolve_stock_pool(
    session: &dyn MarketDataSession,
    universe: &UniverseConfig,
    today: NaiveDate,
) -> Result<StockPool> {
    match try_resolve(session, universe, today).await {
        Ok(pool) => Ok(pool),
        Err(e) if e.is_no_data() => {
            warn!(error = %e, "종목 풀 조회 실패, 빈 풀로 처리합니다");
            Ok(StockPool::default())
        }
        Err(e) => Err(e),
    }
}

async fn try_resolve(
    session: &dyn MarketDataSession,
    universe: &UniverseConfig,
    today: NaiveDate,
) -> Result<StockPool> {
    let trade_day = session.trade_day_offset(0, today).await?;
    debug!(%trade_day, "종목 풀 기준 거래일");

    let ah_list = session
        .sector_constituents(trade_day, &universe.ah_sector_id)
        .await?;
    let connect_list = session
        .sector_constituents(trade_day, &universe.connect_sector_id)
        .await?;

    let connect_codes: BTreeSet<&str> = connect_list.codes().collect();
    let h_codes: Vec<String> = ah_list
        .codes()
        .filter(|code| connect_codes.contains(code))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    if h_codes.is_empty() {
        warn!(
            ah = ah_list.members.len(),
            connect = connect_list.members.len(),
            "AH 섹터와 후강퉁 섹터의 교집합이 비어 있습니다"
        );
        return Ok(StockPool::default());
    }

    let mapping = session.paired_a_codes(&h_codes).await?;
    let (pool, dropped) = pair_entries(&ah_list, mapping);

    if !dropped.is_empty() {
        warn!(
            dropped = dropped.len(),
            h_codes = ?dropped,
            "A주 코드가 없는 종목을 풀에서 제외했습니다"
        );
    }
    info!(
        trade_day = %trade_day,
        stocks = pool.len(),
        dropped = dropped.len(),
        "후강퉁 AH 종목 풀 조회 완료"
    );

    Ok(pool)
}

/// H→A 매핑으로 풀 항목을 만듭니다.
///
/// A주 코드가 없는 H주 코드는 두 번째 값으로 돌려줍니다.
fn pair_entries(ah_list: &SectorConstituents, mapping: ShareMapping) -> (StockPool, Vec<String>) {
    let mut dropped = Vec::new();
    let mut entries = Vec::new();

    for (h_code, a_code) in mapping.pairs {
        let Some(a_code) = a_code else {
            debug!(h_code = %h_code, "A주 코드가 없어 제외");
            dropped.push(h_code);
            continue;
        };
        let name = match ah_list.name_of(&h_code) {
            Some(name) => name.to_string(),
            None => {
                warn!(h_code = %h_code, "종목명이 없어 H주 코드를 이름으로 사용");
                h_code.clone()
            }
        };
        entries.push(StockPoolEntry::new(h_code, a_code, name));
    }

    (StockPool::new(entries), dropped)
}
