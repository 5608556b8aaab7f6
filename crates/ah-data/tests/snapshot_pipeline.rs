//! 스냅샷 Provider로 종목 풀 조회부터 프리미엄 계산까지 통합 테스트

use ah_core::UniverseConfig;
use ah_data::{
    fetch_premium_data, resolve_stock_pool, MarketSnapshot, SessionGuard, SnapshotProvider,
};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

const AH: &str = "a002010600000000";
const CONNECT: &str = "1000014939000000";
const FX: &str = "HKDCNYFIX.HKS";

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn snapshot() -> MarketSnapshot {
    MarketSnapshot::default()
        .with_trade_days([day(2), day(3), day(4)])
        .with_sector_member(AH, "0939.HK", Some("建设银行"))
        .with_sector_member(AH, "1398.HK", Some("工商银行"))
        .with_sector_member(CONNECT, "0939.HK", None)
        .with_sector_member(CONNECT, "1398.HK", None)
        .with_a_share_code("0939.HK", Some("601939.SH"))
        .with_a_share_code("1398.HK", Some("601398.SH"))
        .with_close("601939.SH", day(2), Some(dec!(6.50)))
        .with_close("601939.SH", day(3), Some(dec!(6.60)))
        .with_close("601939.SH", day(4), Some(dec!(6.70)))
        .with_close("0939.HK", day(2), Some(dec!(4.80)))
        .with_close("0939.HK", day(3), Some(dec!(4.90)))
        .with_close("0939.HK", day(4), None)
        .with_close("601398.SH", day(2), Some(dec!(5.00)))
        .with_close("601398.SH", day(3), Some(dec!(5.10)))
        .with_close("601398.SH", day(4), Some(dec!(5.20)))
        .with_close("1398.HK", day(2), Some(dec!(4.40)))
        .with_close("1398.HK", day(3), Some(dec!(4.50)))
        .with_close("1398.HK", day(4), Some(dec!(4.60)))
        .with_close(FX, day(2), Some(dec!(0.91)))
        .with_close(FX, day(3), Some(dec!(0.92)))
        .with_close(FX, day(4), Some(dec!(0.93)))
}

#[tokio::test]
async fn test_pool_and_fetch_from_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("market.json");
    snapshot().save(&path).unwrap();

    let provider = SnapshotProvider::from_path(&path).unwrap();
    let session = SessionGuard::open(&provider).await.unwrap();
    let universe = UniverseConfig::default();

    let pool = resolve_stock_pool(&*session, &universe, day(5)).await.unwrap();
    assert_eq!(pool.len(), 2);

    let rows = fetch_premium_data(&*session, &pool, &universe, day(2), Some(day(4)))
        .await
        .unwrap();
    session.release().await;

    // 3 거래일 × 2 종목 - (1월 4일 建设银行 H주 결측)
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].date, day(2));
    assert_eq!(rows[0].stock_name, "工商银行");
    assert_eq!(rows[0].a_code, "601398.SH");
    assert_eq!(rows[0].h_code, "1398.HK");
    assert_eq!(
        rows[0].premium,
        Some(dec!(4.40) / dec!(0.91) / dec!(5.00) - dec!(1))
    );
    assert!(rows.iter().all(|r| !(r.date == day(4) && r.h_code == "0939.HK")));
}

#[tokio::test]
async fn test_fetch_window_after_last_trade_day_is_empty() {
    let provider = SnapshotProvider::new(snapshot());
    let session = SessionGuard::open(&provider).await.unwrap();
    let universe = UniverseConfig::default();

    let pool = resolve_stock_pool(&*session, &universe, day(5)).await.unwrap();
    let rows = fetch_premium_data(&*session, &pool, &universe, day(5), Some(day(9)))
        .await
        .unwrap();
    session.release().await;

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_missing_fx_series_drops_all_rows() {
    let mut snapshot = snapshot();
    snapshot.closes.remove(FX);

    let provider = SnapshotProvider::new(snapshot);
    let session = SessionGuard::open(&provider).await.unwrap();
    let universe = UniverseConfig::default();

    let pool = resolve_stock_pool(&*session, &universe, day(5)).await.unwrap();
    let rows = fetch_premium_data(&*session, &pool, &universe, day(2), Some(day(4)))
        .await
        .unwrap();
    session.release().await;

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_fetch_without_end_is_single_day() {
    let provider = SnapshotProvider::new(snapshot());
    let session = SessionGuard::open(&provider).await.unwrap();
    let universe = UniverseConfig::default();

    let pool = resolve_stock_pool(&*session, &universe, day(5)).await.unwrap();
    let rows = fetch_premium_data(&*session, &pool, &universe, day(3), None)
        .await
        .unwrap();
    session.release().await;

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.date == day(3)));
}
