//! 시장 데이터 접근 계층.
//!
//! 이 crate는 다음을 제공합니다:
//! - 시장 데이터 Provider 경계 (세션, 타입이 지정된 응답)
//! - 단말 HTTP 게이트웨이 Provider 및 스냅샷 Provider
//! - 후강퉁 AH 종목 풀 조회
//! - 종가/환율 조회 및 프리미엄 long format 변환

pub mod error;
pub mod fetcher;
pub mod pool;
pub mod provider;

pub use error::{DataError, Result};
pub use fetcher::fetch_premium_data;
pub use pool::resolve_stock_pool;

// Provider 타입 재내보내기
pub use provider::{
    CloseSeries, GatewayProvider, MarketDataProvider, MarketDataSession, MarketSnapshot,
    RawResponse, SectorConstituents, SectorMember, SessionGuard, ShareMapping, SnapshotProvider,
};
