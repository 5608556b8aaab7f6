//! 시장 데이터 Provider 경계.
//!
//! 실행마다 세션을 하나 열고, 모든 조회를 그 세션에서 수행한 뒤 닫습니다.
//! 세션 종료는 [`SessionGuard`]가 보장합니다.

mod gateway;
mod response;
mod snapshot;

pub use gateway::GatewayProvider;
pub use response::{CloseSeries, RawResponse, SectorConstituents, SectorMember, ShareMapping};
pub use snapshot::{MarketSnapshot, SnapshotProvider};

use async_trait::async_trait;
use chrono::NaiveDate;
use std::ops::Deref;
use tracing::{debug, warn};

use crate::error::Result;

/// 열린 Provider 세션에서 수행하는 조회.
///
/// 모든 조회는 ErrorCode ≠ 0이면 [`DataError::ProviderError`],
/// 데이터가 비어 있으면 [`DataError::EmptyPayload`]를 반환합니다.
///
/// [`DataError::ProviderError`]: crate::DataError::ProviderError
/// [`DataError::EmptyPayload`]: crate::DataError::EmptyPayload
#[async_trait]
pub trait MarketDataSession: Send + Sync {
    /// `date` 기준 `offset` 거래일 떨어진 거래일 (`tdaysoffset`).
    ///
    /// `offset = 0`이면 `date` 이전(포함) 최근 거래일입니다.
    async fn trade_day_offset(&self, offset: i32, date: NaiveDate) -> Result<NaiveDate>;

    /// 섹터 구성 종목 (`wset sectorconstituent`).
    async fn sector_constituents(
        &self,
        date: NaiveDate,
        sector_id: &str,
    ) -> Result<SectorConstituents>;

    /// H주 코드들의 A주 코드 (`wss asharewindcode`).
    async fn paired_a_codes(&self, h_codes: &[String]) -> Result<ShareMapping>;

    /// 기간 종가 시계열 (`wsd`).
    ///
    /// `end`가 `None`이면 최근 거래일까지입니다.
    async fn close_series(
        &self,
        codes: &[String],
        field: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<CloseSeries>;

    /// 세션을 닫습니다.
    async fn stop(&self) -> Result<()>;
}

/// 세션을 여는 Provider.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider 이름 (로그용).
    fn name(&self) -> &str;

    /// 세션을 엽니다. 실패하면 [`DataError::ConnectionError`].
    ///
    /// [`DataError::ConnectionError`]: crate::DataError::ConnectionError
    async fn start(&self) -> Result<Box<dyn MarketDataSession>>;
}

/// 세션 수명 관리자.
///
/// 정상 경로에서는 [`SessionGuard::release`]로 닫고,
/// 오류로 조기 반환되면 drop 시점에 현재 tokio 런타임에서 종료를 예약합니다.
pub struct SessionGuard {
    session: Option<Box<dyn MarketDataSession>>,
}

impl SessionGuard {
    /// Provider에서 세션을 열어 guard로 감쌉니다.
    pub async fn open(provider: &dyn MarketDataProvider) -> Result<Self> {
        let session = provider.start().await?;
        debug!(provider = provider.name(), "Provider 세션 시작");
        Ok(Self::new(session))
    }

    pub fn new(session: Box<dyn MarketDataSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// 세션을 닫습니다. 종료 실패는 경고만 남깁니다.
    pub async fn release(mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.stop().await {
                warn!(error = %e, "Provider 세션 종료 실패");
            } else {
                debug!("Provider 세션 종료");
            }
        }
    }
}

impl Deref for SessionGuard {
    type Target = dyn MarketDataSession;

    fn deref(&self) -> &Self::Target {
        match &self.session {
            Some(session) => session.as_ref(),
            // release()는 self를 소비하므로 여기에 도달하지 않음
            None => unreachable!("session released"),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.stop().await {
                        warn!(error = %e, "Provider 세션 종료 실패");
                    }
                });
            }
            Err(_) => warn!("tokio 런타임 밖에서 세션이 해제되어 종료 요청을 보내지 못했습니다"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSession {
        stops: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MarketDataSession for CountingSession {
        async fn trade_day_offset(&self, _offset: i32, date: NaiveDate) -> Result<NaiveDate> {
            Ok(date)
        }

        async fn sector_constituents(
            &self,
            _date: NaiveDate,
            _sector_id: &str,
        ) -> Result<SectorConstituents> {
            Ok(SectorConstituents::default())
        }

        async fn paired_a_codes(&self, _h_codes: &[String]) -> Result<ShareMapping> {
            Ok(ShareMapping::default())
        }

        async fn close_series(
            &self,
            _codes: &[String],
            _field: &str,
            _start: NaiveDate,
            _end: Option<NaiveDate>,
        ) -> Result<CloseSeries> {
            Ok(CloseSeries::default())
        }

        async fn stop(&self) -> Result<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_release_stops_once() {
        let stops = Arc::new(AtomicUsize::new(0));
        let guard = SessionGuard::new(Box::new(CountingSession {
            stops: stops.clone(),
        }));

        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(guard.trade_day_offset(0, day).await.unwrap(), day);

        guard.release().await;
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_schedules_stop() {
        let stops = Arc::new(AtomicUsize::new(0));
        {
            let _guard = SessionGuard::new(Box::new(CountingSession {
                stops: stops.clone(),
            }));
        }
        // drop에서 spawn된 종료 작업이 실행되도록 양보
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
