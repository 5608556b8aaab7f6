//! 단말 HTTP 게이트웨이 Provider.
//!
//! 로컬에서 실행되는 게이트웨이가 단말 API를 JSON으로 노출한다고 가정합니다.
//! 모든 요청은 POST이며 응답 본문은 [`RawResponse`] 모양입니다.
//!
//! | 경로 | 단말 호출 |
//! |------|-----------|
//! | `/session/start` | 세션 시작 (`Data[0][0]` = 세션 토큰) |
//! | `/tdaysoffset` | 거래일 오프셋 |
//! | `/wset` | 섹터 구성 종목 |
//! | `/wss` | 스냅샷 필드 |
//! | `/wsd` | 기간 시계열 |
//! | `/session/stop` | 세션 종료 |

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use ah_core::{format_trade_date, ProviderConfig};

use super::response::{CloseSeries, RawResponse, SectorConstituents, ShareMapping};
use super::{MarketDataProvider, MarketDataSession};
use crate::error::{DataError, Result};

/// 게이트웨이 Provider.
#[derive(Clone)]
pub struct GatewayProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayProvider {
    /// 새 게이트웨이 Provider를 생성합니다.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::ConnectionError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 설정에서 생성합니다.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[derive(Serialize)]
struct StartRequest {}

#[async_trait]
impl MarketDataProvider for GatewayProvider {
    fn name(&self) -> &str {
        "gateway"
    }

    async fn start(&self) -> Result<Box<dyn MarketDataSession>> {
        let raw = post(&self.client, &self.base_url, "session/start", &StartRequest {})
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if raw.error_code != 0 {
            return Err(DataError::ConnectionError(format!(
                "세션 시작 실패: ErrorCode={}",
                raw.error_code
            )));
        }

        let token = raw
            .data
            .first()
            .and_then(|column| column.first())
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .ok_or_else(|| DataError::ConnectionError("세션 토큰이 없습니다".to_string()))?;

        Ok(Box::new(GatewaySession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
        }))
    }
}

/// 열린 게이트웨이 세션.
struct GatewaySession {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct OffsetRequest<'a> {
    token: &'a str,
    offset: i32,
    date: String,
}

#[derive(Serialize)]
struct SetRequest<'a> {
    token: &'a str,
    table: &'a str,
    options: String,
}

#[derive(Serialize)]
struct SnapshotRequest<'a> {
    token: &'a str,
    codes: String,
    fields: &'a str,
}

#[derive(Serialize)]
struct SeriesRequest<'a> {
    token: &'a str,
    codes: String,
    fields: &'a str,
    start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<String>,
}

#[async_trait]
impl MarketDataSession for GatewaySession {
    async fn trade_day_offset(&self, offset: i32, date: NaiveDate) -> Result<NaiveDate> {
        let body = OffsetRequest {
            token: &self.token,
            offset,
            date: format_trade_date(date),
        };
        post(&self.client, &self.base_url, "tdaysoffset", &body)
            .await?
            .into_trade_day("tdaysoffset")
    }

    async fn sector_constituents(
        &self,
        date: NaiveDate,
        sector_id: &str,
    ) -> Result<SectorConstituents> {
        let body = SetRequest {
            token: &self.token,
            table: "sectorconstituent",
            options: format!("date={};sectorid={}", format_trade_date(date), sector_id),
        };
        let raw = post(&self.client, &self.base_url, "wset", &body).await?;
        SectorConstituents::from_raw(raw, &format!("wset sectorconstituent {}", sector_id))
    }

    async fn paired_a_codes(&self, h_codes: &[String]) -> Result<ShareMapping> {
        let body = SnapshotRequest {
            token: &self.token,
            codes: h_codes.join(","),
            fields: "asharewindcode",
        };
        let raw = post(&self.client, &self.base_url, "wss", &body).await?;
        ShareMapping::from_raw(raw, h_codes, "wss asharewindcode")
    }

    async fn close_series(
        &self,
        codes: &[String],
        field: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<CloseSeries> {
        let body = SeriesRequest {
            token: &self.token,
            codes: codes.join(","),
            fields: field,
            start: format_trade_date(start),
            end: end.map(format_trade_date),
        };
        let raw = post(&self.client, &self.base_url, "wsd", &body).await?;
        CloseSeries::from_raw(raw, &format!("wsd {}", field))
    }

    async fn stop(&self) -> Result<()> {
        let body = TokenRequest { token: &self.token };
        let raw = post(&self.client, &self.base_url, "session/stop", &body).await?;
        if raw.error_code != 0 {
            return Err(DataError::provider("session/stop", raw.error_code));
        }
        Ok(())
    }
}

async fn post<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    base_url: &str,
    path: &str,
    body: &B,
) -> Result<RawResponse> {
    let url = format!("{}/{}", base_url, path);
    debug!(url = %url, "게이트웨이 요청");

    let response = client
        .post(&url)
        .header("Accept", "application/json")
        .json(body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(DataError::FetchError(format!(
            "게이트웨이 오류 [{}]: {} - {}",
            path, status, body
        )));
    }

    Ok(response.json::<RawResponse>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rust_decimal_macros::dec;
    use serde_json::json;

    async fn started(server: &mockito::ServerGuard) -> Box<dyn MarketDataSession> {
        let provider = GatewayProvider::new(server.url(), Duration::from_secs(5)).unwrap();
        provider.start().await.unwrap()
    }

    async fn mock_start(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/session/start")
            .with_header("content-type", "application/json")
            .with_body(json!({"ErrorCode": 0, "Data": [["tok-1"]]}).to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_start_failure_is_connection_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/session/start")
            .with_body(json!({"ErrorCode": -103}).to_string())
            .create_async()
            .await;

        let provider = GatewayProvider::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = provider.start().await.err().unwrap();
        assert!(matches!(err, DataError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_close_series_request_and_parse() {
        let mut server = mockito::Server::new_async().await;
        let _start = mock_start(&mut server).await;
        let wsd = server
            .mock("POST", "/wsd")
            .match_body(Matcher::PartialJson(json!({
                "token": "tok-1",
                "codes": "601939.SH,0939.HK",
                "fields": "close",
                "start": "2024-01-02"
            })))
            .with_body(
                json!({
                    "ErrorCode": 0,
                    "Codes": ["601939.SH", "0939.HK"],
                    "Fields": ["CLOSE"],
                    "Times": ["2024-01-02"],
                    "Data": [[6.5], [4.8]]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let session = started(&server).await;
        let codes = vec!["601939.SH".to_string(), "0939.HK".to_string()];
        let series = session
            .close_series(&codes, "close", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), None)
            .await
            .unwrap();

        wsd.assert_async().await;
        assert_eq!(series.values, vec![vec![Some(dec!(6.5))], vec![Some(dec!(4.8))]]);
    }

    #[tokio::test]
    async fn test_query_error_code_is_no_data() {
        let mut server = mockito::Server::new_async().await;
        let _start = mock_start(&mut server).await;
        let _wset = server
            .mock("POST", "/wset")
            .match_body(Matcher::PartialJson(json!({
                "options": "date=2024-01-02;sectorid=a002010600000000"
            })))
            .with_body(json!({"ErrorCode": -40522017}).to_string())
            .create_async()
            .await;

        let session = started(&server).await;
        let err = session
            .sector_constituents(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), "a002010600000000")
            .await
            .unwrap_err();
        assert!(err.is_no_data());
    }

    #[tokio::test]
    async fn test_http_failure_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _start = mock_start(&mut server).await;
        let _offset = server
            .mock("POST", "/tdaysoffset")
            .with_status(502)
            .create_async()
            .await;

        let session = started(&server).await;
        let err = session
            .trade_day_offset(0, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::FetchError(_)));
        assert!(!err.is_no_data());
    }

    #[tokio::test]
    async fn test_stop_sends_token() {
        let mut server = mockito::Server::new_async().await;
        let _start = mock_start(&mut server).await;
        let stop = server
            .mock("POST", "/session/stop")
            .match_body(Matcher::Json(json!({"token": "tok-1"})))
            .with_body(json!({"ErrorCode": 0}).to_string())
            .create_async()
            .await;

        let session = started(&server).await;
        session.stop().await.unwrap();
        stop.assert_async().await;
    }
}
