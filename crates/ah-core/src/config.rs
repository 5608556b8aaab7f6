//! 설정 관리.
//!
//! 기본값 → 설정 파일(TOML) → 환경 변수(`AH__` 접두사) 순서로 덮어씁니다.
//! 아무 설정도 없으면 기본값(고정 파일명, 고정 시작일)으로 동작합니다.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AhError, AhResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 시장 데이터 Provider 설정
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 종목 유니버스 설정
    #[serde(default)]
    pub universe: UniverseConfig,
    /// 리포트 파일 설정
    #[serde(default)]
    pub report: ReportConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// 단말 HTTP 게이트웨이
    #[default]
    Gateway,
    /// JSON 스냅샷 파일 (오프라인 재현용)
    Snapshot,
}

/// 시장 데이터 Provider 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider 종류
    pub kind: ProviderKind,
    /// 게이트웨이 기본 URL
    pub base_url: String,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 스냅샷 파일 경로 (`kind = "snapshot"`일 때 필수)
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Gateway,
            base_url: "http://127.0.0.1:8765".to_string(),
            timeout_secs: 30,
            snapshot_path: None,
        }
    }
}

/// 종목 유니버스 설정 (섹터 ID, 환율 코드).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UniverseConfig {
    /// A주에도 상장된 H주 섹터 ID
    pub ah_sector_id: String,
    /// 후강퉁(남향) 대상 H주 섹터 ID
    pub connect_sector_id: String,
    /// 후강퉁 기준 환율 코드 (HKD → CNY)
    pub fx_code: String,
    /// 시계열 조회 필드
    pub price_field: String,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            ah_sector_id: "a002010600000000".to_string(),
            connect_sector_id: "1000014939000000".to_string(),
            fx_code: "HKDCNYFIX.HKS".to_string(),
            price_field: "close".to_string(),
        }
    }
}

/// 리포트 파일 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// 매일 갱신되는 모니터링 리포트 경로
    pub monitor_path: PathBuf,
    /// 모니터링 리포트 최초 생성 시 시작일
    pub monitor_start: NaiveDate,
    /// 기간 분석 리포트 저장 디렉토리
    pub history_dir: PathBuf,
    /// 기간 분석 기본 시작일
    pub history_start: NaiveDate,
    /// 간이 프리미엄 리포트 경로
    pub quick_path: PathBuf,
    /// 간이 리포트 조회 기간 (일)
    pub quick_lookback_days: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        Self {
            monitor_path: PathBuf::from("AH股每日监控报告.xlsx"),
            monitor_start: start,
            history_dir: PathBuf::from("."),
            history_start: start,
            quick_path: PathBuf::from("HA股溢价率报告.xlsx"),
            quick_lookback_days: 7,
        }
    }
}

impl ReportConfig {
    /// 기간 분석 리포트 파일 경로.
    ///
    /// 파일명에 조회 기간이 찍힙니다 (예: `AH股溢价率分析报告_2024-01-01_至_2024-06-30.xlsx`).
    pub fn history_path(&self, start: NaiveDate, end: NaiveDate) -> PathBuf {
        self.history_dir.join(format!(
            "AH股溢价率分析报告_{}_至_{}.xlsx",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ))
    }
}

impl ReportConfig {
    /// 간이 리포트 기본 시작일 (`end`에서 `quick_lookback_days`일 전).
    pub fn quick_start(&self, end: NaiveDate) -> AhResult<NaiveDate> {
        Duration::try_days(self.quick_lookback_days)
            .and_then(|lookback| end.checked_sub_signed(lookback))
            .ok_or_else(|| {
                AhError::Config(format!(
                    "report.quick_lookback_days가 날짜 범위를 벗어납니다: {}",
                    self.quick_lookback_days
                ))
            })
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl AppConfig {
    /// 기본값, 파일, 환경 변수 순서로 설정을 로드합니다.
    ///
    /// 파일이 없으면 건너뜁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> AhResult<Self> {
        let defaults = config::Config::try_from(&AppConfig::default())?;

        let builder = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("AH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> AhResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 설정 값 사이의 제약을 검사합니다.
    pub fn validate(&self) -> AhResult<()> {
        if self.provider.kind == ProviderKind::Snapshot && self.provider.snapshot_path.is_none() {
            return Err(AhError::Config(
                "snapshot provider에는 provider.snapshot_path가 필요합니다".to_string(),
            ));
        }
        if self.report.quick_lookback_days < 0 {
            return Err(AhError::Config(format!(
                "report.quick_lookback_days는 음수일 수 없습니다: {}",
                self.report.quick_lookback_days
            )));
        }
        Ok(())
    }
}
