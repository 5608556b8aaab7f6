//! 실행 설정 로드 및 Provider 선택.

use std::path::Path;

use ah_core::{AppConfig, ProviderConfig, ProviderKind, DEFAULT_CONFIG_PATH};
use ah_data::{GatewayProvider, MarketDataProvider, SnapshotProvider};

use crate::error::{MonitorError, Result};

/// `.env`를 읽은 뒤 설정 파일과 환경 변수에서 설정을 로드합니다.
///
/// 경로를 주지 않으면 `config/default.toml`을 사용하고, 파일이 없으면 기본값입니다.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load(DEFAULT_CONFIG_PATH)?,
    };
    Ok(config)
}

/// 설정에 맞는 시장 데이터 Provider를 생성합니다.
pub fn open_provider(config: &ProviderConfig) -> Result<Box<dyn MarketDataProvider>> {
    match config.kind {
        ProviderKind::Gateway => {
            tracing::debug!(base_url = %config.base_url, "게이트웨이 Provider 사용");
            Ok(Box::new(GatewayProvider::from_config(config)?))
        }
        ProviderKind::Snapshot => {
            let path = config.snapshot_path.as_ref().ok_or_else(|| {
                MonitorError::Config("provider.snapshot_path가 설정되지 않았습니다".to_string())
            })?;
            tracing::debug!(path = %path.display(), "스냅샷 Provider 사용");
            Ok(Box::new(SnapshotProvider::from_path(path)?))
        }
    }
}
