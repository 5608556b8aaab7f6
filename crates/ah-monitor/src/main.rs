//! AH 프리미엄 모니터 CLI.

use std::path::PathBuf;

use ah_core::{init_logging, LogConfig, LogFormat};
use ah_data::SessionGuard;
use ah_monitor::{load_config, modules, open_provider, RunReport};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ah-monitor")]
#[command(about = "AH Share Premium Monitor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로 (기본: config/default.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// 모니터링 리포트 증분 갱신
    Monitor,

    /// 기간 분석 리포트 생성 (통계 요약 + 상세 데이터)
    History {
        /// 시작일 (YYYY-MM-DD, 기본: report.history_start)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// 종료일 (YYYY-MM-DD, 기본: 오늘)
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// 최근 N일 간이 프리미엄 리포트 생성
    Quick {
        /// 시작일 (YYYY-MM-DD, 기본: 오늘 - report.quick_lookback_days)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// 종료일 (YYYY-MM-DD, 기본: 오늘)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 설정 로드
    let config = load_config(cli.config.as_deref())?;

    // 로깅 초기화
    let mut log_config = LogConfig::from_settings(&config.logging);
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(log_config)?;

    tracing::info!("AH 프리미엄 모니터 시작");

    // Provider 세션 시작
    let provider = open_provider(&config.provider)?;
    let session = match SessionGuard::open(provider.as_ref()).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Provider 연결 실패: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!(provider = provider.name(), "Provider 세션 연결 성공");

    let today = Local::now().date_naive();

    // 명령 실행
    let result = match cli.command {
        Commands::Monitor => modules::run_monitor(&*session, &config, today)
            .await
            .map(|report| (report, "모니터링 리포트 갱신")),
        Commands::History { start, end } => {
            let start = start.unwrap_or(config.report.history_start);
            let end = end.unwrap_or(today);
            modules::run_history(&*session, &config, today, start, end)
                .await
                .map(|report| (report, "기간 분석 리포트"))
        }
        Commands::Quick { start, end } => {
            let end = end.unwrap_or(today);
            match start.map_or_else(|| config.report.quick_start(end), Ok) {
                Ok(start) => modules::run_quick(&*session, &config, today, start, end)
                    .await
                    .map(|report| (report, "간이 프리미엄 리포트")),
                Err(e) => Err(e.into()),
            }
        }
    };

    session.release().await;

    match result {
        Ok((RunReport { outcome, stats }, operation)) => {
            stats.log_summary(operation);
            tracing::info!(outcome = ?outcome, "AH 프리미엄 모니터 종료");
            Ok(())
        }
        Err(e) => {
            tracing::error!("실행 실패: {}", e);
            Err(e.into())
        }
    }
}
