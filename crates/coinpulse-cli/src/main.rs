//! 코인 복합 시그널 리포트 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 파일 스냅샷으로 리포트 한 주기 실행
//! coinpulse report --data-dir data/candles --alerts data/alerts.jsonl --stats data/stats.json
//!
//! # 기준 시각 고정 + 설정 파일 지정
//! coinpulse report --data-dir data/candles --alerts data/alerts.jsonl \
//!     --config config/default.toml --now 2024-05-01T12:00:00Z --pretty
//!
//! # 알림 한 건 파싱
//! coinpulse parse-alert "1,234 #BTC (56,000,000 USD) transferred from binance to unknown wallet"
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use coinpulse_cli::commands::parse_alert::parse_alert;
use coinpulse_cli::commands::report::{run_report, ReportConfig};
use coinpulse_cli::commands::{load_config, setup_logging};
use coinpulse_data::parse_timestamp;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coinpulse")]
#[command(about = "Crypto composite signal report - 지표 점수 + 고래 흐름", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML, 생략 시 기본값 + COINPULSE__* 환경 변수)
    #[arg(short, long, global = true, env = "COINPULSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 리포트 한 주기 실행 (JSON을 stdout으로 출력)
    Report {
        /// 캔들 파일 디렉터리 (<SYMBOL>_<interval>.json)
        #[arg(short, long)]
        data_dir: PathBuf,

        /// 고래 알림 JSON lines 파일
        #[arg(short, long)]
        alerts: PathBuf,

        /// 시장 통계 JSON 파일 (거래대금, 가격, 롱/숏 비율)
        #[arg(short, long)]
        stats: Option<PathBuf>,

        /// 리포트 기준 시각 (RFC 3339, 기본: 현재 시각)
        #[arg(long)]
        now: Option<String>,

        /// 들여쓰기된 JSON 출력
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// 고래 알림 한 건 파싱
    ParseAlert {
        /// 알림 본문
        text: String,

        /// 알림 시각 (RFC 3339, 기본: 현재 시각)
        #[arg(short, long)]
        timestamp: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let body = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", body);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    setup_logging(&config)?;

    match cli.command {
        Commands::Report {
            data_dir,
            alerts,
            stats,
            now,
            pretty,
        } => {
            let now = match now {
                Some(raw) => parse_timestamp(&raw).context("Invalid --now")?,
                None => Utc::now(),
            };

            let report = run_report(
                &config,
                ReportConfig {
                    data_dir,
                    alerts,
                    stats,
                    now,
                },
            )
            .await?;
            print_json(&report, pretty)?;
        }

        Commands::ParseAlert { text, timestamp } => {
            let timestamp = match timestamp {
                Some(raw) => parse_timestamp(&raw).context("Invalid --timestamp")?,
                None => Utc::now(),
            };

            let event = parse_alert(&config, &text, timestamp)?;
            print_json(&event, true)?;
        }
    }

    Ok(())
}
