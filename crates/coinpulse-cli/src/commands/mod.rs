//! CLI 명령어 구현 모듈.

pub mod parse_alert;
pub mod report;

use anyhow::{Context, Result};
use coinpulse_core::{init_logging, AppConfig, LogConfig};
use std::path::Path;

/// 설정을 로드합니다. 경로가 없으면 기본값 위에 환경 변수만 반영합니다.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => AppConfig::from_env().context("Failed to read COINPULSE__* environment"),
    }
}

/// 설정의 로깅 섹션으로 로깅을 초기화합니다.
pub fn setup_logging(config: &AppConfig) -> Result<()> {
    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
