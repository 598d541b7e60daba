//! 설정 관리.
//!
//! 기본값 → TOML 파일 → `COINPULSE__*` 환경 변수 순서로 설정을 겹쳐 로드합니다.
//! 파일이 없어도 `AppConfig::default()`가 내장 카탈로그를 그대로 제공합니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::TimeWindow;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 거래소 이름 조각 카탈로그
    pub exchanges: ExchangeCatalogConfig,
    /// 추적 코인 (티커 → 외부 ID)
    pub coins: CoinCatalogConfig,
    /// 집계 윈도우 설정
    pub windows: WindowConfig,
    /// 외부 데이터 재시도 설정
    pub retry: RetryConfig,
    /// 최종 판단 설정
    pub decision: DecisionConfig,
    /// 캔들 조회 설정
    pub candles: CandleConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
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
            format: "pretty".to_string(),
        }
    }
}

/// 거래소 이름 조각 카탈로그.
///
/// 계정 라벨에 이 조각 중 하나가 (대소문자 무시) 포함되면 거래소 계정으로 간주합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExchangeCatalogConfig {
    /// 이름 조각 목록
    pub names: Vec<String>,
}

impl Default for ExchangeCatalogConfig {
    fn default() -> Self {
        Self {
            names: [
                "binance", "kucoin", "okx", "coinbase", "bybit", "mexc", "kraken", "bitfinex",
                "gate.io", "htx", "aave",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// 추적 코인 카탈로그.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CoinCatalogConfig {
    /// 티커 → 외부 시세 서비스 ID
    pub ids: BTreeMap<String, String>,
    /// 상세 분석 대상 코인
    pub primary: String,
}

impl Default for CoinCatalogConfig {
    fn default() -> Self {
        let ids = [
            ("BTC", "bitcoin"),
            ("ETH", "ethereum"),
            ("USDT", "tether"),
            ("SOL", "solana"),
            ("XRP", "ripple"),
            ("DOGE", "dogecoin"),
        ]
        .into_iter()
        .map(|(ticker, id)| (ticker.to_string(), id.to_string()))
        .collect();

        Self {
            ids,
            primary: "BTC".to_string(),
        }
    }
}

impl CoinCatalogConfig {
    /// 추적 중인 티커인지 확인합니다.
    pub fn is_tracked(&self, ticker: &str) -> bool {
        self.ids.contains_key(ticker)
    }

    /// 추적 티커 목록 (정렬됨).
    pub fn tickers(&self) -> Vec<String> {
        self.ids.keys().cloned().collect()
    }
}

/// 집계 윈도우 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    /// 윈도우 길이 목록 (분)
    pub minutes: Vec<i64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            minutes: vec![5, 15, 30, 60, 240, 1440],
        }
    }
}

impl WindowConfig {
    /// 설정된 윈도우 카탈로그.
    pub fn catalog(&self) -> Vec<TimeWindow> {
        self.minutes.iter().copied().map(TimeWindow::from_minutes).collect()
    }
}

/// 외부 데이터 재시도 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// 최대 시도 횟수
    pub max_attempts: u32,
    /// 시도 간 고정 대기 시간 (밀리초)
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 5000,
        }
    }
}

/// 최종 판단 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// 단기(5분/15분/30분) 점수를 최종 판단에 반영할지 여부.
    ///
    /// 비활성화 시 단기 점수는 0으로 전달됩니다.
    pub use_short_term_scores: bool,
}

/// 캔들 조회 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CandleConfig {
    /// 분석 대상 심볼
    pub symbol: String,
    /// 타임프레임별 조회 캔들 수
    pub limit: usize,
}

impl Default for CandleConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            limit: 200,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("COINPULSE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config.normalized())
    }

    /// 파일 없이 환경 변수만 반영해 로드합니다.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("COINPULSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()
            .map(Self::normalized)
    }

    /// 티커는 대문자, 거래소 이름 조각은 소문자로 정규화합니다.
    ///
    /// 설정 소스에 따라 키의 대소문자가 바뀔 수 있으므로 로드 직후 적용합니다.
    pub fn normalized(mut self) -> Self {
        self.coins.ids = self
            .coins
            .ids
            .into_iter()
            .map(|(ticker, id)| (ticker.to_uppercase(), id))
            .collect();
        self.coins.primary = self.coins.primary.to_uppercase();
        self.exchanges.names = self
            .exchanges
            .names
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect();
        self
    }
}
