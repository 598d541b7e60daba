//! 리포트 입력 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - 캔들, 고래 알림, 시장 통계 Provider trait
//! - 고정 간격 재시도 (`retry_fetch`)
//! - 오프라인 실행용 파일 기반 Provider
//! - 한 주기 입력을 병렬로 모으는 `CycleCollector`

pub mod collector;
pub mod error;
pub mod file;
pub mod provider;
pub mod retry;

pub use collector::{CollectedCycle, CycleCollector, DEFAULT_ALERT_LIMIT};
pub use error::{DataError, DataResult, FetchFailure};
pub use file::{
    parse_alert_lines, parse_candles, parse_timestamp, FileAlertSource, FileCandleProvider,
    MarketStatsFile, StaticMarketStats,
};
pub use provider::{AlertSource, CandleProvider, MarketStatsProvider};
pub use retry::{retry_fetch, RetryPolicy};
