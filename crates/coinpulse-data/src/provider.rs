//! 외부 데이터 Provider trait.
//!
//! 리포트 한 주기에 필요한 세 종류의 외부 입력을 추상화합니다.
//!
//! - `CandleProvider`: 심볼/타임프레임별 OHLCV 캔들
//! - `AlertSource`: 고래 알림 피드 원문
//! - `MarketStatsProvider`: 일간 거래대금, 현재가, 롱/숏 비율

use async_trait::async_trait;
use coinpulse_core::{CandleSeries, RawAlert, Timeframe};
use rust_decimal::Decimal;

use crate::error::DataResult;

/// 캔들 Provider trait.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 최근 `limit`개 캔들을 시간순으로 조회합니다.
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> DataResult<CandleSeries>;
}

/// 고래 알림 피드 trait.
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// 피드 이름.
    fn name(&self) -> &str;

    /// 최근 알림을 최대 `limit`개 조회합니다.
    async fn fetch_alerts(&self, limit: usize) -> DataResult<Vec<RawAlert>>;
}

/// 시장 통계 Provider trait.
#[async_trait]
pub trait MarketStatsProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 24시간 거래대금 (USD). `coin_id`는 외부 시세 서비스 ID (예: bitcoin).
    async fn daily_volume_usd(&self, coin_id: &str) -> DataResult<Decimal>;

    /// 현재가 (USD).
    async fn price_usd(&self, coin_id: &str) -> DataResult<Decimal>;

    /// 선물 계정 롱/숏 비율.
    async fn long_short_ratio(&self, symbol: &str, timeframe: Timeframe) -> DataResult<Decimal>;
}
