//! OHLCV 캔들 및 캔들 시계열.
//!
//! - `Candle` - 단일 OHLCV 캔들
//! - `CandleSeries` - 시간순으로 정렬된 캔들 시계열 (생성 후 불변)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Price, Quantity, Timeframe};

/// OHLCV 캔들스틱 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (기준 자산 단위)
    pub volume: Quantity,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        open_time: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// 시간순으로 정렬된 캔들 시계열.
///
/// 인덱스 순서가 곧 시간 순서이며, 생성 시 타임스탬프가 감소하지 않는지 검증합니다.
#[derive(Debug, Clone, Serialize)]
pub struct CandleSeries {
    symbol: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// 캔들 시계열을 생성합니다.
    ///
    /// 타임스탬프가 역행하면 `CoreError::InvalidInput`을 반환합니다.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        candles: Vec<Candle>,
    ) -> CoreResult<Self> {
        let symbol = symbol.into();
        if let Some(pos) = candles
            .windows(2)
            .position(|pair| pair[1].open_time < pair[0].open_time)
        {
            return Err(CoreError::InvalidInput(format!(
                "{} {} 캔들 타임스탬프가 역행합니다 (index {})",
                symbol,
                timeframe,
                pos + 1
            )));
        }

        Ok(Self {
            symbol,
            timeframe,
            candles,
        })
    }

    /// 거래 심볼.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 타임프레임.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// 캔들 목록.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// 캔들 수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 마지막 캔들.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// 고가 열.
    pub fn highs(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.high).collect()
    }

    /// 저가 열.
    pub fn lows(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.low).collect()
    }

    /// 종가 열.
    pub fn closes(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// 거래량 열.
    pub fn volumes(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}
