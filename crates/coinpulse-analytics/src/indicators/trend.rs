//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//!
//! EMA는 첫 번째 샘플로 시드합니다. 처음 n개의 SMA로 시드하지 않습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ema_scan, ensure_len, ensure_period, mask_warmup, IndicatorResult};

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 7 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl MacdParams {
    /// 가장 긴 기간.
    fn longest(&self) -> usize {
        self.fast_period.max(self.slow_period).max(self.signal_period)
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

impl MacdResult {
    fn empty() -> Self {
        Self {
            macd: None,
            signal: None,
            histogram: None,
        }
    }
}

/// 단기/장기 EMA 비교로 판단한 추세 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// 단기 EMA가 장기 EMA 위
    Up,
    /// 단기 EMA가 장기 EMA 아래
    Down,
    /// 두 EMA가 같음
    Flat,
}

impl TrendDirection {
    /// 두 EMA 값에서 방향을 판단합니다.
    pub fn from_emas(fast: Option<Decimal>, slow: Option<Decimal>) -> Option<Self> {
        let (fast, slow) = (fast?, slow?);
        Some(match fast.cmp(&slow) {
            std::cmp::Ordering::Greater => TrendDirection::Up,
            std::cmp::Ordering::Less => TrendDirection::Down,
            std::cmp::Ordering::Equal => TrendDirection::Flat,
        })
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Flat => write!(f, "flat"),
        }
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × k) + (이전 EMA × (1 - k))
    /// k = 2 / (period + 1)
    ///
    /// 누적기는 첫 샘플부터 계속 돌지만, 처음 period-1개 위치는 `None`으로 보고합니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터
    /// * `params` - EMA 파라미터
    ///
    /// # 반환
    /// 각 시점의 EMA 값 (처음 period-1개는 None)
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;
        ensure_len(prices.len(), period)?;

        Ok(mask_warmup(ema_scan(prices, period), period - 1))
    }

    /// MACD 계산.
    ///
    /// - MACD 라인 = EMA(fast) - EMA(slow)
    /// - 시그널 라인 = EMA(MACD 라인, signal)
    /// - 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// 시그널은 마스킹 전의 전체 MACD 재귀 값 위에서 계산합니다.
    /// 처음 max(fast, slow, signal)-1개 위치는 모두 `None`입니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        ensure_period(params.fast_period)?;
        ensure_period(params.slow_period)?;
        ensure_period(params.signal_period)?;

        let longest = params.longest();
        ensure_len(prices.len(), longest)?;

        let fast = ema_scan(prices, params.fast_period);
        let slow = ema_scan(prices, params.slow_period);
        let macd_line: Vec<Decimal> = fast.iter().zip(&slow).map(|(f, s)| *f - *s).collect();
        let signal_line = ema_scan(&macd_line, params.signal_period);

        let warmup = longest - 1;
        let result = macd_line
            .iter()
            .zip(&signal_line)
            .enumerate()
            .map(|(i, (&macd, &signal))| {
                if i < warmup {
                    MacdResult::empty()
                } else {
                    MacdResult {
                        macd: Some(macd),
                        signal: Some(signal),
                        histogram: Some(macd - signal),
                    }
                }
            })
            .collect();

        Ok(result)
    }
}
