//! 방향성 지표 (Directional Indicators).
//!
//! - ADX (Average Directional Index)
//! - +DI / -DI (Directional Indicator)
//!
//! 모든 평활은 첫 샘플로 시드한 EMA이며, 실패한 나눗셈은 0으로 대체합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::volatility::true_range;
use super::{ema_scan, ensure_len, ensure_period, ensure_same_len, IndicatorResult};

/// ADX 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxParams {
    /// 평활 기간 (기본: 14).
    pub period: usize,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ADX 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxResult {
    /// 평균 방향 지수.
    pub adx: Option<Decimal>,
    /// 상승 방향 지표.
    pub plus_di: Option<Decimal>,
    /// 하락 방향 지표.
    pub minus_di: Option<Decimal>,
}

/// ADX 기반 추세 강도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    /// ADX < 20
    Weak,
    /// 20 ≤ ADX < 25
    Moderate,
    /// ADX ≥ 25
    Strong,
}

impl TrendStrength {
    /// ADX 값에서 추세 강도를 판단합니다.
    pub fn from_adx(adx: Decimal) -> Self {
        if adx < dec!(20) {
            TrendStrength::Weak
        } else if adx < dec!(25) {
            TrendStrength::Moderate
        } else {
            TrendStrength::Strong
        }
    }

    /// 추세 점수 (0: 약함, 1: 보통, 2: 강함).
    pub fn trend_score(&self) -> i32 {
        match self {
            TrendStrength::Weak => 0,
            TrendStrength::Moderate => 1,
            TrendStrength::Strong => 2,
        }
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendStrength::Weak => write!(f, "weak"),
            TrendStrength::Moderate => write!(f, "moderate"),
            TrendStrength::Strong => write!(f, "strong"),
        }
    }
}

/// `100 × numerator / denominator`, 실패 시 0.
fn percent_of(numerator: Decimal, denominator: Decimal) -> Decimal {
    (dec!(100) * numerator)
        .checked_div(denominator)
        .unwrap_or(Decimal::ZERO)
}

/// 방향성 지표 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectionalIndicators;

impl DirectionalIndicators {
    /// 새로운 방향성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// ADX 계산.
    ///
    /// - +DM = 고가 상승폭 (하락폭보다 크고 양수일 때만), -DM은 대칭
    /// - TR = max(고가 - 저가, |고가 - 전일 종가|, |저가 - 전일 종가|), 첫 위치는 0
    /// - +DI = 100 × EMA(+DM) / EMA(TR), -DI 대칭
    /// - DX = 100 × |+DI - -DI| / (+DI + -DI)
    /// - ADX = EMA(DX)
    ///
    /// # 반환
    /// 각 시점의 ADX와 ±DI (처음 period개는 None)
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        let period = params.period;
        ensure_period(period)?;
        let len = ensure_same_len(&[high, low, close])?;
        ensure_len(len, period + 1)?;

        let mut plus_dm = vec![Decimal::ZERO; len];
        let mut minus_dm = vec![Decimal::ZERO; len];
        for i in 1..len {
            let up = high[i] - high[i - 1];
            let down = low[i - 1] - low[i];
            if up > down && up > Decimal::ZERO {
                plus_dm[i] = up;
            }
            if down > up && down > Decimal::ZERO {
                minus_dm[i] = down;
            }
        }

        let tr_ema = ema_scan(&true_range(high, low, close), period);
        let plus_ema = ema_scan(&plus_dm, period);
        let minus_ema = ema_scan(&minus_dm, period);

        let plus_di: Vec<Decimal> = plus_ema
            .iter()
            .zip(&tr_ema)
            .map(|(dm, tr)| percent_of(*dm, *tr))
            .collect();
        let minus_di: Vec<Decimal> = minus_ema
            .iter()
            .zip(&tr_ema)
            .map(|(dm, tr)| percent_of(*dm, *tr))
            .collect();
        let dx: Vec<Decimal> = plus_di
            .iter()
            .zip(&minus_di)
            .map(|(p, m)| percent_of((*p - *m).abs(), *p + *m))
            .collect();
        let adx = ema_scan(&dx, period);

        let result = (0..len)
            .map(|i| {
                if i < period {
                    AdxResult {
                        adx: None,
                        plus_di: None,
                        minus_di: None,
                    }
                } else {
                    AdxResult {
                        adx: Some(adx[i]),
                        plus_di: Some(plus_di[i]),
                        minus_di: Some(minus_di[i]),
                    }
                }
            })
            .collect();

        Ok(result)
    }
}
