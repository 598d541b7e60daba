//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표들을 제공합니다.
//! - Bollinger Bands (볼린저 밴드)
//! - ATR (Average True Range, 평균 실제 범위)
//! - ATR/종가 비율 기반 변동성 등급

use coinpulse_core::Timeframe;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ema_scan, ensure_len, ensure_period, ensure_same_len, mask_warmup, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
}

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14).
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ATR/종가 비율로 나눈 변동성 등급.
///
/// 5분봉은 `매우 낮음 / 낮음 / 높음`, 나머지 타임프레임은 `낮음 / 보통 / 높음` 세 단계를 씁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityTier {
    /// 매우 낮음 (5분봉 전용)
    VeryLow,
    /// 낮음
    Low,
    /// 보통
    Medium,
    /// 높음
    High,
}

impl VolatilityTier {
    /// ATR과 종가로 등급을 분류합니다. 종가가 0이면 `None`.
    pub fn classify(atr: Decimal, close: Decimal, timeframe: Timeframe) -> Option<Self> {
        let ratio = atr.checked_div(close)?;
        let tier = match timeframe {
            Timeframe::M5 if ratio < dec!(0.01) => VolatilityTier::VeryLow,
            Timeframe::M5 if ratio < dec!(0.02) => VolatilityTier::Low,
            Timeframe::M5 => VolatilityTier::High,
            _ if ratio < dec!(0.01) => VolatilityTier::Low,
            _ if ratio < dec!(0.02) => VolatilityTier::Medium,
            _ => VolatilityTier::High,
        };
        Some(tier)
    }

    /// 점수 기여도: 낮음 +1, 높음/매우 낮음 -1, 보통 0.
    pub fn score(&self) -> i32 {
        match self {
            VolatilityTier::Low => 1,
            VolatilityTier::Medium => 0,
            VolatilityTier::High | VolatilityTier::VeryLow => -1,
        }
    }
}

impl fmt::Display for VolatilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityTier::VeryLow => write!(f, "very_low"),
            VolatilityTier::Low => write!(f, "low"),
            VolatilityTier::Medium => write!(f, "medium"),
            VolatilityTier::High => write!(f, "high"),
        }
    }
}

/// True Range 시계열. 첫 위치는 전일 종가가 없으므로 0입니다.
///
/// 입력 컬럼 길이가 같다고 가정합니다.
pub(crate) fn true_range(high: &[Decimal], low: &[Decimal], close: &[Decimal]) -> Vec<Decimal> {
    let len = high.len().min(low.len()).min(close.len());
    let mut tr = vec![Decimal::ZERO; len];
    for i in 1..len {
        let range = high[i] - low[i];
        let gap_up = (high[i] - close[i - 1]).abs();
        let gap_down = (low[i] - close[i - 1]).abs();
        tr[i] = range.max(gap_up).max(gap_down);
    }
    tr
}

/// 변동성 지표 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// - 중간 밴드: period 단순 이동평균
    /// - 상단/하단: 중간 ± k × 모집단 표준편차
    ///
    /// # 반환
    /// 각 시점의 밴드 (처음 period-1개는 None)
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;
        ensure_period(period)?;
        ensure_len(prices.len(), period)?;

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(BollingerBandsResult {
                    upper: None,
                    middle: None,
                    lower: None,
                });
                continue;
            }

            let window = &prices[i + 1 - period..=i];
            let mean = window.iter().sum::<Decimal>() / period_decimal;
            let variance = window
                .iter()
                .map(|p| (*p - mean) * (*p - mean))
                .sum::<Decimal>()
                / period_decimal;
            let std_dev = variance.sqrt().unwrap_or(Decimal::ZERO);
            let deviation = params.std_dev_multiplier * std_dev;

            result.push(BollingerBandsResult {
                upper: Some(mean + deviation),
                middle: Some(mean),
                lower: Some(mean - deviation),
            });
        }

        Ok(result)
    }

    /// ATR (Average True Range) 계산.
    ///
    /// TR 시계열(첫 위치 0)을 첫 샘플 시드 EMA(period)로 평활합니다.
    ///
    /// # 반환
    /// 각 시점의 ATR 값 (처음 period개는 None)
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;
        let len = ensure_same_len(&[high, low, close])?;
        ensure_len(len, period + 1)?;

        let smoothed = ema_scan(&true_range(high, low, close), period);
        Ok(mask_warmup(smoothed, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorError;

    #[test]
    fn test_true_range_first_is_zero() {
        let high = [dec!(11), dec!(13)];
        let low = [dec!(9), dec!(12)];
        let close = [dec!(10), dec!(12.5)];

        let tr = true_range(&high, &low, &close);
        assert_eq!(tr[0], Decimal::ZERO);
        // max(1, |13 - 10|, |12 - 10|) = 3
        assert_eq!(tr[1], dec!(3));
    }

    #[test]
    fn test_bollinger_constant_series() {
        let calc = VolatilityIndicators::new();
        let prices = vec![dec!(100); 25];

        let bands = calc
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();
        assert!(bands[18].middle.is_none());

        let last = bands[24];
        assert_eq!(last.middle, Some(dec!(100)));
        assert_eq!(last.upper, Some(dec!(100)));
        assert_eq!(last.lower, Some(dec!(100)));
    }

    #[test]
    fn test_bollinger_population_std() {
        let calc = VolatilityIndicators::new();
        // 평균 5, 모집단 분산 4 → σ = 2
        let prices = vec![dec!(2), dec!(4), dec!(4), dec!(4), dec!(5), dec!(5), dec!(7), dec!(9)];

        let bands = calc
            .bollinger_bands(
                &prices,
                BollingerBandsParams {
                    period: 8,
                    std_dev_multiplier: dec!(2),
                },
            )
            .unwrap();

        let last = bands[7];
        assert_eq!(last.middle, Some(dec!(5)));
        assert_eq!(last.upper, Some(dec!(9)));
        assert_eq!(last.lower, Some(dec!(1)));
    }

    #[test]
    fn test_atr_warmup_and_value() {
        let calc = VolatilityIndicators::new();
        let close = vec![dec!(100); 20];
        let high: Vec<Decimal> = close.iter().map(|c| *c + dec!(1)).collect();
        let low: Vec<Decimal> = close.iter().map(|c| *c - dec!(1)).collect();

        let atr = calc.atr(&high, &low, &close, AtrParams::default()).unwrap();
        assert!(atr[13].is_none());
        // TR은 0에서 시작해 2로 수렴
        let last = atr[19].unwrap();
        assert!(last > dec!(1.5) && last < dec!(2));
    }

    #[test]
    fn test_atr_insufficient_data() {
        let calc = VolatilityIndicators::new();
        let close = vec![dec!(100); 10];
        let result = calc.atr(&close, &close, &close, AtrParams::default());
        assert!(matches!(result, Err(IndicatorError::InsufficientData { .. })));
    }

    #[test]
    fn test_volatility_tier_by_timeframe() {
        assert_eq!(
            VolatilityTier::classify(dec!(0.5), dec!(100), Timeframe::M5),
            Some(VolatilityTier::VeryLow)
        );
        assert_eq!(
            VolatilityTier::classify(dec!(1.5), dec!(100), Timeframe::M5),
            Some(VolatilityTier::Low)
        );
        assert_eq!(
            VolatilityTier::classify(dec!(0.5), dec!(100), Timeframe::H1),
            Some(VolatilityTier::Low)
        );
        assert_eq!(
            VolatilityTier::classify(dec!(1.5), dec!(100), Timeframe::H4),
            Some(VolatilityTier::Medium)
        );
        assert_eq!(
            VolatilityTier::classify(dec!(3), dec!(100), Timeframe::D1),
            Some(VolatilityTier::High)
        );
        assert_eq!(VolatilityTier::classify(dec!(1), Decimal::ZERO, Timeframe::H1), None);
    }

    #[test]
    fn test_volatility_tier_score() {
        assert_eq!(VolatilityTier::Low.score(), 1);
        assert_eq!(VolatilityTier::Medium.score(), 0);
        assert_eq!(VolatilityTier::High.score(), -1);
        assert_eq!(VolatilityTier::VeryLow.score(), -1);
    }
}
