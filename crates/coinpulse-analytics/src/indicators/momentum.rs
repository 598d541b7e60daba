//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표들을 제공합니다.
//! - RSI (Relative Strength Index)
//! - StochRSI (RSI 기반 스토캐스틱)
//! - MFI (Money Flow Index)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{ensure_len, ensure_period, ensure_same_len, IndicatorResult};

/// RSI 워밍업 구간에 채워지는 중립값.
pub const RSI_NEUTRAL: Decimal = dec!(50);

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// StochRSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochRsiParams {
    /// RSI 기간이자 최고/최저 탐색 구간 (기본: 14).
    pub period: usize,
}

impl Default for StochRsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// MFI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MfiParams {
    /// 자금 흐름 합산 기간 (기본: 14).
    pub period: usize,
}

impl Default for MfiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 양/음 흐름 비율을 0-100 지수로 변환합니다. `negative == 0`이면 100.
fn ratio_index(positive: Decimal, negative: Decimal) -> Decimal {
    match positive.checked_div(negative) {
        Some(ratio) if !negative.is_zero() => dec!(100) - dec!(100) / (Decimal::ONE + ratio),
        _ => dec!(100),
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 처음 period개 변화량으로 평균을 시드한 뒤, period 위치부터 Wilder 평활을 적용합니다.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (처음 period개는 중립값 50)
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        Ok(self
            .rsi_series(prices, params.period)?
            .into_iter()
            .map(Some)
            .collect())
    }

    /// 모든 위치가 채워진 RSI 시계열.
    fn rsi_series(&self, prices: &[Decimal], period: usize) -> IndicatorResult<Vec<Decimal>> {
        ensure_period(period)?;
        ensure_len(prices.len(), period + 1)?;

        let deltas: Vec<Decimal> = prices.windows(2).map(|w| w[1] - w[0]).collect();
        let period_decimal = Decimal::from(period);
        let carry = Decimal::from(period - 1);

        let seed = &deltas[..period];
        let mut up = seed.iter().filter(|d| d.is_sign_positive()).sum::<Decimal>() / period_decimal;
        let mut down = -seed.iter().filter(|d| d.is_sign_negative()).sum::<Decimal>() / period_decimal;

        let mut result = vec![RSI_NEUTRAL; period];
        result.reserve(prices.len() - period);

        for delta in &deltas[period - 1..] {
            let gain = (*delta).max(Decimal::ZERO);
            let loss = (-*delta).max(Decimal::ZERO);
            up = (up * carry + gain) / period_decimal;
            down = (down * carry + loss) / period_decimal;
            result.push(ratio_index(up, down));
        }

        Ok(result)
    }

    /// StochRSI 계산.
    ///
    /// StochRSI = 100 × (RSI - 최저 RSI) / (최고 RSI - 최저 RSI)
    ///
    /// 최근 period개 RSI 구간에서 계산하며, 최고 == 최저이면 0입니다.
    ///
    /// # 반환
    /// 0-100 사이의 값 (처음 period개는 None)
    pub fn stoch_rsi(
        &self,
        prices: &[Decimal],
        params: StochRsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        let rsi = self.rsi_series(prices, period)?;

        let mut result = vec![None; period.min(rsi.len())];
        for i in period..rsi.len() {
            let window = &rsi[i + 1 - period..=i];
            let lowest = window.iter().copied().fold(rsi[i], Decimal::min);
            let highest = window.iter().copied().fold(rsi[i], Decimal::max);
            let range = highest - lowest;

            let value = if range.is_zero() {
                Decimal::ZERO
            } else {
                dec!(100) * (rsi[i] - lowest) / range
            };
            result.push(Some(value));
        }

        Ok(result)
    }

    /// MFI (Money Flow Index) 계산.
    ///
    /// - 전형가격 TP = (고가 + 저가 + 종가) / 3
    /// - 원시 자금 흐름 = TP × 거래량
    /// - 최근 period개 구간에서 TP가 오른 봉의 흐름은 양, 내린 봉의 흐름은 음으로 합산
    /// - MFI = 100 - 100 / (1 + 양 / 음), 음 흐름이 0이면 100
    ///
    /// # 반환
    /// 0-100 사이의 값 (처음 period개는 None)
    pub fn mfi(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        volume: &[Decimal],
        params: MfiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;
        let len = ensure_same_len(&[high, low, close, volume])?;
        ensure_len(len, period + 1)?;

        let typical: Vec<Decimal> = (0..len)
            .map(|i| (high[i] + low[i] + close[i]) / dec!(3))
            .collect();
        let raw_flow: Vec<Decimal> = typical.iter().zip(volume).map(|(tp, v)| *tp * *v).collect();

        let mut result = vec![None; period];
        for i in period..len {
            let mut positive = Decimal::ZERO;
            let mut negative = Decimal::ZERO;

            for j in i + 1 - period..=i {
                if typical[j] > typical[j - 1] {
                    positive += raw_flow[j];
                } else if typical[j] < typical[j - 1] {
                    negative += raw_flow[j];
                }
            }

            result.push(Some(ratio_index(positive, negative)));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorError;
    use proptest::prelude::*;

    fn rising(len: usize) -> Vec<Decimal> {
        (0..len).map(|i| dec!(100) + Decimal::from(i)).collect()
    }

    #[test]
    fn test_rsi_warmup_is_neutral() {
        let calc = MomentumCalculator::new();
        let prices = rising(20);

        let rsi = calc.rsi(&prices, RsiParams::default()).unwrap();
        assert_eq!(rsi.len(), 20);
        for value in &rsi[..14] {
            assert_eq!(*value, Some(dec!(50)));
        }
    }

    #[test]
    fn test_rsi_rising_series_reaches_100() {
        let calc = MomentumCalculator::new();
        let prices = rising(30);

        let rsi = calc.rsi(&prices, RsiParams::default()).unwrap();
        for value in &rsi[14..] {
            assert_eq!(*value, Some(dec!(100)));
        }
    }

    #[test]
    fn test_rsi_no_losses_in_window_is_100() {
        let calc = MomentumCalculator::new();
        // 보합과 상승만 섞인 시계열
        let prices = vec![
            dec!(10), dec!(10), dec!(11), dec!(11), dec!(12), dec!(13), dec!(13), dec!(14),
        ];

        let rsi = calc.rsi(&prices, RsiParams { period: 3 }).unwrap();
        for value in &rsi[3..] {
            assert_eq!(*value, Some(dec!(100)));
        }
    }

    #[test]
    fn test_rsi_falling_series_is_low() {
        let calc = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..30).map(|i| dec!(200) - Decimal::from(i)).collect();

        let rsi = calc.rsi(&prices, RsiParams::default()).unwrap();
        assert_eq!(rsi[29], Some(Decimal::ZERO));
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let calc = MomentumCalculator::new();
        let result = calc.rsi(&rising(14), RsiParams::default());
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData {
                required: 15,
                provided: 14
            })
        ));
    }

    #[test]
    fn test_stoch_rsi_flat_rsi_is_zero() {
        let calc = MomentumCalculator::new();
        let prices = rising(40);

        let stoch = calc.stoch_rsi(&prices, StochRsiParams::default()).unwrap();
        assert!(stoch[13].is_none());
        // RSI가 50 → 100으로 오른 직후 구간은 최고값과 같아 100
        assert_eq!(stoch[14], Some(dec!(100)));
        // 이후 RSI가 100으로 고정되면 최고 == 최저 → 0
        assert_eq!(stoch[39], Some(Decimal::ZERO));
    }

    #[test]
    fn test_mfi_all_positive_flow_is_100() {
        let calc = MomentumCalculator::new();
        let close = rising(20);
        let high: Vec<Decimal> = close.iter().map(|c| *c + dec!(1)).collect();
        let low: Vec<Decimal> = close.iter().map(|c| *c - dec!(1)).collect();
        let volume = vec![dec!(1000); 20];

        let mfi = calc
            .mfi(&high, &low, &close, &volume, MfiParams::default())
            .unwrap();
        assert!(mfi[13].is_none());
        assert_eq!(mfi[19], Some(dec!(100)));
    }

    #[test]
    fn test_mfi_balanced_flow() {
        let calc = MomentumCalculator::new();
        // 상승/하락이 번갈아 나오고 거래량이 같으면 중간 근처
        let close = vec![
            dec!(10), dec!(12), dec!(10), dec!(12), dec!(10),
        ];
        let volume = vec![dec!(1); 5];

        let mfi = calc
            .mfi(&close, &close, &close, &volume, MfiParams { period: 4 })
            .unwrap();
        // 양: 12 + 12 = 24, 음: 10 + 10 = 20 → 100 - 100 / 2.2
        let expected = dec!(100) - dec!(100) / (Decimal::ONE + dec!(24) / dec!(20));
        assert_eq!(mfi[4], Some(expected));
    }

    #[test]
    fn test_mfi_mismatched_columns() {
        let calc = MomentumCalculator::new();
        let close = rising(20);
        let short = rising(19);
        let result = calc.mfi(&close, &close, &close, &short, MfiParams::default());
        assert!(matches!(result, Err(IndicatorError::InvalidParameter(_))));
    }

    proptest! {
        #[test]
        fn prop_rsi_is_bounded(raw in prop::collection::vec(1i64..10_000_000, 15..80)) {
            let prices: Vec<Decimal> = raw.iter().map(|v| Decimal::new(*v, 2)).collect();
            let rsi = MomentumCalculator::new().rsi(&prices, RsiParams::default()).unwrap();
            for value in rsi.into_iter().flatten() {
                prop_assert!(value >= Decimal::ZERO);
                prop_assert!(value <= dec!(100));
            }
        }
    }
}
