//! OBV (On-Balance Volume) 지표.
//!
//! 거래량 누적으로 매수/매도 자금 흐름을 추적합니다.
//!
//! ## 계산 방식
//! - 시작값: 0
//! - 종가 상승: OBV += 거래량
//! - 종가 하락: OBV -= 거래량
//! - 종가 동일: OBV 변화 없음

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{ensure_len, ensure_same_len, IndicatorResult};

/// OBV 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObvCalculator;

impl ObvCalculator {
    /// 새로운 OBV 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// OBV 계산.
    ///
    /// # 반환
    /// 각 시점의 누적 OBV (모든 위치가 정의됨)
    pub fn calculate(
        &self,
        close: &[Decimal],
        volume: &[Decimal],
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let len = ensure_same_len(&[close, volume])?;
        ensure_len(len, 2)?;

        let mut result = Vec::with_capacity(len);
        let mut obv = Decimal::ZERO;
        result.push(Some(obv));

        for i in 1..len {
            if close[i] > close[i - 1] {
                obv += volume[i];
            } else if close[i] < close[i - 1] {
                obv -= volume[i];
            }
            result.push(Some(obv));
        }

        Ok(result)
    }

    /// 마지막 봉의 OBV 변화율(%).
    ///
    /// `100 × (obv[-1] - obv[-2]) / |obv[-2]|`, 직전 값이 0이면 `None`.
    pub fn change_percent(obv: &[Option<Decimal>]) -> Option<Decimal> {
        let [.., previous, current] = obv else {
            return None;
        };
        let (previous, current) = ((*previous)?, (*current)?);
        (dec!(100) * (current - previous)).checked_div(previous.abs())
    }
}
