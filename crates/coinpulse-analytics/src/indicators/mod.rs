//! 기술적 지표 모듈.
//!
//! 캔들 히스토리에서 시그널 점수에 쓰이는 고전 지표를 계산합니다.
//! 모든 함수는 순수 함수이며, 재귀 평활은 호출마다 새 누적기로 한 번 순회합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **EMA**: 지수 이동평균 (첫 샘플 시드)
//! - **MACD**: 이동평균 수렴/확산
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Wilder 평활)
//! - **StochRSI**: RSI에 적용한 스토캐스틱
//! - **MFI**: 자금 흐름 지수
//!
//! ## 방향성 지표 (Directional Indicators)
//! - **ADX**: 평균 방향 지수 (+DI / -DI 포함)
//!
//! ## 거래량 지표
//! - **OBV**: 잔고 거래량
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드 (모집단 표준편차)
//! - **ATR**: 평균 실제 범위
//!
//! # 워밍업 규칙
//!
//! 결과는 입력과 같은 길이의 벡터이며, 워밍업 구간은 `None`입니다.
//! 단, RSI의 처음 `period`개는 중립값 50으로 채워집니다.
//! 입력이 지표에 비해 짧으면 [`IndicatorError::InsufficientData`]를 반환합니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use coinpulse_analytics::indicators::{IndicatorEngine, EmaParams, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//! let ema = engine.ema(series.closes().as_slice(), EmaParams { period: 7 })?;
//! let rsi = engine.rsi(&closes, RsiParams::default())?;
//! ```

pub mod directional;
pub mod momentum;
pub mod obv;
pub mod trend;
pub mod volatility;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

pub use directional::{AdxParams, AdxResult, DirectionalIndicators, TrendStrength};
pub use momentum::{MfiParams, MomentumCalculator, RsiParams, StochRsiParams};
pub use obv::ObvCalculator;
pub use trend::{EmaParams, MacdParams, MacdResult, TrendDirection, TrendIndicators};
pub use volatility::{
    AtrParams, BollingerBandsParams, BollingerBandsResult, VolatilityIndicators, VolatilityTier,
};

/// 지표 계산 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 기간이 0이 아닌지 확인합니다.
pub(crate) fn ensure_period(period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    Ok(())
}

/// 최소 길이를 확인합니다.
pub(crate) fn ensure_len(provided: usize, required: usize) -> IndicatorResult<()> {
    if provided < required {
        return Err(IndicatorError::InsufficientData { required, provided });
    }
    Ok(())
}

/// 여러 컬럼의 길이가 모두 같은지 확인합니다.
pub(crate) fn ensure_same_len(columns: &[&[Decimal]]) -> IndicatorResult<usize> {
    let len = columns.first().map_or(0, |c| c.len());
    if columns.iter().any(|c| c.len() != len) {
        return Err(IndicatorError::InvalidParameter(
            "입력 컬럼 길이가 서로 다릅니다".to_string(),
        ));
    }
    Ok(len)
}

/// 첫 샘플로 시드한 지수 평활 스캔.
///
/// `ema[0] = values[0]`, `ema[i] = α·values[i] + (1-α)·ema[i-1]`, `α = 2/(period+1)`.
/// 워밍업 마스킹 없이 모든 위치의 값을 반환합니다.
pub(crate) fn ema_scan(values: &[Decimal], period: usize) -> Vec<Decimal> {
    let alpha = dec!(2) / Decimal::from(period + 1);
    let keep = Decimal::ONE - alpha;

    let mut result = Vec::with_capacity(values.len());
    let Some((&first, rest)) = values.split_first() else {
        return result;
    };

    let mut acc = first;
    result.push(acc);
    for &value in rest {
        acc = alpha * value + keep * acc;
        result.push(acc);
    }
    result
}

/// 앞쪽 `warmup`개 위치를 `None`으로 가립니다.
pub(crate) fn mask_warmup(values: Vec<Decimal>, warmup: usize) -> Vec<Option<Decimal>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| if i < warmup { None } else { Some(v) })
        .collect()
}

/// 마지막으로 정의된 값.
pub fn latest(values: &[Option<Decimal>]) -> Option<Decimal> {
    values.last().copied().flatten()
}

/// 통합 지표 엔진.
///
/// 점수 계산에 필요한 모든 지표를 하나의 인터페이스로 제공합니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    directional: DirectionalIndicators,
    volatility: VolatilityIndicators,
    obv: ObvCalculator,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// # 반환
    /// 각 시점의 EMA 값 (처음 period-1개는 None)
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 계산.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI 계산 (처음 period개는 50).
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    /// StochRSI 계산.
    pub fn stoch_rsi(
        &self,
        prices: &[Decimal],
        params: StochRsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.stoch_rsi(prices, params)
    }

    /// MFI 계산.
    pub fn mfi(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        volume: &[Decimal],
        params: MfiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.mfi(high, low, close, volume, params)
    }

    // ==================== 방향성 지표 ====================

    /// ADX 계산 (+DI / -DI 포함).
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        self.directional.adx(high, low, close, params)
    }

    // ==================== 거래량 지표 ====================

    /// OBV 계산.
    pub fn obv(&self, close: &[Decimal], volume: &[Decimal]) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.obv.calculate(close, volume)
    }

    // ==================== 변동성 지표 ====================

    /// 볼린저 밴드 계산.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// ATR 계산.
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.atr(high, low, close, params)
    }
}
