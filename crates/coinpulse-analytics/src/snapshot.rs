//! 타임프레임별 지표 스냅샷.
//!
//! 캔들 시계열 하나에서 모든 지표를 계산해 마지막 값만 모아둡니다.
//! 계산할 수 없는 지표는 `None`으로 남고, 점수 계산에서 누락 지표로 처리됩니다.

use coinpulse_core::{CandleSeries, Timeframe};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{
    latest, AdxParams, AtrParams, BollingerBandsParams, BollingerBandsResult, EmaParams,
    IndicatorEngine, IndicatorResult, MacdParams, MfiParams, ObvCalculator, RsiParams,
    StochRsiParams, TrendDirection, TrendStrength, VolatilityTier,
};

/// 단기 EMA 기간.
pub const EMA_FAST_PERIOD: usize = 7;
/// 장기 EMA 기간.
pub const EMA_SLOW_PERIOD: usize = 21;
/// 지지/저항 계산에 쓰는 최근 종가 개수.
pub const SUPPORT_LOOKBACK: usize = 20;

/// RSI 과매수 기준.
const RSI_OVERBOUGHT: Decimal = dec!(70);
/// RSI 과매도 기준.
const RSI_OVERSOLD: Decimal = dec!(30);
/// OBV 급증 기준 (%).
const OBV_SURGE_PCT: Decimal = dec!(5);

/// 한 타임프레임의 최신 지표 값.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// 마지막 종가
    pub close: Option<Decimal>,
    /// EMA(7)
    pub ema_fast: Option<Decimal>,
    /// EMA(21)
    pub ema_slow: Option<Decimal>,
    /// MACD 라인
    pub macd_line: Option<Decimal>,
    /// MACD 시그널
    pub macd_signal: Option<Decimal>,
    /// MACD 히스토그램
    pub macd_histogram: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub stoch_rsi: Option<Decimal>,
    pub mfi: Option<Decimal>,
    pub adx: Option<Decimal>,
    pub plus_di: Option<Decimal>,
    pub minus_di: Option<Decimal>,
    pub obv: Option<Decimal>,
    /// 직전 봉 대비 OBV 변화율 (%)
    pub obv_change_pct: Option<Decimal>,
    pub atr: Option<Decimal>,
    /// 볼린저 밴드 (마지막 위치)
    pub bollinger: Option<BollingerBandsResult>,
    /// ATR/종가 변동성 등급
    pub volatility: Option<VolatilityTier>,
    /// ADX 추세 강도
    pub trend_strength: Option<TrendStrength>,
    /// EMA7/EMA21 추세 방향
    pub trend: Option<TrendDirection>,
    /// 최근 20개 종가의 최저값
    pub support: Option<Decimal>,
    /// 최근 20개 종가의 최고값
    pub resistance: Option<Decimal>,
}

/// 계산 실패를 누락으로 바꾸고 사유를 남깁니다.
fn available<T>(name: &str, timeframe: Timeframe, result: IndicatorResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(indicator = name, timeframe = %timeframe, error = %e, "지표 계산 불가");
            None
        }
    }
}

impl IndicatorSnapshot {
    /// 캔들 시계열에서 스냅샷을 계산합니다.
    pub fn from_series(engine: &IndicatorEngine, series: &CandleSeries) -> Self {
        let timeframe = series.timeframe();
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();
        let volumes = series.volumes();

        let ema_fast = available(
            "ema_fast",
            timeframe,
            engine.ema(&closes, EmaParams { period: EMA_FAST_PERIOD }),
        )
        .and_then(|v| latest(&v));
        let ema_slow = available(
            "ema_slow",
            timeframe,
            engine.ema(&closes, EmaParams { period: EMA_SLOW_PERIOD }),
        )
        .and_then(|v| latest(&v));

        let macd = available("macd", timeframe, engine.macd(&closes, MacdParams::default()))
            .and_then(|v| v.last().copied());

        let rsi = available("rsi", timeframe, engine.rsi(&closes, RsiParams::default()))
            .and_then(|v| latest(&v));
        let stoch_rsi = available(
            "stoch_rsi",
            timeframe,
            engine.stoch_rsi(&closes, StochRsiParams::default()),
        )
        .and_then(|v| latest(&v));
        let mfi = available(
            "mfi",
            timeframe,
            engine.mfi(&highs, &lows, &closes, &volumes, MfiParams::default()),
        )
        .and_then(|v| latest(&v));

        let adx = available(
            "adx",
            timeframe,
            engine.adx(&highs, &lows, &closes, AdxParams::default()),
        )
        .and_then(|v| v.last().copied());

        let obv_series = available("obv", timeframe, engine.obv(&closes, &volumes));
        let obv = obv_series.as_deref().and_then(latest);
        let obv_change_pct = obv_series.as_deref().and_then(ObvCalculator::change_percent);

        let atr = available(
            "atr",
            timeframe,
            engine.atr(&highs, &lows, &closes, AtrParams::default()),
        )
        .and_then(|v| latest(&v));

        let bollinger = available(
            "bollinger",
            timeframe,
            engine.bollinger_bands(&closes, BollingerBandsParams::default()),
        )
        .and_then(|v| v.last().copied());

        let close = closes.last().copied();
        let recent = &closes[closes.len().saturating_sub(SUPPORT_LOOKBACK)..];
        let support = recent.iter().copied().min();
        let resistance = recent.iter().copied().max();

        let adx_value = adx.and_then(|a| a.adx);
        let volatility = match (atr, close) {
            (Some(atr), Some(close)) => VolatilityTier::classify(atr, close, timeframe),
            _ => None,
        };

        Self {
            close,
            ema_fast,
            ema_slow,
            macd_line: macd.and_then(|m| m.macd),
            macd_signal: macd.and_then(|m| m.signal),
            macd_histogram: macd.and_then(|m| m.histogram),
            rsi,
            stoch_rsi,
            mfi,
            adx: adx_value,
            plus_di: adx.and_then(|a| a.plus_di),
            minus_di: adx.and_then(|a| a.minus_di),
            obv,
            obv_change_pct,
            atr,
            bollinger,
            volatility,
            trend_strength: adx_value.map(TrendStrength::from_adx),
            trend: TrendDirection::from_emas(ema_fast, ema_slow),
            support,
            resistance,
        }
    }

    /// RSI/MACD/OBV 상태에 따른 시장 코멘트.
    pub fn remarks(&self) -> Vec<MarketRemark> {
        let mut remarks = Vec::new();

        match self.rsi {
            Some(rsi) if rsi > RSI_OVERBOUGHT => remarks.push(MarketRemark::RsiOverbought { rsi }),
            Some(rsi) if rsi < RSI_OVERSOLD => remarks.push(MarketRemark::RsiOversold { rsi }),
            _ => {}
        }

        match self.macd_line {
            Some(macd) if macd > Decimal::ZERO => remarks.push(MarketRemark::MacdUpwardMomentum),
            Some(_) => remarks.push(MarketRemark::MacdDownwardMomentum),
            None => {}
        }

        if let Some(change_pct) = self.obv_change_pct.filter(|pct| *pct > OBV_SURGE_PCT) {
            remarks.push(MarketRemark::ObvBuyingSurge { change_pct });
        }

        remarks
    }
}

/// 지표 상태에서 도출한 시장 코멘트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketRemark {
    /// RSI > 70
    RsiOverbought { rsi: Decimal },
    /// RSI < 30
    RsiOversold { rsi: Decimal },
    /// MACD 라인 양수
    MacdUpwardMomentum,
    /// MACD 라인 0 이하
    MacdDownwardMomentum,
    /// OBV가 직전 봉 대비 5% 넘게 증가
    ObvBuyingSurge { change_pct: Decimal },
}
