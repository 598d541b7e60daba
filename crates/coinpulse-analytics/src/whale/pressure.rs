//! 일간 거래대금 대비 순흐름 압력 평가.

use coinpulse_core::CoinMarketStats;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CoinFlows, FlowSide, WindowSummary};

/// 약한 압력 상한 (%).
const LIGHT_LIMIT_PCT: Decimal = dec!(1);
/// 보통 압력 상한 (%).
const MODERATE_LIMIT_PCT: Decimal = dec!(5);

/// 압력 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureLevel {
    /// 일간 거래대금을 조회하지 못함
    Unavailable,
    /// 순흐름 0 또는 거래대금 0
    Neutral,
    LightBuying,
    Buying,
    StrongBuying,
    LightSelling,
    Selling,
    StrongSelling,
}

impl fmt::Display for PressureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PressureLevel::Unavailable => "volume data unavailable",
            PressureLevel::Neutral => "no pressure, market neutral",
            PressureLevel::LightBuying => "light buying pressure",
            PressureLevel::Buying => "buying pressure building",
            PressureLevel::StrongBuying => "strong buying pressure",
            PressureLevel::LightSelling => "light selling pressure",
            PressureLevel::Selling => "selling pressure building",
            PressureLevel::StrongSelling => "strong selling pressure",
        };
        write!(f, "{}", text)
    }
}

/// 압력 평가 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowAssessment {
    pub level: PressureLevel,
    /// 일간 거래대금 대비 순흐름 비율 (%). 거래대금이 없거나 비율이 표현 범위를 넘으면 None
    pub ratio_pct: Option<Decimal>,
}

/// 순흐름 압력 평가기.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlowPressure;

impl FlowPressure {
    /// 순흐름 값을 일간 거래대금과 비교해 평가합니다.
    ///
    /// 거래소 유출 쪽이면 매수 압력, 그 외에는 매도 압력으로 봅니다.
    /// 비율이 1% 미만이면 약함, 5% 미만이면 보통, 그 이상이면 강함입니다.
    pub fn assess(
        net_value: Decimal,
        daily_volume: Option<Decimal>,
        side: Option<FlowSide>,
    ) -> FlowAssessment {
        let Some(volume) = daily_volume else {
            return FlowAssessment {
                level: PressureLevel::Unavailable,
                ratio_pct: None,
            };
        };

        // 나눗셈이 넘치면 None, 강함 구간으로 취급
        let ratio = if volume > Decimal::ZERO {
            net_value
                .abs()
                .checked_div(volume)
                .and_then(|r| r.checked_mul(dec!(100)))
                .map(|r| r.round_dp(4))
        } else {
            Some(Decimal::ZERO)
        };

        let level = if net_value.is_zero() || volume.is_zero() {
            PressureLevel::Neutral
        } else {
            let tier = match ratio {
                Some(r) if r < LIGHT_LIMIT_PCT => 0,
                Some(r) if r < MODERATE_LIMIT_PCT => 1,
                _ => 2,
            };
            match (side, tier) {
                (Some(FlowSide::Outflow), 0) => PressureLevel::LightBuying,
                (Some(FlowSide::Outflow), 1) => PressureLevel::Buying,
                (Some(FlowSide::Outflow), _) => PressureLevel::StrongBuying,
                (_, 0) => PressureLevel::LightSelling,
                (_, 1) => PressureLevel::Selling,
                (_, _) => PressureLevel::StrongSelling,
            }
        };

        FlowAssessment {
            level,
            ratio_pct: ratio,
        }
    }

    /// 윈도우 하나의 순 USD 흐름을 평가합니다.
    pub fn for_window(summary: &WindowSummary, stats: &CoinMarketStats) -> FlowAssessment {
        Self::assess(
            summary.net_usd(),
            stats.daily_volume_usd,
            summary.pressure_side(),
        )
    }

    /// 코인의 대표 평가.
    ///
    /// 가장 긴 윈도우의 순수량에 가격을 곱한 값을 씁니다. 가격을 모르면 순수량 그대로 비교합니다.
    pub fn headline(flows: &CoinFlows, stats: &CoinMarketStats) -> FlowAssessment {
        let Some(summary) = flows.longest() else {
            return Self::assess(Decimal::ZERO, stats.daily_volume_usd, None);
        };
        let net = summary.net_amount();
        let value = match stats.price_usd {
            Some(price) if !price.is_zero() => net * price,
            _ => net,
        };
        Self::assess(value, stats.daily_volume_usd, summary.pressure_side())
    }
}
