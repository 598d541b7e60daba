//! 타임프레임 시그널 점수 계산기.
//!
//! 지표 스냅샷과 외부 시그널(고래 순유입, 롱/숏 비율)을 고정 가중치 표로 합산합니다.
//!
//! | 지표 | 가중치 | 규칙 |
//! |------|--------|------|
//! | EMA7 vs EMA21 | 2 | EMA7 > EMA21 → +2, 아니면 -2 |
//! | MACD 라인 | 2 | > 0 → +2, 아니면 -2 |
//! | RSI | 1 | > 50 → +1, 아니면 -1 |
//! | MFI | 1 | > 50 → +1, 아니면 -1 |
//! | ATR 변동성 | 1 | 낮음 +1, 높음/매우 낮음 -1, 보통 0 |
//! | OBV | 2 | > 0 → +2, 아니면 -2 |
//! | ADX 추세 강도 | 1 | 추세 점수 - 1 (방향 무관) |
//! | 고래 순유입 | 1 | < 0 → +1, > 0 → -1 |
//! | 롱/숏 비율 | 1 | > 1.10 → +1, < 0.90 → -1 |
//!
//! 누락된 입력은 점수와 최대 점수 모두에서 빠지고 이름으로 기록됩니다.

use coinpulse_core::{CandleSeries, Timeframe};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::indicators::IndicatorEngine;
use crate::snapshot::{IndicatorSnapshot, MarketRemark};

/// 롱 우세 기준.
const LONG_SHORT_BULLISH: Decimal = dec!(1.10);
/// 숏 우세 기준.
const LONG_SHORT_BEARISH: Decimal = dec!(0.90);

/// 점수표의 입력 항목.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Ema,
    Macd,
    Rsi,
    Mfi,
    Atr,
    Obv,
    Adx,
    WhaleFlow,
    LongShort,
}

impl IndicatorKind {
    /// 점수표 가중치.
    pub fn weight(&self) -> u32 {
        match self {
            IndicatorKind::Ema | IndicatorKind::Macd | IndicatorKind::Obv => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Mfi => "MFI",
            IndicatorKind::Atr => "ATR",
            IndicatorKind::Obv => "OBV",
            IndicatorKind::Adx => "ADX",
            IndicatorKind::WhaleFlow => "WHALE_FLOW",
            IndicatorKind::LongShort => "LONG_SHORT",
        };
        write!(f, "{}", name)
    }
}

/// `score / max_score` 비율로 나눈 시그널 강도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    /// 최대 점수 0 (데이터 없음)
    NoData,
    /// 비율 ≥ 0.85
    VeryStrong,
    /// 비율 ≥ 0.6
    Moderate,
    /// 비율 ≥ 0.3
    Weak,
    /// 그 외
    Indecisive,
}

impl SignalStrength {
    /// 점수 비율에서 강도를 판단합니다.
    pub fn from_score(score: i32, max_score: u32) -> Self {
        if max_score == 0 {
            return SignalStrength::NoData;
        }
        let ratio = Decimal::from(score) / Decimal::from(max_score);
        if ratio >= dec!(0.85) {
            SignalStrength::VeryStrong
        } else if ratio >= dec!(0.6) {
            SignalStrength::Moderate
        } else if ratio >= dec!(0.3) {
            SignalStrength::Weak
        } else {
            SignalStrength::Indecisive
        }
    }
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalStrength::NoData => write!(f, "no data"),
            SignalStrength::VeryStrong => write!(f, "very strong"),
            SignalStrength::Moderate => write!(f, "moderate"),
            SignalStrength::Weak => write!(f, "weak"),
            SignalStrength::Indecisive => write!(f, "indecisive"),
        }
    }
}

/// 원점수에서 판단한 시그널.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalAction {
    /// 점수 ≥ 5
    Buy,
    /// 1 ≤ 점수 ≤ 4
    HoldBuy,
    /// 점수 0 (또는 데이터 없음)
    Hold,
    /// -2 ≤ 점수 ≤ -1
    HoldSell,
    /// 점수 ≤ -3
    Sell,
}

impl SignalAction {
    /// 원점수에서 시그널을 판단합니다.
    pub fn from_score(score: i32, max_score: u32) -> Self {
        if max_score == 0 {
            return SignalAction::Hold;
        }
        match score {
            s if s <= -3 => SignalAction::Sell,
            s if s >= 5 => SignalAction::Buy,
            s if s >= 1 => SignalAction::HoldBuy,
            s if s <= -1 => SignalAction::HoldSell,
            _ => SignalAction::Hold,
        }
    }
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "buy"),
            SignalAction::HoldBuy => write!(f, "hold/buy"),
            SignalAction::Hold => write!(f, "hold"),
            SignalAction::HoldSell => write!(f, "hold/sell"),
            SignalAction::Sell => write!(f, "sell"),
        }
    }
}

/// 점수 계산 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 가중 합산 점수
    pub score: i32,
    /// 사용 가능한 입력의 가중치 합
    pub max_score: u32,
    /// 누락된 입력 (표 순서)
    pub missing: Vec<IndicatorKind>,
    /// 강도 라벨
    pub strength: SignalStrength,
    /// 시그널
    pub signal: SignalAction,
}

/// 점수 누적기.
#[derive(Default)]
struct Tally {
    score: i32,
    max_score: u32,
    missing: Vec<IndicatorKind>,
}

impl Tally {
    /// 값이 있으면 `rule`의 기여도를 더하고, 없으면 누락으로 기록합니다.
    fn add<T>(&mut self, kind: IndicatorKind, value: Option<T>, rule: impl FnOnce(T) -> i32) {
        match value {
            Some(value) => {
                self.max_score += kind.weight();
                self.score += rule(value);
            }
            None => self.missing.push(kind),
        }
    }

    fn finish(self) -> ScoreResult {
        ScoreResult {
            score: self.score,
            max_score: self.max_score,
            strength: SignalStrength::from_score(self.score, self.max_score),
            signal: SignalAction::from_score(self.score, self.max_score),
            missing: self.missing,
        }
    }
}

/// 부호 규칙: 양수면 `+weight`, 아니면 `-weight`.
fn signed(positive: bool, weight: i32) -> i32 {
    if positive {
        weight
    } else {
        -weight
    }
}

/// 한 타임프레임의 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeAnalysis {
    pub timeframe: Timeframe,
    /// 분석에 쓴 캔들 개수 (조회 실패 시 0)
    pub candle_count: usize,
    pub snapshot: IndicatorSnapshot,
    /// 고래 순유입 (유입 - 유출)
    pub whale_flow: Option<Decimal>,
    /// 롱/숏 비율
    pub long_short: Option<Decimal>,
    pub score: ScoreResult,
    pub remarks: Vec<MarketRemark>,
}

/// 시그널 점수 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalScorer {
    engine: IndicatorEngine,
}

impl SignalScorer {
    /// 새 점수 계산기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 스냅샷과 외부 시그널로 점수를 계산합니다.
    pub fn score(
        &self,
        snapshot: &IndicatorSnapshot,
        whale_flow: Option<Decimal>,
        long_short: Option<Decimal>,
    ) -> ScoreResult {
        let mut tally = Tally::default();

        let emas = snapshot.ema_fast.zip(snapshot.ema_slow);
        tally.add(IndicatorKind::Ema, emas, |(fast, slow)| signed(fast > slow, 2));
        tally.add(IndicatorKind::Macd, snapshot.macd_line, |macd| {
            signed(macd > Decimal::ZERO, 2)
        });
        tally.add(IndicatorKind::Rsi, snapshot.rsi, |rsi| signed(rsi > dec!(50), 1));
        tally.add(IndicatorKind::Mfi, snapshot.mfi, |mfi| signed(mfi > dec!(50), 1));
        // 종가가 0이라 등급을 못 내도 ATR 자체가 있으면 0점으로 집계
        tally.add(IndicatorKind::Atr, snapshot.atr, |_| {
            snapshot.volatility.map_or(0, |tier| tier.score())
        });
        tally.add(IndicatorKind::Obv, snapshot.obv, |obv| signed(obv > Decimal::ZERO, 2));
        tally.add(IndicatorKind::Adx, snapshot.trend_strength, |strength| {
            strength.trend_score() - 1
        });
        tally.add(IndicatorKind::WhaleFlow, whale_flow, |net| match net.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => -1,
            std::cmp::Ordering::Less => 1,
            std::cmp::Ordering::Equal => 0,
        });
        tally.add(IndicatorKind::LongShort, long_short, |ratio| {
            if ratio > LONG_SHORT_BULLISH {
                1
            } else if ratio < LONG_SHORT_BEARISH {
                -1
            } else {
                0
            }
        });

        tally.finish()
    }

    /// 캔들 시계열을 분석합니다. 시계열이 없으면 모든 지표가 누락됩니다.
    pub fn analyze(
        &self,
        timeframe: Timeframe,
        series: Option<&CandleSeries>,
        whale_flow: Option<Decimal>,
        long_short: Option<Decimal>,
    ) -> TimeframeAnalysis {
        let snapshot = series
            .map(|s| IndicatorSnapshot::from_series(&self.engine, s))
            .unwrap_or_default();
        let score = self.score(&snapshot, whale_flow, long_short);

        debug!(
            timeframe = %timeframe,
            score = score.score,
            max_score = score.max_score,
            missing = score.missing.len(),
            "타임프레임 점수 계산 완료"
        );

        TimeframeAnalysis {
            timeframe,
            candle_count: series.map_or(0, CandleSeries::len),
            remarks: snapshot.remarks(),
            snapshot,
            whale_flow,
            long_short,
            score,
        }
    }
}
