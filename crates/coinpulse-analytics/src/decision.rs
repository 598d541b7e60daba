//! 타임프레임 점수를 하나의 최종 권고로 합치는 결정 규칙.
//!
//! 규칙은 위에서부터 순서대로 평가하며 처음 일치한 규칙이 적용됩니다.
//!
//! 1. 매수: `1h ≥ 4 ∧ 4h ≥ 2 ∧ 1d ≥ 2 ∧ (5m ≥ 1 ∨ 15m ≥ 1)`
//! 2. 매도: `1h ≤ -2 ∧ 4h ≤ -1 ∧ 1d ≤ 0 ∧ (5m ≤ -1 ∨ 15m ≤ -1)`
//! 3. 보유: `1d ≥ 2 ∧ (1h < 2 ∨ 4h < 1)`
//! 4. 보유 (관망)

use coinpulse_core::Timeframe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::indicators::TrendDirection;

/// 타임프레임별 원점수.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeScores {
    pub m5: i32,
    pub m15: i32,
    pub m30: i32,
    pub h1: i32,
    pub h4: i32,
    pub d1: i32,
}

impl TimeframeScores {
    /// 타임프레임의 점수를 설정합니다.
    pub fn set(&mut self, timeframe: Timeframe, score: i32) {
        match timeframe {
            Timeframe::M5 => self.m5 = score,
            Timeframe::M15 => self.m15 = score,
            Timeframe::M30 => self.m30 = score,
            Timeframe::H1 => self.h1 = score,
            Timeframe::H4 => self.h4 = score,
            Timeframe::D1 => self.d1 = score,
        }
    }

    /// 타임프레임의 점수.
    pub fn get(&self, timeframe: Timeframe) -> i32 {
        match timeframe {
            Timeframe::M5 => self.m5,
            Timeframe::M15 => self.m15,
            Timeframe::M30 => self.m30,
            Timeframe::H1 => self.h1,
            Timeframe::H4 => self.h4,
            Timeframe::D1 => self.d1,
        }
    }
}

/// 최종 권고.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Buy => write!(f, "buy"),
            Verdict::Sell => write!(f, "sell"),
            Verdict::Hold => write!(f, "hold"),
        }
    }
}

/// 권고 근거 (적용된 규칙).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rationale {
    /// 모든 타임프레임에서 지표가 양호하고 상승 추세가 강함
    AllTimeframesPositive,
    /// 단기와 중기 지표가 음수, 하락 추세
    ShortAndMidNegative,
    /// 장기는 양호하나 단기/중기가 약함
    LongTermPositiveShortMidWeak,
    /// 단기와 장기 사이 방향이 엇갈림
    Indecisive,
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rationale::AllTimeframesPositive => {
                "indicators positive on every timeframe, strong uptrend"
            }
            Rationale::ShortAndMidNegative => "short and mid-term indicators negative, downtrend",
            Rationale::LongTermPositiveShortMidWeak => {
                "long-term positive but short/mid-term weak, keep watching"
            }
            Rationale::Indecisive => "short and long-term signals disagree, no rush",
        };
        write!(f, "{}", text)
    }
}

/// 최종 결정.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub rationale: Rationale,
    /// 결정에 사용한 점수
    pub scores: TimeframeScores,
    /// 참고용 추세 방향 (규칙에는 쓰이지 않음)
    pub trends: BTreeMap<Timeframe, Option<TrendDirection>>,
}

/// 결정 규칙 평가기.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecisionAggregator;

impl DecisionAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 점수표에 규칙을 적용합니다.
    pub fn decide(
        &self,
        scores: TimeframeScores,
        trends: BTreeMap<Timeframe, Option<TrendDirection>>,
    ) -> Decision {
        let s = scores;
        let (verdict, rationale) =
            if s.h1 >= 4 && s.h4 >= 2 && s.d1 >= 2 && (s.m5 >= 1 || s.m15 >= 1) {
                (Verdict::Buy, Rationale::AllTimeframesPositive)
            } else if s.h1 <= -2 && s.h4 <= -1 && s.d1 <= 0 && (s.m5 <= -1 || s.m15 <= -1) {
                (Verdict::Sell, Rationale::ShortAndMidNegative)
            } else if s.d1 >= 2 && (s.h1 < 2 || s.h4 < 1) {
                (Verdict::Hold, Rationale::LongTermPositiveShortMidWeak)
            } else {
                (Verdict::Hold, Rationale::Indecisive)
            };

        Decision {
            verdict,
            rationale,
            scores,
            trends,
        }
    }
}
