//! 분석 대상 캔들 타임프레임 정의.
//!
//! 리포트 한 주기는 5분봉부터 일봉까지 여섯 개의 타임프레임을 분석합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 캔들스틱 타임프레임.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// 5분봉
    M5,
    /// 15분봉
    M15,
    /// 30분봉
    M30,
    /// 1시간봉
    H1,
    /// 4시간봉
    H4,
    /// 일봉
    D1,
}

impl Timeframe {
    /// 리포트에서 분석하는 전체 타임프레임 (짧은 순).
    pub const REPORT: [Timeframe; 6] = [
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    /// 이 타임프레임의 분 단위 값을 반환합니다.
    pub fn as_minutes(&self) -> u64 {
        match self {
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1440,
        }
    }

    /// 단기 타임프레임(5분/15분/30분)인지 확인합니다.
    pub fn is_short_term(&self) -> bool {
        matches!(self, Timeframe::M5 | Timeframe::M15 | Timeframe::M30)
    }

    /// 바이낸스 간격 문자열로 변환합니다.
    pub fn to_binance_interval(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }

    /// 바이낸스 간격 문자열에서 파싱합니다.
    pub fn from_binance_interval(s: &str) -> Option<Self> {
        Self::REPORT
            .iter()
            .copied()
            .find(|tf| tf.to_binance_interval() == s)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_binance_interval())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_binance_interval(s).ok_or_else(|| format!("Invalid timeframe: {}", s))
    }
}
