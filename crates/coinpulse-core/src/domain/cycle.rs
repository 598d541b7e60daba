//! 리포트 한 주기의 입력 묶음.
//!
//! 데이터 계층이 외부 소스에서 수집해 채우고, 분석 계층이 그대로 소비합니다.
//! 수집에 실패한 항목은 `None`으로 남아 누락 데이터로 흘러갑니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CandleSeries;
use crate::types::Timeframe;

/// 알림 피드에서 받은 원문 메시지.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAlert {
    /// 메시지 수신 시각
    pub timestamp: DateTime<Utc>,
    /// 메시지 본문
    pub text: String,
}

/// 코인별 일간 시장 통계 (조회 실패 시 `None`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinMarketStats {
    /// 24시간 거래대금 (USD)
    pub daily_volume_usd: Option<Decimal>,
    /// 현재가 (USD)
    pub price_usd: Option<Decimal>,
}

/// 리포트 한 주기의 입력.
#[derive(Debug, Clone)]
pub struct CycleInputs {
    /// 리포트 기준 시각 (윈도우 앵커)
    pub now: DateTime<Utc>,
    /// 분석 심볼 (예: BTCUSDT)
    pub symbol: String,
    /// 타임프레임별 캔들 (조회 실패 시 `None`)
    pub candles: BTreeMap<Timeframe, Option<CandleSeries>>,
    /// 타임프레임별 롱/숏 비율
    pub long_short: BTreeMap<Timeframe, Option<Decimal>>,
    /// 알림 원문 목록
    pub alerts: Vec<RawAlert>,
    /// 코인 티커별 시장 통계
    pub market: BTreeMap<String, CoinMarketStats>,
}

impl CycleInputs {
    /// 빈 입력을 생성합니다.
    pub fn new(now: DateTime<Utc>, symbol: impl Into<String>) -> Self {
        Self {
            now,
            symbol: symbol.into(),
            candles: BTreeMap::new(),
            long_short: BTreeMap::new(),
            alerts: Vec::new(),
            market: BTreeMap::new(),
        }
    }

    /// 해당 타임프레임의 캔들.
    pub fn candles_for(&self, timeframe: Timeframe) -> Option<&CandleSeries> {
        self.candles.get(&timeframe).and_then(Option::as_ref)
    }

    /// 해당 타임프레임의 롱/숏 비율.
    pub fn long_short_for(&self, timeframe: Timeframe) -> Option<Decimal> {
        self.long_short.get(&timeframe).copied().flatten()
    }
}
