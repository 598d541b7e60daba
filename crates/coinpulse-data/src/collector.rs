//! 리포트 한 주기 입력 수집기.
//!
//! 타임프레임별 캔들과 롱/숏 비율, 알림, 코인별 시장 통계를 병렬로 조회해
//! [`CycleInputs`]로 묶습니다. 한 항목의 실패는 다른 항목을 막지 않으며,
//! 실패한 항목은 `None`으로 남고 [`FetchFailure`] 목록에 기록됩니다.

use chrono::{DateTime, Utc};
use coinpulse_core::{AppConfig, CandleSeries, CoinMarketStats, CycleInputs, Timeframe};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::error::FetchFailure;
use crate::provider::{AlertSource, CandleProvider, MarketStatsProvider};
use crate::retry::{retry_fetch, RetryPolicy};

/// 한 번에 읽어오는 기본 알림 수.
pub const DEFAULT_ALERT_LIMIT: usize = 150;

/// 수집 결과.
#[derive(Debug, Clone)]
pub struct CollectedCycle {
    pub inputs: CycleInputs,
    /// 재시도를 소진한 조회 목록
    pub failures: Vec<FetchFailure>,
}

impl CollectedCycle {
    /// 모든 조회가 성공했는지.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 주기 입력 수집기.
#[derive(Clone)]
pub struct CycleCollector {
    candles: Arc<dyn CandleProvider>,
    alerts: Arc<dyn AlertSource>,
    market: Arc<dyn MarketStatsProvider>,
    policy: RetryPolicy,
    symbol: String,
    candle_limit: usize,
    alert_limit: usize,
    /// 티커 → 외부 ID
    coin_ids: BTreeMap<String, String>,
}

impl CycleCollector {
    /// 설정에서 수집기를 생성합니다.
    pub fn new(
        config: &AppConfig,
        candles: Arc<dyn CandleProvider>,
        alerts: Arc<dyn AlertSource>,
        market: Arc<dyn MarketStatsProvider>,
    ) -> Self {
        Self {
            candles,
            alerts,
            market,
            policy: RetryPolicy::from(&config.retry),
            symbol: config.candles.symbol.clone(),
            candle_limit: config.candles.limit,
            alert_limit: DEFAULT_ALERT_LIMIT,
            coin_ids: config.coins.ids.clone(),
        }
    }

    /// 재시도 정책을 교체합니다.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 알림 조회 개수를 설정합니다.
    pub fn with_alert_limit(mut self, limit: usize) -> Self {
        self.alert_limit = limit;
        self
    }

    /// `now` 기준으로 한 주기의 입력을 수집합니다.
    pub async fn collect(&self, now: DateTime<Utc>) -> CollectedCycle {
        let mut inputs = CycleInputs::new(now, self.symbol.clone());
        let mut failures = Vec::new();

        let (candles, long_short, alerts, market) = futures::join!(
            self.collect_candles(),
            self.collect_long_short(),
            retry_fetch(self.policy, "alerts", || {
                self.alerts.fetch_alerts(self.alert_limit)
            }),
            self.collect_market(),
        );

        for (timeframe, result) in candles {
            inputs.candles.insert(timeframe, keep(result, &mut failures));
        }
        for (timeframe, result) in long_short {
            inputs.long_short.insert(timeframe, keep(result, &mut failures));
        }
        inputs.alerts = keep(alerts, &mut failures).unwrap_or_default();
        for (ticker, volume, price) in market {
            let stats = CoinMarketStats {
                daily_volume_usd: keep(volume, &mut failures),
                price_usd: keep(price, &mut failures),
            };
            inputs.market.insert(ticker, stats);
        }

        info!(
            symbol = %self.symbol,
            timeframes = inputs.candles.values().filter(|c| c.is_some()).count(),
            alerts = inputs.alerts.len(),
            failures = failures.len(),
            "주기 입력 수집 완료"
        );

        CollectedCycle { inputs, failures }
    }

    async fn collect_candles(
        &self,
    ) -> Vec<(Timeframe, Result<CandleSeries, FetchFailure>)> {
        let futures = Timeframe::REPORT.iter().map(|&timeframe| async move {
            let label = format!("candles {} {}", self.symbol, timeframe);
            let result = retry_fetch(self.policy, &label, || {
                self.candles
                    .fetch_candles(&self.symbol, timeframe, self.candle_limit)
            })
            .await;
            (timeframe, result)
        });
        join_all(futures).await
    }

    async fn collect_long_short(
        &self,
    ) -> Vec<(Timeframe, Result<Decimal, FetchFailure>)> {
        let futures = Timeframe::REPORT.iter().map(|&timeframe| async move {
            let label = format!("long/short {} {}", self.symbol, timeframe);
            let result = retry_fetch(self.policy, &label, || {
                self.market.long_short_ratio(&self.symbol, timeframe)
            })
            .await;
            (timeframe, result)
        });
        join_all(futures).await
    }

    #[allow(clippy::type_complexity)]
    async fn collect_market(
        &self,
    ) -> Vec<(
        String,
        Result<Decimal, FetchFailure>,
        Result<Decimal, FetchFailure>,
    )> {
        let futures = self.coin_ids.iter().map(|(ticker, id)| async move {
            let volume = retry_fetch(self.policy, &format!("daily volume {}", id), || {
                self.market.daily_volume_usd(id)
            })
            .await;
            let price = retry_fetch(self.policy, &format!("price {}", id), || {
                self.market.price_usd(id)
            })
            .await;
            (ticker.clone(), volume, price)
        });
        join_all(futures).await
    }
}

/// 성공 값은 돌려주고 실패는 목록에 쌓습니다.
fn keep<T>(result: Result<T, FetchFailure>, failures: &mut Vec<FetchFailure>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(failure) => {
            failures.push(failure);
            None
        }
    }
}
