//! 후행 윈도우별 고래 흐름 집계.
//!
//! 코인과 윈도우의 모든 조합에 대해 이벤트를 처음부터 다시 훑습니다.
//! 윈도우가 서로 겹치므로 한 이벤트는 여러 윈도우에 함께 집계됩니다.

use chrono::{DateTime, Utc};
use coinpulse_core::{AppConfig, ExchangeTransfer, TimeWindow, TransferDirection, TransferEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 순흐름 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowSide {
    /// 거래소 순유입 (매도 압력)
    Inflow,
    /// 거래소 순유출 (매수 압력)
    Outflow,
}

impl fmt::Display for FlowSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowSide::Inflow => write!(f, "inflow"),
            FlowSide::Outflow => write!(f, "outflow"),
        }
    }
}

/// 코인 하나, 윈도우 하나의 흐름 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub window: TimeWindow,
    /// 거래소 유입 수량
    pub inflow_amount: Decimal,
    /// 거래소 유출 수량
    pub outflow_amount: Decimal,
    pub inflow_usd: Decimal,
    pub outflow_usd: Decimal,
    pub inflow_count: u32,
    pub outflow_count: u32,
    /// 거래소 간 이동 상세
    pub exchange_transfers: Vec<ExchangeTransfer>,
}

impl WindowSummary {
    /// 0으로 채운 요약.
    pub fn empty(window: TimeWindow) -> Self {
        Self {
            window,
            inflow_amount: Decimal::ZERO,
            outflow_amount: Decimal::ZERO,
            inflow_usd: Decimal::ZERO,
            outflow_usd: Decimal::ZERO,
            inflow_count: 0,
            outflow_count: 0,
            exchange_transfers: Vec::new(),
        }
    }

    fn add_inflow(&mut self, event: &TransferEvent) {
        self.inflow_amount += event.amount;
        self.inflow_usd += event.usd_value;
        self.inflow_count += 1;
    }

    fn add_outflow(&mut self, event: &TransferEvent) {
        self.outflow_amount += event.amount;
        self.outflow_usd += event.usd_value;
        self.outflow_count += 1;
    }

    /// 이벤트 하나를 방향에 따라 반영합니다.
    ///
    /// 거래소 간 이동은 유입과 유출 양쪽에 같은 금액으로 더해지고 상세 목록에 남습니다.
    pub fn record(&mut self, event: &TransferEvent) {
        match event.direction {
            TransferDirection::IntoExchange => self.add_inflow(event),
            TransferDirection::OutOfExchange => self.add_outflow(event),
            TransferDirection::ExchangeToExchange => {
                self.add_inflow(event);
                self.add_outflow(event);
                self.exchange_transfers.push(event.to_exchange_transfer());
            }
            TransferDirection::Other => {}
        }
    }

    /// 순유입 수량 (유입 - 유출).
    pub fn net_amount(&self) -> Decimal {
        self.inflow_amount - self.outflow_amount
    }

    /// 순유입 USD (유입 - 유출).
    pub fn net_usd(&self) -> Decimal {
        self.inflow_usd - self.outflow_usd
    }

    /// 순수량 기준 방향. 0이면 `None`.
    pub fn pressure_side(&self) -> Option<FlowSide> {
        let net = self.net_amount();
        if net > Decimal::ZERO {
            Some(FlowSide::Inflow)
        } else if net < Decimal::ZERO {
            Some(FlowSide::Outflow)
        } else {
            None
        }
    }

    /// 집계된 이벤트가 하나라도 있는지.
    pub fn has_activity(&self) -> bool {
        self.inflow_count > 0 || self.outflow_count > 0
    }
}

/// 코인 하나의 윈도우별 요약 (카탈로그 순서).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinFlows {
    pub coin: String,
    pub windows: Vec<WindowSummary>,
}

impl CoinFlows {
    /// 분 단위 길이로 윈도우 요약을 찾습니다.
    pub fn window(&self, minutes: i64) -> Option<&WindowSummary> {
        self.windows.iter().find(|w| w.window.minutes == minutes)
    }

    /// 가장 긴 윈도우의 요약.
    pub fn longest(&self) -> Option<&WindowSummary> {
        self.windows.iter().max_by_key(|w| w.window.minutes)
    }
}

/// 코인 × 윈도우 집계기.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    windows: Vec<TimeWindow>,
    coins: Vec<String>,
}

impl WindowAggregator {
    /// 윈도우 카탈로그와 추적 코인 목록으로 생성합니다.
    pub fn new(windows: Vec<TimeWindow>, coins: Vec<String>) -> Self {
        Self { windows, coins }
    }

    /// 설정에서 생성합니다.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.windows.catalog(), config.coins.tickers())
    }

    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    pub fn coins(&self) -> &[String] {
        &self.coins
    }

    /// 추적 코인마다 모든 윈도우의 요약을 만듭니다.
    ///
    /// 이벤트가 없는 코인도 모든 윈도우에 0 요약을 가집니다.
    pub fn aggregate(&self, events: &[TransferEvent], now: DateTime<Utc>) -> Vec<CoinFlows> {
        self.coins
            .iter()
            .map(|coin| CoinFlows {
                coin: coin.clone(),
                windows: self
                    .windows
                    .iter()
                    .map(|window| Self::summarize(coin, window, events, now))
                    .collect(),
            })
            .collect()
    }

    /// `[now - duration, now)` 구간에 속한 코인 이벤트를 요약합니다.
    pub fn summarize(
        coin: &str,
        window: &TimeWindow,
        events: &[TransferEvent],
        now: DateTime<Utc>,
    ) -> WindowSummary {
        let mut summary = WindowSummary::empty(window.clone());
        for event in events
            .iter()
            .filter(|e| e.coin == coin && window.contains(e.timestamp, now))
        {
            summary.record(event);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn event(
        coin: &str,
        amount: Decimal,
        direction: TransferDirection,
        minutes_ago: i64,
    ) -> TransferEvent {
        TransferEvent {
            amount,
            coin: coin.to_string(),
            usd_value: amount * dec!(100),
            source_label: "a".to_string(),
            dest_label: "b".to_string(),
            timestamp: now() - Duration::minutes(minutes_ago),
            direction,
        }
    }

    fn aggregator() -> WindowAggregator {
        WindowAggregator::new(
            TimeWindow::default_catalog(),
            vec!["BTC".to_string(), "ETH".to_string()],
        )
    }

    #[test]
    fn test_overlapping_windows() {
        let events = vec![
            event("BTC", dec!(10), TransferDirection::IntoExchange, 3),
            event("BTC", dec!(4), TransferDirection::OutOfExchange, 45),
            event("BTC", dec!(99), TransferDirection::Other, 1),
        ];

        let flows = aggregator().aggregate(&events, now());
        let btc = &flows[0];
        assert_eq!(btc.coin, "BTC");
        assert_eq!(btc.windows.len(), 6);

        let last_5m = btc.window(5).unwrap();
        assert_eq!(last_5m.inflow_amount, dec!(10));
        assert_eq!(last_5m.outflow_count, 0);
        assert_eq!(last_5m.pressure_side(), Some(FlowSide::Inflow));

        let last_1h = btc.window(60).unwrap();
        assert_eq!(last_1h.inflow_amount, dec!(10));
        assert_eq!(last_1h.outflow_amount, dec!(4));
        assert_eq!(last_1h.net_amount(), dec!(6));
        assert_eq!(last_1h.net_usd(), dec!(600));

        assert_eq!(btc.longest().unwrap().window.minutes, 1440);
    }

    #[test]
    fn test_untracked_coins_get_zero_summaries() {
        let events = vec![event("BTC", dec!(1), TransferDirection::IntoExchange, 1)];
        let flows = aggregator().aggregate(&events, now());

        let eth = &flows[1];
        assert_eq!(eth.coin, "ETH");
        assert_eq!(eth.windows.len(), 6);
        assert!(eth.windows.iter().all(|w| !w.has_activity()));
        assert!(eth.windows.iter().all(|w| w.pressure_side().is_none()));
    }

    #[test]
    fn test_exchange_to_exchange_counts_both_sides() {
        let events = vec![event(
            "BTC",
            dec!(7),
            TransferDirection::ExchangeToExchange,
            2,
        )];
        let flows = aggregator().aggregate(&events, now());
        let summary = flows[0].window(5).unwrap();

        assert_eq!(summary.inflow_count, 1);
        assert_eq!(summary.outflow_count, 1);
        assert_eq!(summary.inflow_amount, dec!(7));
        assert_eq!(summary.outflow_amount, dec!(7));
        assert_eq!(summary.inflow_usd, summary.outflow_usd);
        assert_eq!(summary.exchange_transfers.len(), 1);
        assert_eq!(summary.net_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_window_boundaries() {
        let window = TimeWindow::from_minutes(5);
        let at_start = event("BTC", dec!(1), TransferDirection::IntoExchange, 5);
        let mut just_inside = at_start.clone();
        just_inside.timestamp += Duration::seconds(1);
        let mut at_now = at_start.clone();
        at_now.timestamp = now();

        let summary =
            WindowAggregator::summarize("BTC", &window, &[at_start, just_inside, at_now], now());
        // 구간은 [now - 5m, now): 시작 시각 포함, now 제외
        assert_eq!(summary.inflow_count, 2);
    }
}
