//! 고래 알림 원문 파서.
//!
//! 알림 형식: `<수량> <#?티커> ... (<USD 금액> USD) ... from <출금> to <입금>`
//!
//! 입금 라벨은 마침표, 줄바꿈 또는 본문 끝에서 끝납니다.
//! 형식에 맞지 않는 알림은 조용히 버립니다.

use chrono::{DateTime, Utc};
use coinpulse_core::{parse_grouped_decimal, RawAlert, TransferEvent};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::TransferClassifier;

static ALERT_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"([0-9,]+)\s#?([A-Za-z0-9]+)[^\n]*\(([0-9,]+)\s*USD\).*from (.+?) to (.+?)(?:\.|$|\n)",
    )
    .ok()
});

/// 알림 원문을 분류된 전송 이벤트로 변환합니다.
#[derive(Debug, Clone, Default)]
pub struct TransferParser {
    classifier: TransferClassifier,
}

impl TransferParser {
    pub fn new(classifier: TransferClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &TransferClassifier {
        &self.classifier
    }

    /// 알림 한 건을 파싱합니다. 형식이 맞지 않으면 `None`.
    pub fn parse(&self, text: &str, timestamp: DateTime<Utc>) -> Option<TransferEvent> {
        let Some(caps) = ALERT_PATTERN.as_ref().and_then(|re| re.captures(text)) else {
            trace!(text, "고래 알림 형식 불일치, 무시");
            return None;
        };

        let amount = parse_grouped_decimal(&caps[1]);
        let usd_value = parse_grouped_decimal(&caps[3]);
        let (Some(amount), Some(usd_value)) = (amount, usd_value) else {
            trace!(text, "고래 알림 수치 파싱 실패, 무시");
            return None;
        };

        let source_label = caps[4].to_lowercase();
        let dest_label = caps[5].to_lowercase();
        let direction = self.classifier.classify(&source_label, &dest_label);

        Some(TransferEvent {
            amount,
            coin: caps[2].to_uppercase(),
            usd_value,
            source_label,
            dest_label,
            timestamp,
            direction,
        })
    }

    /// 알림 목록을 파싱하고 형식이 맞는 것만 반환합니다.
    pub fn parse_all(&self, alerts: &[RawAlert]) -> Vec<TransferEvent> {
        alerts
            .iter()
            .filter_map(|alert| self.parse(&alert.text, alert.timestamp))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use coinpulse_core::TransferDirection;
    use rust_decimal_macros::dec;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_pattern_compiles() {
        assert!(ALERT_PATTERN.is_some());
    }

    #[test]
    fn test_parse_outflow_alert() {
        let parser = TransferParser::default();
        let event = parser
            .parse(
                "1,234 #BTC (56,000,000 USD) transferred from binance to unknown wallet",
                ts(),
            )
            .unwrap();

        assert_eq!(event.amount, dec!(1234));
        assert_eq!(event.coin, "BTC");
        assert_eq!(event.usd_value, dec!(56000000));
        assert_eq!(event.source_label, "binance");
        assert_eq!(event.dest_label, "unknown wallet");
        assert_eq!(event.direction, TransferDirection::OutOfExchange);
        assert_eq!(event.timestamp, ts());
    }

    #[test]
    fn test_parse_inflow_with_trailing_text() {
        let parser = TransferParser::default();
        let text = "🚨 🚨 25,000,000 #usdt (25,012,345 USD) transferred from unknown wallet to #Coinbase.\n\nDetails: https://whale-alert.io/tx";
        let event = parser.parse(text, ts()).unwrap();

        assert_eq!(event.amount, dec!(25000000));
        assert_eq!(event.coin, "USDT");
        assert_eq!(event.usd_value, dec!(25012345));
        assert_eq!(event.dest_label, "#coinbase");
        assert_eq!(event.direction, TransferDirection::IntoExchange);
    }

    #[test]
    fn test_parse_exchange_to_exchange() {
        let parser = TransferParser::default();
        let event = parser
            .parse(
                "500 ETH (1,500,000 USD) transferred from Kraken to OKX",
                ts(),
            )
            .unwrap();
        assert_eq!(event.direction, TransferDirection::ExchangeToExchange);
        assert_eq!(event.dest_label, "okx");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let parser = TransferParser::default();
        assert!(parser.parse("", ts()).is_none());
        assert!(parser.parse("BTC price is up today", ts()).is_none());
        assert!(parser
            .parse("1,000 BTC transferred from binance to unknown wallet", ts())
            .is_none());
    }

    #[test]
    fn test_parse_all_filters() {
        let parser = TransferParser::default();
        let alerts = vec![
            RawAlert {
                timestamp: ts(),
                text: "10 #SOL (1,500 USD) transferred from unknown wallet to bybit".to_string(),
            },
            RawAlert {
                timestamp: ts(),
                text: "hello".to_string(),
            },
        ];

        let events = parser.parse_all(&alerts);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].coin, "SOL");
    }
}
