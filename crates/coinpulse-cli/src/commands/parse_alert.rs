//! 고래 알림 한 건 파싱.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use coinpulse_analytics::{ExchangeCatalog, TransferClassifier, TransferParser};
use coinpulse_core::{AppConfig, TransferEvent};

/// 알림 본문을 설정의 거래소 카탈로그로 파싱합니다.
pub fn parse_alert(config: &AppConfig, text: &str, timestamp: DateTime<Utc>) -> Result<TransferEvent> {
    let classifier = TransferClassifier::new(ExchangeCatalog::from_config(&config.exchanges));
    TransferParser::new(classifier)
        .parse(text, timestamp)
        .ok_or_else(|| anyhow!("Not a whale transfer alert: {}", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinpulse_core::TransferDirection;

    #[test]
    fn test_parse_alert_with_default_catalog() {
        let event = parse_alert(
            &AppConfig::default(),
            "1,234 #BTC (56,000,000 USD) transferred from binance to unknown wallet",
            Utc::now(),
        )
        .unwrap();
        assert_eq!(event.coin, "BTC");
        assert_eq!(event.direction, TransferDirection::OutOfExchange);
    }

    #[test]
    fn test_custom_catalog_changes_direction() {
        let mut config = AppConfig::default();
        config.exchanges.names = vec!["bitstamp".to_string()];

        let event = parse_alert(
            &config,
            "10 #ETH (30,000 USD) transferred from unknown wallet to Bitstamp",
            Utc::now(),
        )
        .unwrap();
        assert_eq!(event.direction, TransferDirection::IntoExchange);

        let event = parse_alert(
            &config,
            "10 #ETH (30,000 USD) transferred from unknown wallet to binance",
            Utc::now(),
        )
        .unwrap();
        assert_eq!(event.direction, TransferDirection::Other);
    }

    #[test]
    fn test_rejects_other_text() {
        assert!(parse_alert(&AppConfig::default(), "gm", Utc::now()).is_err());
    }
}
