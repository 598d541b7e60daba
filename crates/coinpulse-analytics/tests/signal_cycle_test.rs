//! 리포트 한 주기 통합 테스트
//!
//! 여섯 타임프레임의 캔들, 고래 알림, 롱/숏 비율을 넣고
//! 타임프레임 점수부터 최종 권고까지 전체 흐름을 검증합니다.

use chrono::{DateTime, Duration, TimeZone, Utc};
use coinpulse_analytics::{
    IndicatorKind, PressureLevel, Rationale, ReportBuilder, SignalAction, SignalStrength, Verdict,
};
use coinpulse_core::{
    AppConfig, Candle, CandleSeries, CoinMarketStats, CycleInputs, RawAlert, Timeframe,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// 테스트 헬퍼 함수
// ============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

/// 일정한 기울기로 움직이는 캔들 시계열 (고가/저가는 종가 ±1)
fn linear_series(timeframe: Timeframe, start: Decimal, step: Decimal, len: usize) -> CandleSeries {
    let minutes = timeframe.as_minutes() as i64;
    let first = now() - Duration::minutes(minutes * len as i64);
    let candles = (0..len)
        .map(|i| {
            let close = start + step * Decimal::from(i);
            Candle::new(
                first + Duration::minutes(minutes * i as i64),
                close - step,
                close + dec!(1),
                close - dec!(1),
                close,
                dec!(10),
            )
        })
        .collect();
    CandleSeries::new("BTCUSDT", timeframe, candles).unwrap()
}

fn whale_alert(minutes_ago: i64, text: &str) -> RawAlert {
    RawAlert {
        timestamp: now() - Duration::minutes(minutes_ago),
        text: text.to_string(),
    }
}

fn inputs_with_trend(step: Decimal, start: Decimal, alert: &str, long_short: Decimal) -> CycleInputs {
    let mut inputs = CycleInputs::new(now(), "BTCUSDT");
    for timeframe in Timeframe::REPORT {
        inputs
            .candles
            .insert(timeframe, Some(linear_series(timeframe, start, step, 200)));
        inputs.long_short.insert(timeframe, Some(long_short));
    }
    inputs.alerts = vec![whale_alert(1, alert)];
    inputs.market.insert(
        "BTC".to_string(),
        CoinMarketStats {
            daily_volume_usd: Some(dec!(20000000000)),
            price_usd: Some(dec!(65000)),
        },
    );
    inputs
}

fn bullish_inputs() -> CycleInputs {
    inputs_with_trend(
        dec!(1),
        dec!(100),
        "500 #BTC (32,500,000 USD) transferred from binance to unknown wallet",
        dec!(1.2),
    )
}

fn bearish_inputs() -> CycleInputs {
    inputs_with_trend(
        dec!(-1),
        dec!(500),
        "500 #BTC (32,500,000 USD) transferred from unknown wallet to binance",
        dec!(0.8),
    )
}

fn builder(use_short_term_scores: bool) -> ReportBuilder {
    let mut config = AppConfig::default();
    config.decision.use_short_term_scores = use_short_term_scores;
    ReportBuilder::from_config(&config)
}

// ============================================================================
// 타임프레임 점수 테스트
// ============================================================================

#[test]
fn test_bullish_hourly_scores_full_marks() {
    let report = builder(false).build(&bullish_inputs());

    let h1 = report.analysis(Timeframe::H1).unwrap();
    assert_eq!(h1.candle_count, 200);
    assert!(h1.score.missing.is_empty());
    assert_eq!(h1.score.score, 12);
    assert_eq!(h1.score.max_score, 12);
    assert_eq!(h1.score.strength, SignalStrength::VeryStrong);
    assert_eq!(h1.score.signal, SignalAction::Buy);
    assert_eq!(h1.snapshot.rsi, Some(dec!(100)));
}

#[test]
fn test_five_minute_volatility_uses_short_tiers() {
    let report = builder(false).build(&bullish_inputs());

    // 5분봉은 ATR/종가가 1% 미만이면 "매우 낮음"으로 감점
    let m5 = report.analysis(Timeframe::M5).unwrap();
    assert_eq!(m5.score.score, 10);
    assert_eq!(m5.score.max_score, 12);
}

#[test]
fn test_missing_candles_only_score_external_signals() {
    let mut inputs = bullish_inputs();
    inputs.candles.insert(Timeframe::D1, None);

    let report = builder(false).build(&inputs);
    let d1 = report.analysis(Timeframe::D1).unwrap();

    assert_eq!(d1.candle_count, 0);
    assert_eq!(d1.score.max_score, 2);
    assert_eq!(d1.score.score, 2);
    assert_eq!(d1.score.missing.len(), 7);
    assert!(!d1.score.missing.contains(&IndicatorKind::WhaleFlow));
}

// ============================================================================
// 최종 권고 테스트
// ============================================================================

#[test]
fn test_bullish_cycle_buys_with_short_term_scores() {
    let report = builder(true).build(&bullish_inputs());

    assert_eq!(report.decision.verdict, Verdict::Buy);
    assert_eq!(report.decision.rationale, Rationale::AllTimeframesPositive);
    assert_eq!(report.decision.scores.m5, 10);
}

#[test]
fn test_bullish_cycle_holds_with_default_wiring() {
    // 기본 설정에서는 단기 점수가 0이라 매수 조건의 단기 확인을 통과하지 못함
    let report = builder(false).build(&bullish_inputs());

    assert_eq!(report.decision.scores.m5, 0);
    assert_eq!(report.decision.scores.m15, 0);
    assert_eq!(report.decision.verdict, Verdict::Hold);
    assert_eq!(report.decision.rationale, Rationale::Indecisive);
}

#[test]
fn test_bearish_cycle_sells() {
    let report = builder(true).build(&bearish_inputs());

    let h4 = report.analysis(Timeframe::H4).unwrap();
    assert_eq!(h4.score.score, -8);
    assert_eq!(h4.score.signal, SignalAction::Sell);

    assert_eq!(report.decision.verdict, Verdict::Sell);
    assert_eq!(report.decision.rationale, Rationale::ShortAndMidNegative);
}

// ============================================================================
// 고래 흐름 및 직렬화 테스트
// ============================================================================

#[test]
fn test_flow_reports_cover_every_tracked_coin() {
    let report = builder(false).build(&bullish_inputs());

    assert_eq!(report.flows.len(), 6);
    let btc = report.flow("BTC").unwrap();
    assert!(btc.windows.iter().all(|w| w.summary.outflow_count == 1));
    // 500 × 65,000 / 20,000,000,000 = 0.1625%
    assert_eq!(btc.headline.level, PressureLevel::LightBuying);
    assert_eq!(btc.headline.ratio_pct, Some(dec!(0.1625)));

    let doge = report.flow("DOGE").unwrap();
    assert!(doge.windows.iter().all(|w| w.summary.inflow_count == 0));
}

#[test]
fn test_report_serializes_to_json() {
    let report = builder(true).build(&bullish_inputs());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["decision"]["verdict"], "buy");
    assert_eq!(json["decision"]["rationale"], "all_timeframes_positive");
    assert_eq!(json["timeframes"].as_array().unwrap().len(), 6);
    assert_eq!(json["events_parsed"], 1);
}
