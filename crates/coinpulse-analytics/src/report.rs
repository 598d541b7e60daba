//! 리포트 한 주기 조립.
//!
//! 수집된 [`CycleInputs`]를 받아 타임프레임 분석, 코인별 고래 흐름, 최종 결정을 묶은
//! [`SignalReport`]를 만듭니다. 문자열 포맷팅은 하지 않습니다.

use chrono::{DateTime, Utc};
use coinpulse_core::{AppConfig, CoinMarketStats, CycleInputs, Timeframe};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::decision::{Decision, DecisionAggregator, TimeframeScores};
use crate::scorer::{SignalScorer, TimeframeAnalysis};
use crate::whale::{
    CoinFlows, ExchangeCatalog, FlowAssessment, FlowPressure, TransferClassifier, TransferParser,
    WindowAggregator, WindowSummary,
};

/// 윈도우 하나의 요약과 압력 평가.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFlowReport {
    pub summary: WindowSummary,
    pub assessment: FlowAssessment,
}

/// 코인 하나의 고래 흐름 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinFlowReport {
    pub coin: String,
    pub market: CoinMarketStats,
    /// 가장 긴 윈도우 기준 대표 평가
    pub headline: FlowAssessment,
    pub windows: Vec<WindowFlowReport>,
}

/// 한 주기의 최종 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub generated_at: DateTime<Utc>,
    pub symbol: String,
    /// 상세 분석 코인
    pub primary_coin: String,
    /// 수신한 알림 수
    pub alerts_received: usize,
    /// 형식에 맞아 파싱된 이벤트 수
    pub events_parsed: usize,
    /// 짧은 타임프레임부터 정렬된 분석
    pub timeframes: Vec<TimeframeAnalysis>,
    pub flows: Vec<CoinFlowReport>,
    pub decision: Decision,
}

impl SignalReport {
    /// 타임프레임 분석을 찾습니다.
    pub fn analysis(&self, timeframe: Timeframe) -> Option<&TimeframeAnalysis> {
        self.timeframes.iter().find(|a| a.timeframe == timeframe)
    }

    /// 코인 흐름 리포트를 찾습니다.
    pub fn flow(&self, coin: &str) -> Option<&CoinFlowReport> {
        self.flows.iter().find(|f| f.coin == coin)
    }
}

/// 리포트 조립기.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    parser: TransferParser,
    aggregator: WindowAggregator,
    scorer: SignalScorer,
    decision: DecisionAggregator,
    primary_coin: String,
    use_short_term_scores: bool,
}

impl ReportBuilder {
    /// 설정에서 조립기를 만듭니다.
    pub fn from_config(config: &AppConfig) -> Self {
        let classifier = TransferClassifier::new(ExchangeCatalog::from_config(&config.exchanges));
        Self {
            parser: TransferParser::new(classifier),
            aggregator: WindowAggregator::from_config(config),
            scorer: SignalScorer::new(),
            decision: DecisionAggregator::new(),
            primary_coin: config.coins.primary.clone(),
            use_short_term_scores: config.decision.use_short_term_scores,
        }
    }

    pub fn parser(&self) -> &TransferParser {
        &self.parser
    }

    /// 한 주기 리포트를 만듭니다.
    pub fn build(&self, inputs: &CycleInputs) -> SignalReport {
        let events = self.parser.parse_all(&inputs.alerts);
        let coin_flows = self.aggregator.aggregate(&events, inputs.now);

        let primary = coin_flows.iter().find(|f| f.coin == self.primary_coin);
        let timeframes: Vec<TimeframeAnalysis> = Timeframe::REPORT
            .iter()
            .map(|&timeframe| {
                self.scorer.analyze(
                    timeframe,
                    inputs.candles_for(timeframe),
                    whale_flow_for(primary, timeframe),
                    inputs.long_short_for(timeframe),
                )
            })
            .collect();

        let decision = self.decide(&timeframes);
        let flows = coin_flows
            .into_iter()
            .map(|flows| flow_report(flows, &inputs.market))
            .collect();

        info!(
            symbol = %inputs.symbol,
            alerts = inputs.alerts.len(),
            events = events.len(),
            verdict = %decision.verdict,
            "리포트 생성 완료"
        );

        SignalReport {
            generated_at: inputs.now,
            symbol: inputs.symbol.clone(),
            primary_coin: self.primary_coin.clone(),
            alerts_received: inputs.alerts.len(),
            events_parsed: events.len(),
            timeframes,
            flows,
            decision,
        }
    }

    /// 타임프레임 점수로 최종 결정을 내립니다.
    ///
    /// 단기 점수 반영이 꺼져 있으면 5분/15분/30분 점수는 0으로 전달됩니다.
    fn decide(&self, timeframes: &[TimeframeAnalysis]) -> Decision {
        let mut scores = TimeframeScores::default();
        let mut trends = BTreeMap::new();

        for analysis in timeframes {
            if self.use_short_term_scores || !analysis.timeframe.is_short_term() {
                scores.set(analysis.timeframe, analysis.score.score);
            }
            trends.insert(analysis.timeframe, analysis.snapshot.trend);
        }

        self.decision.decide(scores, trends)
    }
}

/// 타임프레임과 같은 길이의 윈도우에서 주 코인의 순유입을 찾습니다.
fn whale_flow_for(
    primary: Option<&CoinFlows>,
    timeframe: Timeframe,
) -> Option<Decimal> {
    let minutes = i64::try_from(timeframe.as_minutes()).ok()?;
    primary?.window(minutes).map(WindowSummary::net_amount)
}

fn flow_report(flows: CoinFlows, market: &BTreeMap<String, CoinMarketStats>) -> CoinFlowReport {
    let stats = market.get(&flows.coin).cloned().unwrap_or_default();
    let headline = FlowPressure::headline(&flows, &stats);
    let windows = flows
        .windows
        .into_iter()
        .map(|summary| WindowFlowReport {
            assessment: FlowPressure::for_window(&summary, &stats),
            summary,
        })
        .collect();

    CoinFlowReport {
        coin: flows.coin,
        market: stats,
        headline,
        windows,
    }
}
