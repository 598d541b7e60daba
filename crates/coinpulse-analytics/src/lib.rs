//! 기술적 지표와 고래 흐름을 결합한 복합 시그널 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 계산 (EMA, MACD, RSI, StochRSI, MFI, ADX, OBV, 볼린저 밴드, ATR)
//! - 타임프레임별 시그널 점수 계산
//! - 고래 알림 파싱, 거래소 기준 방향 분류, 후행 윈도우 집계
//! - 타임프레임 점수를 합친 최종 권고
//! - 한 주기 리포트 조립
//!
//! 모든 계산은 동기식이며 전역 상태가 없습니다.

pub mod decision;
pub mod indicators;
pub mod report;
pub mod scorer;
pub mod snapshot;
pub mod whale;

// Indicators 모듈 re-exports
pub use indicators::{IndicatorEngine, IndicatorError, IndicatorResult};

// 점수/결정 re-exports
pub use decision::{Decision, DecisionAggregator, Rationale, TimeframeScores, Verdict};
pub use scorer::{
    IndicatorKind, ScoreResult, SignalAction, SignalScorer, SignalStrength, TimeframeAnalysis,
};
pub use snapshot::{IndicatorSnapshot, MarketRemark};

// 고래 흐름 re-exports
pub use whale::{
    CoinFlows, ExchangeCatalog, FlowAssessment, FlowPressure, FlowSide, PressureLevel,
    TransferClassifier, TransferParser, WindowAggregator, WindowSummary,
};

// 리포트 re-exports
pub use report::{CoinFlowReport, ReportBuilder, SignalReport, WindowFlowReport};
