//! 고래(대규모) 전송 흐름 분석.
//!
//! 알림 원문 → [`TransferParser`] → 분류된 [`TransferEvent`](coinpulse_core::TransferEvent)
//! → [`WindowAggregator`] → 코인/윈도우별 [`WindowSummary`] → [`FlowPressure`] 평가 순으로 흐릅니다.

mod classifier;
mod parser;
mod pressure;
mod window;

pub use classifier::{ExchangeCatalog, TransferClassifier};
pub use parser::TransferParser;
pub use pressure::{FlowAssessment, FlowPressure, PressureLevel};
pub use window::{CoinFlows, FlowSide, WindowAggregator, WindowSummary};
