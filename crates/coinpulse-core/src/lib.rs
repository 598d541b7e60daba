//! # Coinpulse Core
//!
//! 시그널 엔진 전반에서 사용되는 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! - 캔들(OHLCV) 및 캔들 시계열
//! - 타임프레임 및 집계 윈도우 카탈로그
//! - 고래 전송 이벤트 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
