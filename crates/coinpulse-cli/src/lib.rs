//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 파일 스냅샷 기반 리포트 한 주기 실행
//! - 고래 알림 한 건 파싱
//! - 설정 로드 및 로깅 초기화

pub mod commands;

pub use commands::*;
