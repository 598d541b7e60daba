//! 데이터 모듈 오류 타입.

use coinpulse_core::CoreError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 외부 소스 조회 오류
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    IoError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 데이터를 찾을 수 없음
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => DataError::NotFound(err.to_string()),
            _ => DataError::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<CoreError> for DataError {
    fn from(err: CoreError) -> Self {
        DataError::InvalidData(err.to_string())
    }
}

pub type DataResult<T> = std::result::Result<T, DataError>;

/// 재시도를 모두 소진한 조회 실패.
///
/// 마지막 시도의 오류 메시지를 담고, 리포트에서는 누락 데이터로 처리됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name} 조회 실패 ({attempts}회 시도): {reason}")]
pub struct FetchFailure {
    /// 조회 대상 이름 (예: "candles BTCUSDT 1h")
    pub source_name: String,
    /// 시도 횟수
    pub attempts: u32,
    /// 마지막 오류 메시지
    pub reason: String,
}
