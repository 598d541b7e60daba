//! 고래(대규모) 전송 이벤트 타입.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 거래소 기준 전송 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    /// 거래소로 입금 (매도 압력 후보)
    IntoExchange,
    /// 거래소에서 출금 (매수/보유 신호 후보)
    OutOfExchange,
    /// 거래소 간 이동
    ExchangeToExchange,
    /// 거래소와 무관한 이동 (집계 제외)
    Other,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferDirection::IntoExchange => write!(f, "into_exchange"),
            TransferDirection::OutOfExchange => write!(f, "out_of_exchange"),
            TransferDirection::ExchangeToExchange => write!(f, "exchange_to_exchange"),
            TransferDirection::Other => write!(f, "other"),
        }
    }
}

/// 알림 한 건에서 추출하고 분류한 전송 이벤트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// 전송 수량 (자산 단위)
    pub amount: Decimal,
    /// 코인 티커 (대문자)
    pub coin: String,
    /// USD 환산 금액
    pub usd_value: Decimal,
    /// 출금 계정 라벨 (소문자)
    pub source_label: String,
    /// 입금 계정 라벨 (소문자)
    pub dest_label: String,
    /// 알림 수신 시각
    pub timestamp: DateTime<Utc>,
    /// 거래소 기준 방향
    pub direction: TransferDirection,
}

impl TransferEvent {
    /// 거래소 간 이동 상세 기록으로 변환합니다.
    pub fn to_exchange_transfer(&self) -> ExchangeTransfer {
        ExchangeTransfer {
            amount: self.amount,
            usd_value: self.usd_value,
            source_label: self.source_label.clone(),
            dest_label: self.dest_label.clone(),
        }
    }
}

/// 거래소 간 이동 상세.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeTransfer {
    /// 전송 수량
    pub amount: Decimal,
    /// USD 환산 금액
    pub usd_value: Decimal,
    /// 출금 거래소 라벨
    pub source_label: String,
    /// 입금 거래소 라벨
    pub dest_label: String,
}
