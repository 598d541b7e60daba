//! 금액/수량 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;
use std::str::FromStr;

/// 가격 타입.
pub type Price = Decimal;

/// 수량 타입 (자산 단위 또는 거래량).
pub type Quantity = Decimal;

/// 천 단위 구분 기호(`,`)가 포함된 숫자 문자열을 파싱합니다.
///
/// `"56,000,000"` → `56000000`. 숫자가 하나도 없거나 형식이 잘못되면 `None`.
pub fn parse_grouped_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}
