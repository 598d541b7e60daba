//! 거래소 카탈로그 기반 전송 방향 분류.

use coinpulse_core::{ExchangeCatalogConfig, TransferDirection};

/// 거래소 이름 조각 집합.
///
/// 계정 라벨에 조각 하나라도 포함되면(대소문자 무시) 거래소 계정으로 봅니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeCatalog {
    fragments: Vec<String>,
}

impl ExchangeCatalog {
    /// 이름 조각 목록으로 생성합니다. 빈 조각은 무시합니다.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fragments: Vec<String> = fragments
            .into_iter()
            .map(|f| f.as_ref().trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        fragments.sort();
        fragments.dedup();
        Self { fragments }
    }

    /// 설정 섹션에서 생성합니다.
    pub fn from_config(config: &ExchangeCatalogConfig) -> Self {
        Self::new(&config.names)
    }

    /// 라벨이 거래소 계정인지 확인합니다.
    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.fragments.iter().any(|f| label.contains(f.as_str()))
    }

    /// 등록된 이름 조각.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

impl Default for ExchangeCatalog {
    fn default() -> Self {
        Self::from_config(&ExchangeCatalogConfig::default())
    }
}

/// 출금/입금 라벨로 전송 방향을 판단합니다.
#[derive(Debug, Clone, Default)]
pub struct TransferClassifier {
    catalog: ExchangeCatalog,
}

impl TransferClassifier {
    pub fn new(catalog: ExchangeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ExchangeCatalog {
        &self.catalog
    }

    /// 방향 분류.
    ///
    /// - 양쪽 모두 거래소 → 거래소 간 이동
    /// - 입금 쪽만 거래소 → 거래소 유입
    /// - 출금 쪽만 거래소 → 거래소 유출
    /// - 둘 다 아님 → 기타
    pub fn classify(&self, source_label: &str, dest_label: &str) -> TransferDirection {
        match (self.catalog.matches(source_label), self.catalog.matches(dest_label)) {
            (true, true) => TransferDirection::ExchangeToExchange,
            (false, true) => TransferDirection::IntoExchange,
            (true, false) => TransferDirection::OutOfExchange,
            (false, false) => TransferDirection::Other,
        }
    }
}
