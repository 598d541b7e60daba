//! 파일 기반 Provider.
//!
//! 오프라인 실행과 테스트를 위해 디렉터리에 저장된 스냅샷을 읽습니다.
//!
//! ## 파일 형식
//! - 캔들: `<dir>/<SYMBOL>_<interval>.json` (예: `BTCUSDT_1h.json`).
//!   `Candle` 객체 배열 또는 바이낸스 klines 응답 배열 그대로 둘 다 허용합니다.
//! - 알림: JSON lines, 한 줄에 `{"timestamp": ..., "text": ...}` 하나.
//! - 시장 통계: [`MarketStatsFile`] JSON.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use coinpulse_core::{Candle, CandleSeries, RawAlert, Timeframe};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{DataError, DataResult};
use crate::provider::{AlertSource, CandleProvider, MarketStatsProvider};

// ==================== 캔들 ====================

/// 캔들 파일의 행 하나.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CandleRow {
    Object(Candle),
    /// `[open_time_ms, open, high, low, close, volume, ...]`
    Kline(Vec<Value>),
}

fn decimal_field(row: &[Value], index: usize) -> DataResult<Decimal> {
    let value = row
        .get(index)
        .ok_or_else(|| DataError::InvalidData(format!("kline column {} missing", index)))?;
    match value {
        Value::String(s) => Decimal::from_str(s)
            .map_err(|e| DataError::ParseError(format!("kline column {}: {}", index, e))),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(int), _) => Ok(Decimal::from(int)),
            (None, Some(float)) => Decimal::try_from(float)
                .map_err(|e| DataError::ParseError(format!("kline column {}: {}", index, e))),
            _ => Err(DataError::ParseError(format!(
                "kline column {}: unrepresentable number {}",
                index, n
            ))),
        },
        _ => Err(DataError::InvalidData(format!(
            "kline column {} is not numeric",
            index
        ))),
    }
}

impl CandleRow {
    fn into_candle(self) -> DataResult<Candle> {
        match self {
            CandleRow::Object(candle) => Ok(candle),
            CandleRow::Kline(row) => {
                let open_ms = row
                    .first()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| DataError::InvalidData("kline open time missing".to_string()))?;
                let open_time = Utc
                    .timestamp_millis_opt(open_ms)
                    .single()
                    .ok_or_else(|| {
                        DataError::InvalidData(format!("kline open time out of range: {}", open_ms))
                    })?;
                Ok(Candle::new(
                    open_time,
                    decimal_field(&row, 1)?,
                    decimal_field(&row, 2)?,
                    decimal_field(&row, 3)?,
                    decimal_field(&row, 4)?,
                    decimal_field(&row, 5)?,
                ))
            }
        }
    }
}

fn parse_row(row: Value) -> DataResult<Candle> {
    serde_json::from_value::<CandleRow>(row)?.into_candle()
}

/// 캔들 파일 본문을 시계열로 변환합니다. 뒤에서부터 `limit`개만 남깁니다.
///
/// 파싱할 수 없는 행은 건너뜁니다. 행이 있는데 하나도 쓸 수 없으면 에러입니다.
pub fn parse_candles(
    raw: &str,
    symbol: &str,
    timeframe: Timeframe,
    limit: usize,
) -> DataResult<CandleSeries> {
    let rows: Vec<Value> = serde_json::from_str(raw)?;
    let total = rows.len();
    let mut candles: Vec<Candle> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match parse_row(row) {
            Ok(candle) => Some(candle),
            Err(e) => {
                debug!(symbol = symbol, timeframe = %timeframe, index, reason = %e, "캔들 행 건너뜀");
                None
            }
        })
        .collect();

    if total > 0 && candles.is_empty() {
        return Err(DataError::InvalidData(format!(
            "no valid candle rows ({} rejected)",
            total
        )));
    }

    if candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }

    Ok(CandleSeries::new(symbol, timeframe, candles)?)
}

/// 디렉터리 기반 캔들 Provider.
#[derive(Debug, Clone)]
pub struct FileCandleProvider {
    dir: PathBuf,
}

impl FileCandleProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 심볼/타임프레임의 캔들 파일 경로.
    pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", symbol, timeframe.to_binance_interval()))
    }
}

#[async_trait]
impl CandleProvider for FileCandleProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> DataResult<CandleSeries> {
        let path = self.path_for(symbol, timeframe);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                DataError::NotFound(format!("candle file {}", path.display()))
            }
            _ => DataError::from(e),
        })?;

        let series = parse_candles(&raw, symbol, timeframe, limit)?;
        debug!(
            symbol = symbol,
            timeframe = %timeframe,
            candle_count = series.len(),
            "캔들 파일 로드"
        );
        Ok(series)
    }
}

// ==================== 알림 ====================

/// JSON lines 본문을 알림 목록으로 변환합니다. 빈 줄은 건너뜁니다.
pub fn parse_alert_lines(raw: &str) -> DataResult<Vec<RawAlert>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<RawAlert>(line)
                .map_err(|e| DataError::ParseError(format!("alert line {}: {}", index + 1, e)))
        })
        .collect()
}

/// JSON lines 파일 기반 알림 피드.
#[derive(Debug, Clone)]
pub struct FileAlertSource {
    path: PathBuf,
}

impl FileAlertSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AlertSource for FileAlertSource {
    fn name(&self) -> &str {
        "file"
    }

    /// 파일 끝쪽(가장 최근) 알림을 최대 `limit`개 반환합니다.
    async fn fetch_alerts(&self, limit: usize) -> DataResult<Vec<RawAlert>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let mut alerts = parse_alert_lines(&raw)?;
        if alerts.len() > limit {
            alerts.drain(..alerts.len() - limit);
        }
        debug!(path = %self.path.display(), count = alerts.len(), "알림 파일 로드");
        Ok(alerts)
    }
}

// ==================== 시장 통계 ====================

/// 시장 통계 스냅샷 파일.
///
/// ```json
/// {
///   "daily_volume_usd": { "bitcoin": "25000000000" },
///   "price_usd": { "bitcoin": "65000" },
///   "long_short": { "BTCUSDT": { "1h": "1.15" } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketStatsFile {
    /// 외부 ID → 24시간 거래대금
    pub daily_volume_usd: BTreeMap<String, Decimal>,
    /// 외부 ID → 현재가
    pub price_usd: BTreeMap<String, Decimal>,
    /// 심볼 → 간격 문자열 → 롱/숏 비율
    pub long_short: BTreeMap<String, BTreeMap<String, Decimal>>,
}

/// 고정 스냅샷 기반 시장 통계 Provider.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketStats {
    stats: MarketStatsFile,
}

impl StaticMarketStats {
    pub fn new(stats: MarketStatsFile) -> Self {
        Self { stats }
    }

    /// JSON 파일에서 로드합니다.
    pub async fn load(path: impl AsRef<Path>) -> DataResult<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(Self::new(serde_json::from_str(&raw)?))
    }

    fn lookup(map: &BTreeMap<String, Decimal>, kind: &str, key: &str) -> DataResult<Decimal> {
        map.get(key)
            .copied()
            .ok_or_else(|| DataError::NotFound(format!("{} for {}", kind, key)))
    }
}

#[async_trait]
impl MarketStatsProvider for StaticMarketStats {
    fn name(&self) -> &str {
        "static"
    }

    async fn daily_volume_usd(&self, coin_id: &str) -> DataResult<Decimal> {
        Self::lookup(&self.stats.daily_volume_usd, "daily volume", coin_id)
    }

    async fn price_usd(&self, coin_id: &str) -> DataResult<Decimal> {
        Self::lookup(&self.stats.price_usd, "price", coin_id)
    }

    async fn long_short_ratio(&self, symbol: &str, timeframe: Timeframe) -> DataResult<Decimal> {
        self.stats
            .long_short
            .get(symbol)
            .and_then(|by_interval| by_interval.get(timeframe.to_binance_interval()))
            .copied()
            .ok_or_else(|| {
                DataError::NotFound(format!("long/short ratio for {} {}", symbol, timeframe))
            })
    }
}

/// 알림 타임스탬프 파싱 도우미 (RFC 3339).
pub fn parse_timestamp(raw: &str) -> DataResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DataError::ParseError(format!("timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_candle_objects() {
        let raw = r#"[
            {"open_time": "2024-05-01T00:00:00Z", "open": "100", "high": "105", "low": "99", "close": "104", "volume": "12.5"},
            {"open_time": "2024-05-01T01:00:00Z", "open": "104", "high": "106", "low": "103", "close": "105", "volume": "8"}
        ]"#;

        let series = parse_candles(raw, "BTCUSDT", Timeframe::H1, 200).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![dec!(104), dec!(105)]);
        assert_eq!(series.volumes()[0], dec!(12.5));
    }

    #[test]
    fn test_parse_binance_klines() {
        let raw = r#"[
            [1714521600000, "100.0", "105.0", "99.0", "104.0", "12.5", 1714525199999, "1300", 10, "6", "600", "0"],
            [1714525200000, "104.0", "106.0", "103.0", "105.0", "8.0", 1714528799999, "840", 7, "4", "420", "0"],
            [1714528800000, 105, 107, 104, 106, 9, 1714532399999, "954", 8, "5", "530", "0"]
        ]"#;

        let series = parse_candles(raw, "BTCUSDT", Timeframe::H1, 2).unwrap();
        // 마지막 2개만 유지
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![dec!(105), dec!(106)]);
    }

    #[test]
    fn test_parse_candles_rejects_bad_rows() {
        assert!(parse_candles("[[1714521600000, \"x\"]]", "BTCUSDT", Timeframe::H1, 10).is_err());
        assert!(parse_candles("{}", "BTCUSDT", Timeframe::H1, 10).is_err());
    }

    #[test]
    fn test_parse_candles_skips_malformed_row() {
        let raw = r#"[
            [1714521600000, "100.0", "105.0", "99.0", "104.0", "12.5"],
            [1714525200000, "bad", "106.0", "103.0", "105.0", "8.0"],
            [1714528800000, "105.0", "107.0", "104.0", "106.0", "9.0"]
        ]"#;

        let series = parse_candles(raw, "BTCUSDT", Timeframe::H1, 200).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![dec!(104), dec!(106)]);
    }

    #[test]
    fn test_parse_candles_skips_malformed_object() {
        let raw = r#"[
            {"open_time": "2024-05-01T00:00:00Z", "open": "100", "high": "105", "low": "99", "close": "104", "volume": "1"},
            {"open_time": "not a time", "open": "104", "high": "106", "low": "103", "close": "105", "volume": "1"}
        ]"#;

        let series = parse_candles(raw, "BTCUSDT", Timeframe::H1, 200).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_parse_candles_empty_array() {
        let series = parse_candles("[]", "BTCUSDT", Timeframe::H1, 200).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_numeric_kline_fractional_values() {
        let raw = "[[1714521600000, 65000.5, 65100.25, 64900, 65050.75, 0.5]]";

        let series = parse_candles(raw, "BTCUSDT", Timeframe::H1, 200).unwrap();
        assert_eq!(series.closes(), vec![dec!(65050.75)]);
        assert_eq!(series.volumes(), vec![dec!(0.5)]);
    }

    #[test]
    fn test_parse_alert_lines() {
        let raw = concat!(
            "{\"timestamp\": \"2024-05-01T11:58:00Z\", \"text\": \"100 #BTC (6,000,000 USD) transferred from binance to unknown wallet\"}\n",
            "\n",
            "{\"timestamp\": \"2024-05-01T11:59:00Z\", \"text\": \"gm\"}\n",
        );

        let alerts = parse_alert_lines(raw).unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[1].text, "gm");
        assert_eq!(
            alerts[0].timestamp,
            parse_timestamp("2024-05-01T11:58:00Z").unwrap()
        );
    }

    #[test]
    fn test_parse_alert_lines_reports_line_number() {
        let err = parse_alert_lines("{\"timestamp\": \"2024-05-01T11:58:00Z\", \"text\": \"a\"}\nnope")
            .unwrap_err();
        assert!(err.to_string().contains("alert line 2"));
    }

    #[tokio::test]
    async fn test_static_market_stats_lookup() {
        let stats: MarketStatsFile = serde_json::from_str(
            r#"{
                "daily_volume_usd": {"bitcoin": "25000000000"},
                "price_usd": {"bitcoin": 65000.5},
                "long_short": {"BTCUSDT": {"1h": "1.15"}}
            }"#,
        )
        .unwrap();
        let provider = StaticMarketStats::new(stats);

        assert_eq!(
            provider.daily_volume_usd("bitcoin").await.unwrap(),
            dec!(25000000000)
        );
        assert_eq!(provider.price_usd("bitcoin").await.unwrap(), dec!(65000.5));
        assert_eq!(
            provider
                .long_short_ratio("BTCUSDT", Timeframe::H1)
                .await
                .unwrap(),
            dec!(1.15)
        );
        assert!(matches!(
            provider.long_short_ratio("BTCUSDT", Timeframe::M5).await,
            Err(DataError::NotFound(_))
        ));
        assert!(provider.price_usd("ethereum").await.is_err());
    }
}
