//! 파일 스냅샷으로 리포트 한 주기를 실행합니다.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use coinpulse_analytics::{ReportBuilder, SignalReport};
use coinpulse_core::{cycle_span, AppConfig};
use coinpulse_data::{
    CycleCollector, FileAlertSource, FileCandleProvider, RetryPolicy, StaticMarketStats,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

/// 리포트 실행 설정.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// `<SYMBOL>_<interval>.json` 캔들 파일 디렉터리
    pub data_dir: PathBuf,
    /// JSON lines 알림 파일
    pub alerts: PathBuf,
    /// 시장 통계 JSON 파일 (없으면 모두 누락)
    pub stats: Option<PathBuf>,
    /// 리포트 기준 시각
    pub now: DateTime<Utc>,
}

/// 한 주기를 수집하고 리포트를 만듭니다.
pub async fn run_report(app: &AppConfig, config: ReportConfig) -> Result<SignalReport> {
    let span = cycle_span!("report", app.candles.symbol);

    async move {
        let stats = match &config.stats {
            Some(path) => StaticMarketStats::load(path)
                .await
                .with_context(|| format!("Failed to load market stats: {}", path.display()))?,
            None => StaticMarketStats::default(),
        };

        // 파일 스냅샷은 한 번만 읽음
        let collector = CycleCollector::new(
            app,
            Arc::new(FileCandleProvider::new(&config.data_dir)),
            Arc::new(FileAlertSource::new(&config.alerts)),
            Arc::new(stats),
        )
        .with_policy(RetryPolicy::once());

        let cycle = collector.collect(config.now).await;
        if !cycle.is_complete() {
            warn!(
                failures = cycle.failures.len(),
                "일부 입력 누락, 누락 항목은 점수에서 제외"
            );
        }

        let report = ReportBuilder::from_config(app).build(&cycle.inputs);
        info!(
            verdict = %report.decision.verdict,
            rationale = ?report.decision.rationale,
            "리포트 완료"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use coinpulse_analytics::Verdict;
    use coinpulse_core::Timeframe;
    use std::path::Path;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn write_rising(dir: &Path, timeframe: Timeframe) {
        let step = timeframe.as_minutes() as i64;
        let rows: Vec<serde_json::Value> = (0..120i64)
            .map(|i| {
                let open_time = now() - Duration::minutes(step * (120 - i));
                let close = 1000 + i;
                serde_json::json!({
                    "open_time": open_time.to_rfc3339(),
                    "open": (close - 1).to_string(),
                    "high": (close + 1).to_string(),
                    "low": (close - 1).to_string(),
                    "close": close.to_string(),
                    "volume": "5",
                })
            })
            .collect();
        let path = dir.join(format!("BTCUSDT_{}.json", timeframe));
        std::fs::write(path, serde_json::Value::Array(rows).to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_report_from_files() {
        let dir = TempDir::new().unwrap();
        for timeframe in Timeframe::REPORT {
            write_rising(dir.path(), timeframe);
        }
        let alerts = dir.path().join("alerts.jsonl");
        let line = serde_json::json!({
            "timestamp": (now() - Duration::minutes(1)).to_rfc3339(),
            "text": "300 #BTC (19,500,000 USD) transferred from binance to unknown wallet",
        });
        std::fs::write(&alerts, line.to_string()).unwrap();

        let report = run_report(
            &AppConfig::default(),
            ReportConfig {
                data_dir: dir.path().to_path_buf(),
                alerts,
                stats: None,
                now: now(),
            },
        )
        .await
        .unwrap();

        assert_eq!(report.events_parsed, 1);
        assert_eq!(report.timeframes.len(), 6);
        let h1 = report.analysis(Timeframe::H1).unwrap();
        assert_eq!(h1.candle_count, 120);
        assert!(h1.score.score > 0);
        // 통계 파일이 없으면 롱/숏은 누락
        assert_eq!(h1.long_short, None);
        // 단기 점수가 0으로 전달되므로 매수 조건 미충족
        assert_ne!(report.decision.verdict, Verdict::Buy);
    }

    #[tokio::test]
    async fn test_missing_alert_file_still_reports() {
        let dir = TempDir::new().unwrap();
        let report = run_report(
            &AppConfig::default(),
            ReportConfig {
                data_dir: dir.path().to_path_buf(),
                alerts: dir.path().join("missing.jsonl"),
                stats: None,
                now: now(),
            },
        )
        .await
        .unwrap();

        assert_eq!(report.alerts_received, 0);
        // 캔들이 전혀 없어도 고래 순유입 0은 입력으로 집계
        assert!(report
            .timeframes
            .iter()
            .all(|a| a.score.max_score == 1 && a.score.score == 0));
        assert_eq!(report.decision.verdict, Verdict::Hold);
    }

    #[tokio::test]
    async fn test_bad_stats_path_is_error() {
        let dir = TempDir::new().unwrap();
        let result = run_report(
            &AppConfig::default(),
            ReportConfig {
                data_dir: dir.path().to_path_buf(),
                alerts: dir.path().join("alerts.jsonl"),
                stats: Some(dir.path().join("nope.json")),
                now: now(),
            },
        )
        .await;
        assert!(result.is_err());
    }
}
