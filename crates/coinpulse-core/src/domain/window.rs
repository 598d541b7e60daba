//! 고래 흐름 집계 윈도우 카탈로그.
//!
//! 모든 윈도우는 리포트 생성 시각(`now`)에 고정된 후행 구간 `[now - duration, now)` 입니다.
//! 윈도우끼리는 서로 겹치므로 한 이벤트가 여러 윈도우에 동시에 집계됩니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 후행 집계 윈도우.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// 표시 라벨 (예: "last_5m")
    pub label: String,
    /// 윈도우 길이 (분)
    pub minutes: i64,
}

impl TimeWindow {
    /// 새 윈도우를 생성합니다.
    pub fn new(label: impl Into<String>, minutes: i64) -> Self {
        Self {
            label: label.into(),
            minutes,
        }
    }

    /// 분 단위 길이에서 기본 라벨을 붙여 생성합니다.
    pub fn from_minutes(minutes: i64) -> Self {
        let label = if minutes % 1440 == 0 {
            format!("last_{}d", minutes / 1440)
        } else if minutes % 60 == 0 {
            format!("last_{}h", minutes / 60)
        } else {
            format!("last_{}m", minutes)
        };
        Self::new(label, minutes)
    }

    /// 기본 카탈로그: 5분, 15분, 30분, 1시간, 4시간, 24시간.
    pub fn default_catalog() -> Vec<TimeWindow> {
        [5, 15, 30, 60, 240, 1440]
            .into_iter()
            .map(TimeWindow::from_minutes)
            .collect()
    }

    /// 윈도우 길이.
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes)
    }

    /// `now` 기준 윈도우 경계 `(t0, t1)`를 반환합니다. `t1 == now`.
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now - self.duration(), now)
    }

    /// 시각이 반열린 구간 `[t0, t1)`에 속하는지 확인합니다.
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (t0, t1) = self.bounds(now);
        t0 <= timestamp && timestamp < t1
    }
}
