//! 고정 간격 재시도.
//!
//! 외부 조회는 최대 `max_attempts`번 시도하고, 시도 사이에는 같은 시간만큼 대기합니다.
//! 모든 시도가 실패하면 마지막 오류를 담은 [`FetchFailure`]를 반환합니다.

use coinpulse_core::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{DataResult, FetchFailure};

/// 재시도 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (0이면 1로 취급)
    pub max_attempts: u32,
    /// 시도 간 대기 시간
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_millis(config.delay_ms),
        }
    }
}

impl RetryPolicy {
    /// 대기 없이 한 번만 시도하는 정책.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// `op`를 정책에 따라 재시도합니다.
///
/// `label`은 로그와 실패 결과에 조회 대상을 남기는 데 씁니다.
pub async fn retry_fetch<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, FetchFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DataResult<T>>,
{
    let max_attempts = policy.attempts();
    let mut reason = String::new();

    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                reason = e.to_string();
                if attempt < max_attempts {
                    debug!(
                        source = label,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        "조회 재시도 예정"
                    );
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    warn!(
        source = label,
        attempts = max_attempts,
        error = %reason,
        "조회 최종 실패, 누락 데이터로 처리"
    );

    Err(FetchFailure {
        source_name: label.to_string(),
        attempts: max_attempts,
        reason,
    })
}
