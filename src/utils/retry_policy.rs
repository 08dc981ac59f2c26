// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// 重试策略配置
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大重试次数（不含首次尝试，总调用次数 = max_retries + 1）
    pub max_retries: u32,
    /// 初始退避时间
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// 创建指定重试次数的策略，退避时间取默认值
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// 计算第 `attempt` 次重试前的退避时间
    ///
    /// `attempt` 从 0 开始：第一次重试前等待 base_delay * 2^0，
    /// 第二次重试前等待 base_delay * 2^1，依此类推。
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// 是否应该重试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// 以指数退避重试一个可失败的异步操作
///
/// `error_is_retryable` 对每个失败值做分类：返回 false 的失败值
/// 立即原样返回，不消耗重试次数。重试耗尽时同样原样返回
/// 最后一次的失败值，不做任何包装。
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    error_is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if policy.should_retry(attempt) && error_is_retryable(&err) => {
                let backoff = policy.backoff_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "操作失败，退避后重试"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        };

        assert_eq!(policy.backoff_for(0), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::with_max_retries(3);

        assert!(policy.should_retry(0));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_k_failures() {
        let policy = RetryPolicy::with_max_retries(3);
        let calls = AtomicU32::new(0);

        let result: Result<&str, String> = retry_with_backoff(
            &policy,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(format!("瞬时失败 {}", n))
                    } else {
                        Ok("成功")
                    }
                }
            },
            |_: &String| true,
        )
        .await;

        assert_eq!(result.unwrap(), "成功");
        // 失败2次 + 成功1次
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error_unchanged() {
        let policy = RetryPolicy::with_max_retries(2);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = retry_with_backoff(
            &policy,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(format!("失败 {}", n)) }
            },
            |_: &String| true,
        )
        .await;

        // 总调用次数 = max_retries + 1，且返回的是最后一次的失败值
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.unwrap_err(), "失败 2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let policy = RetryPolicy::with_max_retries(0);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = retry_with_backoff(
            &policy,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("仅一次".to_string()) }
            },
            |_: &String| true,
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err(), "仅一次");
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_fails_on_first_attempt() {
        let policy = RetryPolicy::with_max_retries(3);
        let calls = AtomicU32::new(0);

        // 被分类为不可重试的失败值不消耗重试次数，立即原样返回
        let result: Result<(), String> = retry_with_backoff(
            &policy,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("不可重试".to_string()) }
            },
            |err: &String| err != "不可重试",
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err(), "不可重试");
    }
}
