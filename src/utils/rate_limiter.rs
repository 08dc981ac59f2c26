// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// 默认的对外请求最小间隔
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(3000);

/// 请求限速器
///
/// 保证每次调用相对于上一次*已记录*的请求完成时刻至少间隔
/// `min_interval`；等待结束后才记录新的时间戳。间隔为零时从不等待。
///
/// 注意：本组件自身不提供互斥。两个并发调用者可能读到同一个
/// 历史时间戳并同时放行。需要严格的单飞顺序时，必须与
/// [`crate::queue::RequestQueue`] 搭配使用，由队列保证串行提交。
pub struct RateLimiter {
    /// 两次请求之间的最小间隔
    min_interval: Duration,
    /// 上一次请求的记录时刻，首次请求前为 None
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// 创建新的限速器实例
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// 等待直到允许发起下一次请求
    ///
    /// 计算距上一次记录请求的已过时间，不足最小间隔时挂起调用者
    /// 补足差值；无论是否等待，完成时都会记录新的时间戳。
    pub async fn wait_for_next_request(&self) {
        let wait = {
            let last = self.last_request.lock().await;
            match *last {
                Some(prev) => self.min_interval.saturating_sub(prev.elapsed()),
                None => Duration::ZERO,
            }
        };

        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "限速等待");
            tokio::time::sleep(wait).await;
        }

        // 等待结束后才记录，保证间隔相对于完成时刻计算
        *self.last_request.lock().await = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REQUEST_INTERVAL)
    }
}
