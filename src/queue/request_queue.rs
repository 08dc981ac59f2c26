// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::oneshot;

/// 排队等待执行的工作单元
type Job = BoxFuture<'static, ()>;

/// 队列内部状态
struct Inner {
    /// 尚未开始执行的任务
    pending: VecDeque<Job>,
    /// 是否有排空循环正在运行
    processing: bool,
}

/// 单飞请求队列
///
/// 按提交顺序串行执行异步任务，保证同一时刻至多一个任务在执行。
/// 某个任务失败乃至panic只影响其自身的结果句柄，
/// 队列继续排空后续任务。
///
/// 限速器（[`crate::utils::rate_limiter::RateLimiter`]）自身不提供
/// 互斥，所有经由同一提取器的并发调用都应当通过本队列提交。
#[derive(Clone)]
pub struct RequestQueue {
    inner: Arc<Mutex<Inner>>,
}

impl RequestQueue {
    /// 创建新的空队列
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                pending: VecDeque::new(),
                processing: false,
            })),
        }
    }

    /// 提交一个任务并返回其结果句柄
    ///
    /// 任务按提交顺序执行；若当前没有任务在执行则立即开始排空。
    /// 返回的 [`oneshot::Receiver`] 在任务结束时收到其输出值。
    pub fn add<F, O>(&self, job: F) -> oneshot::Receiver<O>
    where
        F: Future<Output = O> + Send + 'static,
        O: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let wrapped: Job = Box::pin(async move {
            let output = job.await;
            // 接收端可能已放弃等待，发送失败直接丢弃
            let _ = tx.send(output);
        });

        let start_drain = {
            let mut inner = self.inner.lock();
            inner.pending.push_back(wrapped);
            if inner.processing {
                false
            } else {
                inner.processing = true;
                true
            }
        };

        if start_drain {
            self.spawn_drain();
        }
        rx
    }

    /// 启动排空循环
    ///
    /// 不变式：任意时刻至多一个排空循环在运行，由 `processing`
    /// 标志在同一临界区内的检查与置位保证。
    fn spawn_drain(&self) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            loop {
                let job = {
                    let mut guard = inner.lock();
                    match guard.pending.pop_front() {
                        Some(job) => job,
                        None => {
                            guard.processing = false;
                            break;
                        }
                    }
                };
                // 任务panic时其发送端被丢弃，句柄以取消告终；
                // 排空循环必须存活，否则 processing 永远为真
                if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                    tracing::warn!("队列任务发生panic，已跳过并继续排空");
                }
            }
        });
    }

    /// 尚未结束的任务数（含正在执行的任务）
    pub fn queue_length(&self) -> usize {
        let inner = self.inner.lock();
        inner.pending.len() + usize::from(inner.processing)
    }

    /// 是否有任务正在执行
    pub fn is_processing(&self) -> bool {
        self.inner.lock().processing
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}
