// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 提取流程错误类型
///
/// 错误传播策略：单个字段提取失败不产生错误（静默降级为默认值）；
/// 页面级失败透明重试；只有输入校验失败或重试耗尽才到达调用方。
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 输入URL无效，立即失败，不消耗限速槽位，不重试
    #[error("无效的商品链接: {0}")]
    InvalidUrl(String),

    /// 导航/网络失败。对调用方只暴露统一的脱敏消息，
    /// 根因仅记录在日志中
    #[error("页面加载失败，请稍后重试")]
    Navigation,

    /// 浏览器会话错误: {0}
    #[error("浏览器会话错误: {0}")]
    Browser(String),
}

impl ScrapeError {
    /// 该错误是否可以重试
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ScrapeError::InvalidUrl(_))
    }
}
