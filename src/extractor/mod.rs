// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod fields;

use crate::config::ScraperSettings;
use crate::domain::models::ProductRecord;
use crate::engines::browser::BrowserSession;
use crate::engines::fingerprint::{generate_fingerprint, ClientFingerprint};
use crate::engines::stealth::{CdpStealth, StealthInjector};
use crate::queue::RequestQueue;
use crate::utils::errors::ScrapeError;
use crate::utils::rate_limiter::RateLimiter;
use crate::utils::retry_policy::{retry_with_backoff, RetryPolicy};
use crate::utils::url_utils::{extract_product_id, normalize_url};
use chromiumoxide::Page;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// 重试的初始退避时间
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// 主内容等待的上限
const CONTENT_READY_TIMEOUT: Duration = Duration::from_secs(5);

/// 商品提取编排器
///
/// 每次调用执行：校验 → 限速 →（懒加载）会话初始化 → 导航 →
/// 主内容等待 → 字段提取 → 组装，清理在所有退出路径上执行。
/// 整个序列包裹在指数退避重试中；只有输入错误或重试耗尽
/// 才会到达调用方。
///
/// 编排器独占持有自己的浏览器会话与指纹。它不提供单飞互斥：
/// 并发调用必须经由 [`extract_via_queue`] 提交，否则会在共享的
/// 限速时间戳与浏览器会话上产生竞争。
pub struct ProductExtractor {
    settings: ScraperSettings,
    fingerprint: ClientFingerprint,
    limiter: RateLimiter,
    stealth: Box<dyn StealthInjector>,
    /// 懒加载创建、跨调用复用的浏览器会话
    session: Mutex<Option<BrowserSession>>,
}

impl ProductExtractor {
    /// 创建新的提取器实例
    ///
    /// 指纹在此处生成一次，会话生命周期内保持不变。
    pub fn new(settings: ScraperSettings) -> Self {
        Self::with_stealth(settings, Box::new(CdpStealth))
    }

    /// 以自定义伪装注入器创建提取器，便于按自动化后端替换
    pub fn with_stealth(settings: ScraperSettings, stealth: Box<dyn StealthInjector>) -> Self {
        let limiter = RateLimiter::new(Duration::from_millis(settings.min_request_interval_ms));
        Self {
            settings,
            fingerprint: generate_fingerprint(),
            limiter,
            stealth,
            session: Mutex::new(None),
        }
    }

    /// 提取一个商品页面，返回规范化的商品记录
    ///
    /// 成功是全有或全无的：顶层失败时绝不返回部分记录，
    /// 但成功记录中允许存在取默认值的子字段。
    pub async fn extract_product(&self, url: &str) -> Result<ProductRecord, ScrapeError> {
        // 校验失败立即返回，不消耗限速槽位，不重试
        let source_url =
            normalize_url(url).ok_or_else(|| ScrapeError::InvalidUrl(url.to_string()))?;
        let product_id = extract_product_id(&source_url)
            .ok_or_else(|| ScrapeError::InvalidUrl(url.to_string()))?;

        let policy = RetryPolicy {
            max_retries: self.settings.max_retries,
            base_delay: RETRY_BASE_DELAY,
        };
        retry_with_backoff(
            &policy,
            || self.extract_once(&source_url, &product_id),
            ScrapeError::is_retryable,
        )
        .await
    }

    /// 单次提取尝试：限速 → 会话 → 页面 → 提取 → 清理
    async fn extract_once(
        &self,
        source_url: &str,
        product_id: &str,
    ) -> Result<ProductRecord, ScrapeError> {
        self.limiter.wait_for_next_request().await;

        let mut session_guard = self.session.lock().await;
        if session_guard.is_none() {
            *session_guard =
                Some(BrowserSession::launch(&self.settings, &self.fingerprint).await?);
        }
        let Some(session) = session_guard.as_ref() else {
            return Err(ScrapeError::Browser("会话初始化失败".to_string()));
        };

        let page = session
            .open_page(&self.fingerprint, self.stealth.as_ref())
            .await?;
        let result = self
            .run_extraction(session, &page, source_url, product_id)
            .await;

        // 清理在所有退出路径上执行，保证页面释放
        if let Err(e) = page.close().await {
            tracing::debug!(error = %e, "关闭页面失败");
        }
        result
    }

    async fn run_extraction(
        &self,
        session: &BrowserSession,
        page: &Page,
        source_url: &str,
        product_id: &str,
    ) -> Result<ProductRecord, ScrapeError> {
        session
            .navigate(
                page,
                source_url,
                Duration::from_millis(self.settings.navigation_timeout_ms),
            )
            .await?;
        session.wait_for_content(page, CONTENT_READY_TIMEOUT).await;

        let html = session.page_content(page).await?;
        let fields = fields::extract_fields(&html);
        tracing::debug!(
            product_id,
            title = %fields.title,
            price = fields.price,
            variants = fields.variants.len(),
            "字段提取完成"
        );

        Ok(ProductRecord {
            product_id: product_id.to_string(),
            title: fields.title,
            description: fields.description,
            price: fields.price,
            original_price: fields.original_price,
            currency: fields.currency,
            images: fields.images,
            videos: fields.videos,
            variants: fields.variants,
            specifications: fields.specifications,
            shipping_options: fields.shipping_options,
            supplier: fields.supplier,
            stock: fields.stock,
            source_url: source_url.to_string(),
            scraped_at: Utc::now(),
        })
    }

    /// 释放浏览器会话；幂等，从不失败
    pub async fn close(&self) {
        if let Some(session) = self.session.lock().await.take() {
            session.close().await;
        }
    }
}

/// 通过请求队列串行提交一次提取
///
/// 编排器自身不提供单飞互斥；并发调用应一律经由此函数提交，
/// 由队列保证同一时刻只有一次提取在执行。
pub async fn extract_via_queue(
    extractor: Arc<ProductExtractor>,
    queue: &RequestQueue,
    url: String,
) -> Result<ProductRecord, ScrapeError> {
    let handle = queue.add(async move { extractor.extract_product(&url).await });
    handle
        .await
        .map_err(|_| ScrapeError::Browser("队列任务被丢弃".to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperSettings;

    fn test_extractor() -> ProductExtractor {
        ProductExtractor::new(ScraperSettings {
            min_request_interval_ms: 0,
            ..ScraperSettings::default()
        })
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_any_navigation() {
        let extractor = test_extractor();

        // 类目页没有可提取的商品ID，校验阶段即失败，不会启动浏览器
        let result = extractor
            .extract_product("https://www.aliexpress.com/category/15/home.html")
            .await;
        assert!(matches!(result, Err(ScrapeError::InvalidUrl(_))));
        assert!(extractor.session.lock().await.is_none());

        extractor.close().await;
    }

    #[tokio::test]
    async fn test_non_marketplace_url_rejected() {
        let extractor = test_extractor();
        let result = extractor
            .extract_product("https://www.example.com/item/123.html")
            .await;
        assert!(matches!(result, Err(ScrapeError::InvalidUrl(_))));
        extractor.close().await;
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let extractor = test_extractor();
        extractor.close().await;
        extractor.close().await;
    }

    #[tokio::test]
    async fn test_queue_submission_propagates_input_error() {
        let extractor = Arc::new(test_extractor());
        let queue = RequestQueue::new();

        let result = extract_via_queue(
            Arc::clone(&extractor),
            &queue,
            "not a url".to_string(),
        )
        .await;
        assert!(matches!(result, Err(ScrapeError::InvalidUrl(_))));

        extractor.close().await;
    }
}
