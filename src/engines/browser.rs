// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::{ProxySettings, ScraperSettings};
use crate::engines::fingerprint::ClientFingerprint;
use crate::engines::stealth::StealthInjector;
use crate::utils::errors::ScrapeError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    AuthChallengeResponse, AuthChallengeResponseResponse, ContinueRequestParams,
    ContinueWithAuthParams, EnableParams, EventAuthRequired, EventRequestPaused,
};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 页面主内容就位检查所用的选择器集合
const CONTENT_READY_SELECTORS: &[&str] = &[
    ".product-title-text",
    "h1[data-pl='product-title']",
    ".pdp-info",
    "h1",
];

/// 主内容等待的轮询间隔
const CONTENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 浏览器会话
///
/// 由编排器独占持有，在其生命周期内懒加载创建一次并跨调用复用。
/// 每次提取调用通过 [`BrowserSession::open_page`] 打开自己的页面，
/// 并保证在所有退出路径上释放该页面。
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// 代理认证应答；配置了带凭据的代理时为 Some
    proxy_auth: Option<AuthChallengeResponse>,
}

/// 由代理配置构造认证应答
///
/// 未配置用户名时视为匿名代理，返回 None；密码缺省为空串。
fn proxy_credentials(proxy: &ProxySettings) -> Option<AuthChallengeResponse> {
    let username = proxy.username.as_deref()?;
    Some(AuthChallengeResponse {
        response: AuthChallengeResponseResponse::ProvideCredentials,
        username: Some(username.to_string()),
        password: Some(proxy.password.clone().unwrap_or_default()),
    })
}

impl BrowserSession {
    /// 按给定配置与指纹启动浏览器会话
    pub async fn launch(
        settings: &ScraperSettings,
        fingerprint: &ClientFingerprint,
    ) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .viewport(Some(Viewport {
                width: fingerprint.viewport.width,
                height: fingerprint.viewport.height,
                device_scale_factor: Some(1.0),
                ..Default::default()
            }))
            .request_timeout(Duration::from_millis(settings.navigation_timeout_ms))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg(format!("--lang={}", fingerprint.locale))
            .arg(format!(
                "--window-size={},{}",
                fingerprint.viewport.width, fingerprint.viewport.height
            ))
            .arg(format!("--user-agent={}", fingerprint.user_agent));

        if !settings.headless {
            builder = builder.with_head();
        }
        let mut proxy_auth = None;
        if let Some(proxy) = &settings.proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy.url));
            proxy_auth = proxy_credentials(proxy);
        }

        let config = builder
            .build()
            .map_err(|e| ScrapeError::Browser(format!("浏览器配置无效: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Browser(format!("浏览器启动失败: {}", e)))?;

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!(
            user_agent = %fingerprint.user_agent,
            locale = %fingerprint.locale,
            "浏览器会话已启动"
        );

        Ok(Self {
            browser,
            handler_task,
            proxy_auth,
        })
    }

    /// 打开一个新页面并完成导航前初始化
    ///
    /// 初始化内容：设置 User-Agent、注入伪装脚本、
    /// 按指纹区域设置 Accept-Language 标准请求头；
    /// 配置了带凭据的代理时，挂接代理认证应答。
    pub async fn open_page(
        &self,
        fingerprint: &ClientFingerprint,
        stealth: &dyn StealthInjector,
    ) -> Result<Page, ScrapeError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Browser(format!("打开页面失败: {}", e)))?;

        page.set_user_agent(fingerprint.user_agent.as_str())
            .await
            .map_err(|e| ScrapeError::Browser(format!("设置 User-Agent 失败: {}", e)))?;

        stealth.install(&page, fingerprint).await?;

        let headers = serde_json::json!({
            "Accept-Language": format!("{},{};q=0.9", fingerprint.locale, &fingerprint.locale[..2]),
        });
        page.execute(SetExtraHttpHeadersParams::new(Headers::new(headers)))
            .await
            .map_err(|e| ScrapeError::Browser(format!("设置请求头失败: {}", e)))?;

        if let Some(auth) = &self.proxy_auth {
            Self::install_proxy_auth(&page, auth.clone()).await?;
        }

        Ok(page)
    }

    /// 在页面上挂接代理认证应答
    ///
    /// 通过 Fetch 域接管请求：认证质询用配置的凭据应答，
    /// 其余被暂停的请求原样放行。应答循环随页面关闭而结束。
    async fn install_proxy_auth(
        page: &Page,
        auth: AuthChallengeResponse,
    ) -> Result<(), ScrapeError> {
        let mut auth_required = page
            .event_listener::<EventAuthRequired>()
            .await
            .map_err(|e| ScrapeError::Browser(format!("监听认证事件失败: {}", e)))?;
        let mut request_paused = page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(|e| ScrapeError::Browser(format!("监听请求事件失败: {}", e)))?;

        page.execute(EnableParams {
            patterns: None,
            handle_auth_requests: Some(true),
        })
        .await
        .map_err(|e| ScrapeError::Browser(format!("启用请求接管失败: {}", e)))?;

        let responder = page.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(event) = auth_required.next() => {
                        let reply =
                            ContinueWithAuthParams::new(event.request_id.clone(), auth.clone());
                        if responder.execute(reply).await.is_err() {
                            break;
                        }
                    }
                    Some(event) = request_paused.next() => {
                        let resume = ContinueRequestParams::new(event.request_id.clone());
                        if responder.execute(resume).await.is_err() {
                            break;
                        }
                    }
                    else => break,
                }
            }
        });
        Ok(())
    }

    /// 带超时导航到目标URL
    ///
    /// 导航后尽力等待网络静默；任何失败都折叠为统一的
    /// [`ScrapeError::Navigation`]，根因只记录在日志中。
    pub async fn navigate(
        &self,
        page: &Page,
        url: &str,
        timeout: Duration,
    ) -> Result<(), ScrapeError> {
        let nav = async {
            page.goto(url).await?;
            // 网络静默是尽力而为的，等待失败不致命
            page.wait_for_navigation().await.ok();
            Ok::<(), chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(timeout, nav).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(cause)) => {
                tracing::warn!(url, error = %cause, "页面导航失败");
                Err(ScrapeError::Navigation)
            }
            Err(_) => {
                tracing::warn!(url, timeout_ms = timeout.as_millis() as u64, "页面导航超时");
                Err(ScrapeError::Navigation)
            }
        }
    }

    /// 等待主内容出现
    ///
    /// 轮询多组已知选择器，任何一组命中即返回；超时后照常返回，
    /// 提取保持尽力而为。
    pub async fn wait_for_content(&self, page: &Page, timeout: Duration) {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            for selector in CONTENT_READY_SELECTORS {
                if page.find_element(*selector).await.is_ok() {
                    return;
                }
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::debug!("主内容等待超时，继续尽力提取");
                return;
            }
            tokio::time::sleep(CONTENT_POLL_INTERVAL).await;
        }
    }

    /// 读取页面当前HTML内容
    pub async fn page_content(&self, page: &Page) -> Result<String, ScrapeError> {
        page.content().await.map_err(|e| {
            tracing::warn!(error = %e, "读取页面内容失败");
            ScrapeError::Navigation
        })
    }

    /// 关闭会话，释放浏览器进程
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "关闭浏览器失败");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(username: Option<&str>, password: Option<&str>) -> ProxySettings {
        ProxySettings {
            url: "http://127.0.0.1:8080".to_string(),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_proxy_credentials_forwarded_into_auth_response() {
        let auth = proxy_credentials(&proxy(Some("user"), Some("secret")))
            .expect("带凭据的代理应当产生认证应答");

        assert!(matches!(
            auth.response,
            AuthChallengeResponseResponse::ProvideCredentials
        ));
        assert_eq!(auth.username.as_deref(), Some("user"));
        assert_eq!(auth.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_anonymous_proxy_has_no_auth_response() {
        assert!(proxy_credentials(&proxy(None, None)).is_none());
        // 只给密码不给用户名同样视为匿名
        assert!(proxy_credentials(&proxy(None, Some("secret"))).is_none());
    }

    #[test]
    fn test_proxy_password_defaults_to_empty() {
        let auth = proxy_credentials(&proxy(Some("user"), None)).expect("应当产生认证应答");
        assert_eq!(auth.password.as_deref(), Some(""));
    }
}
