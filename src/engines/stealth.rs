// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::fingerprint::ClientFingerprint;
use crate::utils::errors::ScrapeError;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;

/// 反自动化检测脚本注入接口
///
/// 注入行为与具体自动化后端强相关，因此做成可插拔的初始化步骤，
/// 由编排器在任何导航发生之前对会话调用，便于按后端替换实现。
#[async_trait]
pub trait StealthInjector: Send + Sync {
    /// 在任何页面脚本运行之前安装伪装脚本
    async fn install(&self, page: &Page, fingerprint: &ClientFingerprint)
        -> Result<(), ScrapeError>;
}

/// 基于 CDP 的默认实现
///
/// 通过 `Page.addScriptToEvaluateOnNewDocument` 在导航前注入：
/// 抹除 webdriver 标志、上报合理的插件数量、按指纹上报语言列表、
/// 提供无害的 chrome 命名空间桩、规范化权限查询
pub struct CdpStealth;

#[async_trait]
impl StealthInjector for CdpStealth {
    async fn install(
        &self,
        page: &Page,
        fingerprint: &ClientFingerprint,
    ) -> Result<(), ScrapeError> {
        let script = build_stealth_script(fingerprint);
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(script))
            .await
            .map_err(|e| ScrapeError::Browser(format!("注入伪装脚本失败: {}", e)))?;
        Ok(())
    }
}

fn build_stealth_script(fingerprint: &ClientFingerprint) -> String {
    let locale = &fingerprint.locale;
    let language = &locale[..2];
    format!(
        r#"
Object.defineProperty(navigator, 'webdriver', {{ get: () => undefined }});
Object.defineProperty(navigator, 'plugins', {{ get: () => [1, 2, 3, 4, 5] }});
Object.defineProperty(navigator, 'languages', {{ get: () => ['{locale}', '{language}'] }});
window.chrome = {{ runtime: {{}} }};
const originalQuery = window.navigator.permissions.query.bind(window.navigator.permissions);
window.navigator.permissions.query = (parameters) => (
    parameters.name === 'notifications'
        ? Promise.resolve({{ state: Notification.permission }})
        : originalQuery(parameters)
);
"#
    )
}
