// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含商品提取器的全部可调参数
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 提取器配置
    pub scraper: ScraperSettings,
}

/// 提取器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 是否以无头模式运行浏览器
    pub headless: bool,
    /// 对外请求的最小间隔（毫秒）
    pub min_request_interval_ms: u64,
    /// 页面加载失败后的最大重试次数
    pub max_retries: u32,
    /// 页面导航超时时间（毫秒）
    pub navigation_timeout_ms: u64,
    /// 出站代理配置（可选）
    pub proxy: Option<ProxySettings>,
}

/// 出站代理配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySettings {
    /// 代理服务器地址，如 http://127.0.0.1:8080
    pub url: String,
    /// 代理认证用户名（可选）
    pub username: Option<String>,
    /// 代理认证密码（可选）
    pub password: Option<String>,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            headless: true,
            min_request_interval_ms: 3000,
            max_retries: 3,
            navigation_timeout_ms: 30000,
            proxy: None,
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("scraper.headless", true)?
            .set_default("scraper.min_request_interval_ms", 3000)?
            .set_default("scraper.max_retries", 3)?
            .set_default("scraper.navigation_timeout_ms", 30000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("ALICRAWL").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ScraperSettings::default();
        assert!(settings.headless);
        assert_eq!(settings.min_request_interval_ms, 3000);
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.navigation_timeout_ms, 30000);
        assert!(settings.proxy.is_none());
    }

    #[test]
    fn test_settings_from_defaults() {
        let settings = Settings::new().expect("默认配置应当可加载");
        assert_eq!(
            settings.scraper.min_request_interval_ms,
            ScraperSettings::default().min_request_interval_ms
        );
    }
}
