// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// 视口尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

/// 客户端指纹
///
/// 一次浏览器会话对外呈现的全部客户端识别信号。
/// 在编排器构造时生成一次，会话生命周期内保持不变，
/// 使同一会话内的所有请求看起来来自同一个客户端。
#[derive(Debug, Clone, Serialize)]
pub struct ClientFingerprint {
    /// User-Agent 请求头
    pub user_agent: String,
    /// 浏览器视口尺寸
    pub viewport: ViewportSize,
    /// 区域标签，xx-XX 形式
    pub locale: String,
    /// IANA 时区名称
    pub timezone: String,
}

/// 指纹池条目，各字段之间内部一致（UA平台、区域与时区匹配）
struct FingerprintTemplate {
    user_agent: &'static str,
    width: u32,
    height: u32,
    locale: &'static str,
    timezone: &'static str,
}

const FINGERPRINT_POOL: &[FingerprintTemplate] = &[
    FingerprintTemplate {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        width: 1920,
        height: 1080,
        locale: "en-US",
        timezone: "America/New_York",
    },
    FingerprintTemplate {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
        width: 1680,
        height: 1050,
        locale: "en-US",
        timezone: "America/Los_Angeles",
    },
    FingerprintTemplate {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        width: 1536,
        height: 864,
        locale: "en-GB",
        timezone: "Europe/London",
    },
    FingerprintTemplate {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        width: 1440,
        height: 900,
        locale: "en-CA",
        timezone: "America/Toronto",
    },
    FingerprintTemplate {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36",
        width: 2560,
        height: 1440,
        locale: "en-AU",
        timezone: "Australia/Sydney",
    },
];

/// 伪随机生成一个貌似真实的桌面端客户端指纹
///
/// 每个会话只调用一次，保证会话内身份一致。
pub fn generate_fingerprint() -> ClientFingerprint {
    let template = &FINGERPRINT_POOL[rand::random_range(0..FINGERPRINT_POOL.len())];
    ClientFingerprint {
        user_agent: template.user_agent.to_string(),
        viewport: ViewportSize {
            width: template.width,
            height: template.height,
        },
        locale: template.locale.to_string(),
        timezone: template.timezone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_fingerprint_is_plausible() {
        let fp = generate_fingerprint();
        assert!(fp.user_agent.starts_with("Mozilla/5.0"));
        assert!(fp.viewport.width >= 1280);
        assert!(fp.viewport.height >= 720);
        assert!(!fp.timezone.is_empty());
    }

    #[test]
    fn test_locale_matches_expected_pattern() {
        let fp = generate_fingerprint();
        let bytes = fp.locale.as_bytes();
        assert_eq!(bytes.len(), 5);
        assert!(bytes[..2].iter().all(u8::is_ascii_lowercase));
        assert_eq!(bytes[2], b'-');
        assert!(bytes[3..].iter().all(u8::is_ascii_uppercase));
    }

    #[test]
    fn test_fingerprint_comes_from_one_pool_entry() {
        // UA、视口、区域、时区必须取自同一条目，保持内部一致
        let fp = generate_fingerprint();
        assert!(FINGERPRINT_POOL.iter().any(|t| {
            t.user_agent == fp.user_agent
                && t.width == fp.viewport.width
                && t.height == fp.viewport.height
                && t.locale == fp.locale
                && t.timezone == fp.timezone
        }));
    }
}
