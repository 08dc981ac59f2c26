// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 规范化后的商品页主机名
const CANONICAL_HOST: &str = "www.aliexpress.com";

/// 判断主机是否属于市场已知域名族
///
/// 覆盖主站、移动站（m.）与各区域子站（es. / fr. / pt. 等）
fn is_marketplace_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "aliexpress.com"
        || host.ends_with(".aliexpress.com")
        || host == "aliexpress.us"
        || host.ends_with(".aliexpress.us")
        || host == "aliexpress.ru"
        || host.ends_with(".aliexpress.ru")
}

/// 判断URL是否为有效的商品来源链接
///
/// 仅当URL为绝对的HTTP(S)地址、主机属于市场域名族、
/// 且能从中定位商品ID时返回 true。空输入返回 false，不会panic。
pub fn is_valid_source_url(url: &str) -> bool {
    let parsed = match Url::parse(url.trim()) {
        Ok(u) => u,
        Err(_) => return false,
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    match parsed.host_str() {
        Some(host) if is_marketplace_host(host) => extract_product_id(url).is_some(),
        _ => false,
    }
}

/// 从商品URL中提取商品ID
///
/// 识别路径模式 `/item/<id>.html`、`/item/<id>`、`/product/<id>.html`、
/// `/product/<id>`，以及查询参数 `productId=<id>`。
/// ID按不透明字符串处理，保留前导零与任意长度；无法匹配时返回 None。
pub fn extract_product_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;

    if let Some(segments) = parsed.path_segments() {
        let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
        for window in segments.windows(2) {
            if matches!(window[0], "item" | "product") {
                let id = window[1].strip_suffix(".html").unwrap_or(window[1]);
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        }
    }

    parsed
        .query_pairs()
        .find(|(key, value)| key == "productId" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// 将任意可识别的商品URL重写为规范形式
///
/// 移动站/区域站主机统一改写为规范主机，路径统一为
/// `/item/<id>.html`。幂等：对已规范化的URL返回原字符串。
/// 无法推导商品ID时返回 None。
pub fn normalize_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;
    if !is_marketplace_host(host) {
        return None;
    }
    let id = extract_product_id(url)?;
    Some(format!("https://{}/item/{}.html", CANONICAL_HOST, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_item_url() {
        assert!(is_valid_source_url(
            "https://www.aliexpress.com/item/1005001234567890.html"
        ));
        assert!(is_valid_source_url(
            "http://aliexpress.com/item/1005001234567890"
        ));
    }

    #[test]
    fn test_valid_regional_and_mobile_hosts() {
        assert!(is_valid_source_url(
            "https://m.aliexpress.com/item/1005001.html"
        ));
        assert!(is_valid_source_url(
            "https://es.aliexpress.com/item/1005001.html"
        ));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_source_url(""));
        assert!(!is_valid_source_url("not a url"));
        assert!(!is_valid_source_url("ftp://www.aliexpress.com/item/1.html"));
        assert!(!is_valid_source_url("https://www.amazon.com/item/1.html"));
        // 类目页没有可提取的商品ID
        assert!(!is_valid_source_url(
            "https://www.aliexpress.com/category/100003109/dresses.html"
        ));
    }

    #[test]
    fn test_extract_product_id_path_patterns() {
        assert_eq!(
            extract_product_id("https://www.aliexpress.com/item/123456.html"),
            Some("123456".to_string())
        );
        assert_eq!(
            extract_product_id("https://www.aliexpress.com/item/123456"),
            Some("123456".to_string())
        );
        assert_eq!(
            extract_product_id("https://www.aliexpress.com/product/987.html"),
            Some("987".to_string())
        );
        assert_eq!(
            extract_product_id("https://www.aliexpress.com/product/987"),
            Some("987".to_string())
        );
    }

    #[test]
    fn test_extract_product_id_query_param() {
        assert_eq!(
            extract_product_id("https://m.aliexpress.com/detail.htm?productId=445566"),
            Some("445566".to_string())
        );
    }

    #[test]
    fn test_extract_product_id_preserves_leading_zeros() {
        assert_eq!(
            extract_product_id("https://www.aliexpress.com/item/0012345.html"),
            Some("0012345".to_string())
        );
    }

    #[test]
    fn test_extract_product_id_no_match() {
        assert_eq!(extract_product_id(""), None);
        assert_eq!(
            extract_product_id("https://www.aliexpress.com/store/912345"),
            None
        );
    }

    #[test]
    fn test_normalize_url_rewrites_to_canonical_form() {
        let canonical = "https://www.aliexpress.com/item/123456.html";
        assert_eq!(
            normalize_url("https://m.aliexpress.com/item/123456").as_deref(),
            Some(canonical)
        );
        assert_eq!(
            normalize_url("https://es.aliexpress.com/item/123456.html?spm=a2g0o").as_deref(),
            Some(canonical)
        );
        assert_eq!(
            normalize_url("http://aliexpress.com/product/123456").as_deref(),
            Some(canonical)
        );
    }

    #[test]
    fn test_normalize_url_is_idempotent() {
        let once = normalize_url("https://m.aliexpress.com/item/123456").unwrap();
        let twice = normalize_url(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_url_rejects_underivable_ids() {
        assert_eq!(normalize_url(""), None);
        assert_eq!(
            normalize_url("https://www.aliexpress.com/category/15/home.html"),
            None
        );
        assert_eq!(normalize_url("https://www.example.com/item/123.html"), None);
    }
}
