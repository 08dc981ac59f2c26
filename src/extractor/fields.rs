// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 逐字段提取策略
//!
//! 每个字段维护一组按优先级排列的互相独立的提取策略：
//! CSS选择器 → 页面内嵌的 runParams 数据 → JSON-LD 结构化数据 →
//! meta 标签。第一个非空结果胜出；全部落空时取安全默认值
//! （空串/空列表/零/有货），绝不向上抛错。

use crate::domain::models::{ShippingOption, StockStatus, Supplier, Variant};
use crate::utils::text_processing::{clean_title, parse_price};
use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::BTreeMap;

/// 一次页面提取得到的全部字段
#[derive(Debug, Clone)]
pub struct ExtractedFields {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub currency: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub variants: Vec<Variant>,
    pub specifications: BTreeMap<String, String>,
    pub shipping_options: Vec<ShippingOption>,
    pub supplier: Supplier,
    pub stock: StockStatus,
}

/// 从页面HTML中提取全部商品字段
///
/// 各字段互相独立：任何一个字段的全部策略落空只影响它自己，
/// 其余字段照常提取。
pub fn extract_fields(html: &str) -> ExtractedFields {
    let doc = Html::parse_document(html);
    let run_params = extract_run_params(html);
    let structured = extract_structured_product(&doc);

    let rp = run_params.as_ref();
    let ld = structured.as_ref();

    let price = extract_price(&doc, rp, ld);
    ExtractedFields {
        title: extract_title(&doc, rp, ld),
        description: extract_description(&doc, rp, ld),
        price,
        original_price: extract_original_price(&doc, rp).filter(|p| *p > 0.0),
        currency: extract_currency(&doc, rp, ld),
        images: extract_images(&doc, rp, ld),
        videos: extract_videos(&doc, rp),
        variants: extract_variants(rp),
        specifications: extract_specifications(&doc, rp),
        shipping_options: extract_shipping_options(&doc, rp),
        supplier: extract_supplier(&doc, rp),
        stock: extract_stock(&doc, rp),
    }
}

// ---------------------------------------------------------------------------
// 页面内嵌数据源
// ---------------------------------------------------------------------------

/// 提取页面内嵌的 `window.runParams` 数据对象
fn extract_run_params(html: &str) -> Option<Value> {
    let start = html.find("window.runParams")?;
    let brace = html[start..].find('{')? + start;
    let object = balanced_json_object(&html[brace..])?;
    serde_json::from_str(object).ok()
}

/// 从 `input` 开头截取一个大括号配平的JSON对象
fn balanced_json_object(input: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, c) in input.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[..=index]);
                }
            }
            _ => {}
        }
    }
    None
}

/// 提取 JSON-LD 结构化数据中 @type 为 Product 的对象
fn extract_structured_product(doc: &Html) -> Option<Value> {
    let selector = Selector::parse("script[type='application/ld+json']").ok()?;
    for element in doc.select(&selector) {
        let raw = element.text().collect::<String>();
        let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        let candidates: Vec<&Value> = match &parsed {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        for candidate in candidates {
            if candidate.get("@type").and_then(Value::as_str) == Some("Product") {
                return Some(candidate.clone());
            }
        }
    }
    None
}

/// 在 runParams 中按路径取值，兼容带/不带顶层 `data` 包装的两种形态
fn rp_value<'a>(run_params: &'a Value, path: &[&str]) -> Option<&'a Value> {
    if let Some(found) = run_params.get("data").and_then(|data| walk(data, path)) {
        return Some(found);
    }
    walk(run_params, path)
}

fn walk<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// 将JSON值解析为价格数字；无数字的字符串视为未命中
fn value_as_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.bytes().any(|b| b.is_ascii_digit()) => Some(parse_price(s)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CSS 选择器工具
// ---------------------------------------------------------------------------

/// 按优先级尝试一组选择器，返回第一个非空文本
fn first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(element) = doc.select(&selector).next() {
            let text = element
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// 按优先级尝试一组 (选择器, 属性)，返回第一个非空属性值
fn first_attr(doc: &Html, selectors: &[(&str, &str)]) -> Option<String> {
    for (raw, attr) in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(value) = doc
            .select(&selector)
            .find_map(|element| element.value().attr(attr))
        {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// 收集某个选择器命中的全部属性值
fn all_attrs(doc: &Html, raw: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(raw) else {
        return Vec::new();
    };
    doc.select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// 补全协议相对URL
fn absolutize(url: &str) -> String {
    if let Some(stripped) = url.strip_prefix("//") {
        format!("https://{}", stripped)
    } else {
        url.to_string()
    }
}

/// 顺序去重
fn dedupe(urls: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// 字段提取器
// ---------------------------------------------------------------------------

fn extract_title(doc: &Html, rp: Option<&Value>, ld: Option<&Value>) -> String {
    let raw = first_text(
        doc,
        &[
            ".product-title-text",
            "h1[data-pl='product-title']",
            "h1",
        ],
    )
    .or_else(|| {
        rp.and_then(|v| rp_value(v, &["titleModule", "subject"]))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
    .or_else(|| {
        ld.and_then(|v| v.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
    .or_else(|| first_attr(doc, &[("meta[property='og:title']", "content")]))
    .unwrap_or_default();

    clean_title(&raw)
}

fn extract_description(doc: &Html, rp: Option<&Value>, ld: Option<&Value>) -> String {
    first_text(
        doc,
        &[
            "#product-description",
            ".product-description",
            "[data-pl='product-description']",
        ],
    )
    .or_else(|| {
        ld.and_then(|v| v.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
    .or_else(|| {
        rp.and_then(|v| rp_value(v, &["pageModule", "description"]))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
    .or_else(|| first_attr(doc, &[("meta[name='description']", "content")]))
    .unwrap_or_default()
}

fn extract_price(doc: &Html, rp: Option<&Value>, ld: Option<&Value>) -> f64 {
    first_text(
        doc,
        &[
            ".product-price-value",
            ".uniform-banner-box-price",
            "[itemprop='price']",
        ],
    )
    .map(|text| parse_price(&text))
    .filter(|price| *price > 0.0)
    .or_else(|| {
        let rp = rp?;
        rp_value(rp, &["priceModule", "formatedActivityPrice"])
            .or_else(|| rp_value(rp, &["priceModule", "formatedPrice"]))
            .or_else(|| rp_value(rp, &["priceModule", "minActivityAmount", "value"]))
            .or_else(|| rp_value(rp, &["priceModule", "minAmount", "value"]))
            .and_then(value_as_price)
            .filter(|price| *price > 0.0)
    })
    .or_else(|| {
        let offers = ld?.get("offers")?;
        offers
            .get("price")
            .or_else(|| offers.get("lowPrice"))
            .and_then(value_as_price)
    })
    .unwrap_or(0.0)
}

fn extract_original_price(doc: &Html, rp: Option<&Value>) -> Option<f64> {
    first_text(
        doc,
        &[".product-price-original", ".price-original", "del"],
    )
    .map(|text| parse_price(&text))
    .or_else(|| {
        let rp = rp?;
        // 存在活动价时，formatedPrice 才是划线原价
        rp_value(rp, &["priceModule", "formatedActivityPrice"])?;
        rp_value(rp, &["priceModule", "formatedPrice"]).and_then(value_as_price)
    })
}

fn extract_currency(doc: &Html, rp: Option<&Value>, ld: Option<&Value>) -> String {
    let candidate = ld
        .and_then(|v| walk(v, &["offers", "priceCurrency"]))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            rp.and_then(|v| rp_value(v, &["webEnv", "currency"]))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .or_else(|| {
            // 从价格文本中的货币符号推断
            let text = first_text(
                doc,
                &[".product-price-value", ".uniform-banner-box-price"],
            )?;
            let code = if text.contains('€') {
                "EUR"
            } else if text.contains('£') {
                "GBP"
            } else if text.contains('¥') {
                "CNY"
            } else if text.contains('$') {
                "USD"
            } else {
                return None;
            };
            Some(code.to_string())
        });

    match candidate {
        Some(code) if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) => {
            code.to_ascii_uppercase()
        }
        _ => "USD".to_string(),
    }
}

fn extract_images(doc: &Html, rp: Option<&Value>, ld: Option<&Value>) -> Vec<String> {
    let from_gallery = all_attrs(doc, ".images-view-item img", "src");
    let collected = if !from_gallery.is_empty() {
        from_gallery
    } else if let Some(list) = rp
        .and_then(|v| rp_value(v, &["imageModule", "imagePathList"]))
        .and_then(Value::as_array)
    {
        list.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    } else if let Some(image) = ld.and_then(|v| v.get("image")) {
        match image {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Value::String(single) => vec![single.clone()],
            _ => Vec::new(),
        }
    } else {
        first_attr(doc, &[("meta[property='og:image']", "content")])
            .map(|url| vec![url])
            .unwrap_or_default()
    };

    dedupe(collected.iter().map(|url| absolutize(url)).collect())
}

fn extract_videos(doc: &Html, rp: Option<&Value>) -> Vec<String> {
    let mut collected = all_attrs(doc, "video source[src]", "src");
    collected.extend(all_attrs(doc, "video[src]", "src"));
    if collected.is_empty() {
        if let Some(url) = rp
            .and_then(|v| rp_value(v, &["videoModule", "videoUrl"]))
            .and_then(Value::as_str)
        {
            collected.push(url.to_string());
        }
    }
    dedupe(collected.iter().map(|url| absolutize(url)).collect())
}

fn extract_variants(rp: Option<&Value>) -> Vec<Variant> {
    let Some(rp) = rp else {
        return Vec::new();
    };
    let Some(price_list) = rp_value(rp, &["skuModule", "skuPriceList"]).and_then(Value::as_array)
    else {
        return Vec::new();
    };

    // 属性值ID → (属性名, 显示值, 变体图)
    let mut properties: BTreeMap<String, (String, String, Option<String>)> = BTreeMap::new();
    if let Some(list) =
        rp_value(rp, &["skuModule", "productSKUPropertyList"]).and_then(Value::as_array)
    {
        for property in list {
            let name = property
                .get("skuPropertyName")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let Some(values) = property.get("skuPropertyValues").and_then(Value::as_array) else {
                continue;
            };
            for value in values {
                let Some(id) = value.get("propertyValueId") else {
                    continue;
                };
                let display = value
                    .get("propertyValueDisplayName")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let image = value
                    .get("skuPropertyImagePath")
                    .and_then(Value::as_str)
                    .map(absolutize);
                properties.insert(
                    json_id_to_string(id),
                    (name.to_string(), display.to_string(), image),
                );
            }
        }
    }

    price_list
        .iter()
        .filter_map(|entry| {
            let sku_id = entry.get("skuId").map(json_id_to_string)?;
            let price = entry
                .get("skuVal")
                .and_then(|v| {
                    walk(v, &["skuActivityAmount", "value"])
                        .or_else(|| walk(v, &["skuAmount", "value"]))
                })
                .and_then(value_as_price)
                .unwrap_or(0.0);
            let stock = entry
                .get("skuVal")
                .and_then(|v| v.get("availQuantity"))
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32;

            let mut attributes = BTreeMap::new();
            let mut names = Vec::new();
            let mut image = None;
            if let Some(attr) = entry.get("skuAttr").and_then(Value::as_str) {
                // 形如 "14:29#Black;5:361385"
                for part in attr.split(';') {
                    let pair = part.split('#').next().unwrap_or(part);
                    let value_id = pair.split(':').nth(1).unwrap_or_default();
                    let inline_display = part.split('#').nth(1);
                    if let Some((name, display, prop_image)) = properties.get(value_id) {
                        let shown = inline_display.unwrap_or(display);
                        attributes.insert(name.clone(), shown.to_string());
                        names.push(shown.to_string());
                        if image.is_none() {
                            image = prop_image.clone();
                        }
                    } else if let Some(shown) = inline_display {
                        names.push(shown.to_string());
                    }
                }
            }

            Some(Variant {
                sku_id,
                name: names.join(" / "),
                attributes,
                price,
                stock,
                image,
            })
        })
        .collect()
}

fn json_id_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn extract_specifications(doc: &Html, rp: Option<&Value>) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();

    if let (Ok(item_sel), Ok(title_sel), Ok(desc_sel)) = (
        Selector::parse(".product-property-list .property-item"),
        Selector::parse(".propery-title"),
        Selector::parse(".propery-des"),
    ) {
        for item in doc.select(&item_sel) {
            let key = item
                .select(&title_sel)
                .next()
                .map(|e| e.text().collect::<String>().trim().trim_end_matches(':').to_string());
            let value = item
                .select(&desc_sel)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string());
            if let (Some(key), Some(value)) = (key, value) {
                if !key.is_empty() && !value.is_empty() {
                    specs.insert(key, value);
                }
            }
        }
    }

    if specs.is_empty() {
        if let Some(props) = rp
            .and_then(|v| rp_value(v, &["specsModule", "props"]))
            .and_then(Value::as_array)
        {
            for prop in props {
                let key = prop.get("attrName").and_then(Value::as_str);
                let value = prop.get("attrValue").and_then(Value::as_str);
                if let (Some(key), Some(value)) = (key, value) {
                    specs.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    specs
}

fn extract_shipping_options(doc: &Html, rp: Option<&Value>) -> Vec<ShippingOption> {
    if let Some(freight) =
        rp.and_then(|v| rp_value(v, &["shippingModule", "freightCalculateInfo", "freight"]))
    {
        let cost = freight
            .get("freightAmount")
            .and_then(|v| v.get("value"))
            .and_then(value_as_price)
            .unwrap_or(0.0);
        let carrier = freight
            .get("company")
            .and_then(Value::as_str)
            .map(str::to_string);
        let delivery_days = freight
            .get("time")
            .and_then(Value::as_str)
            .and_then(parse_delivery_days)
            .unwrap_or(15);
        let name = carrier.clone().unwrap_or_else(|| "Standard Shipping".to_string());
        return vec![ShippingOption {
            name,
            cost: cost.max(0.0),
            delivery_days,
            carrier,
        }];
    }

    if let Some(text) = first_text(doc, &[".dynamic-shipping-line", ".product-shipping"]) {
        let cost = if text.to_lowercase().contains("free") {
            0.0
        } else {
            parse_price(&text)
        };
        return vec![ShippingOption {
            name: "Standard Shipping".to_string(),
            cost,
            delivery_days: parse_delivery_days(&text).unwrap_or(15),
            carrier: None,
        }];
    }

    Vec::new()
}

/// 从 "12-20" 或 "20 days" 一类的文本中取送达天数（取区间上界）
fn parse_delivery_days(text: &str) -> Option<u32> {
    let digits: Vec<u32> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect();
    digits.into_iter().max().filter(|days| *days > 0)
}

fn extract_supplier(doc: &Html, rp: Option<&Value>) -> Supplier {
    if let Some(store) = rp.and_then(|v| rp_value(v, &["storeModule"])) {
        let id = store
            .get("storeNum")
            .map(json_id_to_string)
            .unwrap_or_default();
        let name = store
            .get("storeName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let store_url = store
            .get("storeURL")
            .and_then(Value::as_str)
            .map(absolutize)
            .unwrap_or_default();
        let rating = store
            .get("positiveRate")
            .and_then(Value::as_str)
            .and_then(|rate| rate.trim_end_matches('%').parse::<f64>().ok());
        if !id.is_empty() || !name.is_empty() {
            return Supplier {
                id,
                name,
                store_url,
                rating,
            };
        }
    }

    let name = first_text(doc, &[".shop-name a", ".store-name"]).unwrap_or_default();
    let store_url = first_attr(doc, &[(".shop-name a", "href")])
        .map(|href| absolutize(&href))
        .unwrap_or_default();
    let id = store_url
        .rsplit('/')
        .next()
        .map(|tail| {
            tail.chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .unwrap_or_default();

    Supplier {
        id,
        name,
        store_url,
        rating: None,
    }
}

fn extract_stock(doc: &Html, rp: Option<&Value>) -> StockStatus {
    if let Some(quantity) = rp
        .and_then(|v| rp_value(v, &["quantityModule", "totalAvailQuantity"]))
        .and_then(Value::as_u64)
    {
        return StockStatus {
            available: quantity > 0,
            count: Some(quantity as u32),
        };
    }

    if let Some(text) = first_text(doc, &[".product-quantity-tip"]) {
        let count = text
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| !part.is_empty())
            .and_then(|part| part.parse::<u32>().ok());
        if let Some(count) = count {
            return StockStatus {
                available: count > 0,
                count: Some(count),
            };
        }
    }

    StockStatus::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_params_extraction_handles_nested_braces() {
        let html = r#"<script>window.runParams = {"data":{"titleModule":{"subject":"red {cool} dress"}}};</script>"#;
        let rp = extract_run_params(html).unwrap();
        assert_eq!(
            rp_value(&rp, &["titleModule", "subject"])
                .and_then(Value::as_str),
            Some("red {cool} dress")
        );
    }

    #[test]
    fn test_structured_data_price_wins_when_selectors_miss() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type":"Product","name":"Test Item","offers":{"price":"19.99","priceCurrency":"EUR"}}
            </script>
            </head><body><div class="unrelated">no price here</div></body></html>"#;

        let fields = extract_fields(html);
        assert_eq!(fields.price, 19.99);
        assert_eq!(fields.currency, "EUR");
    }

    #[test]
    fn test_css_price_takes_priority_over_embedded_data() {
        let html = r#"<html><body>
            <div class="product-price-value">US $7.50</div>
            <script>window.runParams = {"data":{"priceModule":{"formatedActivityPrice":"US $9.99"}}};</script>
            </body></html>"#;

        let fields = extract_fields(html);
        assert_eq!(fields.price, 7.5);
    }

    #[test]
    fn test_title_is_cleaned() {
        let html = r#"<html><body><h1 class="product-title-text">[HOT SALE] baby dress (free shipping)</h1></body></html>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.title, "Baby Dress");
    }

    #[test]
    fn test_images_from_run_params_are_absolutized_and_deduped() {
        let html = r#"<script>window.runParams = {"data":{"imageModule":{"imagePathList":
            ["//ae01.alicdn.com/kf/a.jpg","//ae01.alicdn.com/kf/a.jpg","https://ae01.alicdn.com/kf/b.jpg"]}}};</script>"#;

        let fields = extract_fields(html);
        assert_eq!(
            fields.images,
            vec![
                "https://ae01.alicdn.com/kf/a.jpg".to_string(),
                "https://ae01.alicdn.com/kf/b.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_variants_from_sku_module() {
        let html = r#"<script>window.runParams = {"data":{"skuModule":{
            "productSKUPropertyList":[{"skuPropertyName":"Color","skuPropertyValues":[
                {"propertyValueId":29,"propertyValueDisplayName":"Black","skuPropertyImagePath":"//ae01.alicdn.com/kf/black.jpg"},
                {"propertyValueId":30,"propertyValueDisplayName":"White"}]}],
            "skuPriceList":[
                {"skuId":12345,"skuAttr":"14:29#Black","skuVal":{"skuAmount":{"value":11.5},"availQuantity":42}},
                {"skuId":12346,"skuAttr":"14:30","skuVal":{"skuAmount":{"value":12.0},"availQuantity":0}}]
        }}};</script>"#;

        let fields = extract_fields(html);
        assert_eq!(fields.variants.len(), 2);

        let black = &fields.variants[0];
        assert_eq!(black.sku_id, "12345");
        assert_eq!(black.attributes.get("Color").unwrap(), "Black");
        assert_eq!(black.price, 11.5);
        assert_eq!(black.stock, 42);
        assert_eq!(
            black.image.as_deref(),
            Some("https://ae01.alicdn.com/kf/black.jpg")
        );

        let white = &fields.variants[1];
        assert_eq!(white.attributes.get("Color").unwrap(), "White");
        assert_eq!(white.stock, 0);
    }

    #[test]
    fn test_missing_everything_degrades_to_defaults() {
        let fields = extract_fields("<html><body><p>empty page</p></body></html>");

        assert_eq!(fields.title, "");
        assert_eq!(fields.price, 0.0);
        assert_eq!(fields.currency, "USD");
        assert!(fields.images.is_empty());
        assert!(fields.variants.is_empty());
        assert!(fields.shipping_options.is_empty());
        assert!(fields.stock.available);
        assert!(fields.stock.count.is_none());
    }

    #[test]
    fn test_shipping_from_run_params() {
        let html = r#"<script>window.runParams = {"data":{"shippingModule":{"freightCalculateInfo":{"freight":
            {"freightAmount":{"value":2.5},"company":"AliExpress Standard Shipping","time":"12-20"}}}}};</script>"#;

        let fields = extract_fields(html);
        assert_eq!(fields.shipping_options.len(), 1);
        let option = &fields.shipping_options[0];
        assert_eq!(option.cost, 2.5);
        assert_eq!(option.delivery_days, 20);
        assert_eq!(option.carrier.as_deref(), Some("AliExpress Standard Shipping"));
    }

    #[test]
    fn test_supplier_and_stock_from_run_params() {
        let html = r#"<script>window.runParams = {"data":{
            "storeModule":{"storeNum":912345,"storeName":"Best Baby Store","storeURL":"//www.aliexpress.com/store/912345","positiveRate":"97.6%"},
            "quantityModule":{"totalAvailQuantity":128}}};</script>"#;

        let fields = extract_fields(html);
        assert_eq!(fields.supplier.id, "912345");
        assert_eq!(fields.supplier.name, "Best Baby Store");
        assert_eq!(fields.supplier.rating, Some(97.6));
        assert!(fields.stock.available);
        assert_eq!(fields.stock.count, Some(128));
    }
}
