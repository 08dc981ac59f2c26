// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

/// 方括号/圆括号包裹的促销短语，如 [HOT SALE]、(free shipping)
static PROMO_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").expect("促销短语正则应当合法"));

/// 价格文本中的第一个数字片段
static PRICE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("价格正则应当合法"));

/// 清洗抓取到的商品标题
///
/// 依次执行：去除括号促销短语、删除 `字母/数字/空白/.,'&-` 以外的字符、
/// 合并连续空白、对每个单词做首字母大写。被删除的字符不留空位，
/// 不会把一个单词拆成两个。空输入返回空字符串，不限制最大长度。
pub fn clean_title(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let without_promo = PROMO_PHRASE.replace_all(raw, " ");
    let filtered: String = without_promo
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ".,'&-".contains(*c))
        .collect();

    filtered
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// 解析抓取到的价格文本
///
/// 去除货币符号/前后缀（`$`、`US $`、`€`、`£`、`¥`、尾随三位货币代码）
/// 与千位分隔符后，解析文本中出现的第一个数字片段。
/// 空输入或无数字时返回 0。
///
/// 兼容性说明（与上游消费方保持一致，勿静默修改）：
/// - 前导负号被忽略，结果恒 ≥ 0
/// - 含多个数字片段的文本（"Was $50 Now $13"）取第一个
/// - 含两个小数点的文本取到第一个合法小数点为止
pub fn parse_price(raw: &str) -> f64 {
    if raw.trim().is_empty() {
        return 0.0;
    }

    // 千位分隔符直接剔除，货币符号与字母由数字匹配天然跳过
    let without_grouping = raw.replace(',', "");
    PRICE_TOKEN
        .find(&without_grouping)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}
