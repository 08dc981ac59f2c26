// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 商品记录实体
///
/// 描述一次抓取时刻某个市场商品的规范化结构数据，
/// 供下游履约子系统消费。商品ID与来源URL保证非空，
/// 价格保证非负，货币为三位字母代码（无法检测时为 "USD"）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// 商品唯一标识符（市场侧ID，保留前导零）
    pub product_id: String,
    /// 商品标题（已清洗）
    pub title: String,
    /// 商品描述
    pub description: String,
    /// 当前售价
    pub price: f64,
    /// 原价（划线价，可选）
    pub original_price: Option<f64>,
    /// 货币代码，三位字母
    pub currency: String,
    /// 商品图片URL，保持页面顺序
    pub images: Vec<String>,
    /// 商品视频URL，保持页面顺序
    pub videos: Vec<String>,
    /// 商品变体列表，允许为空
    pub variants: Vec<Variant>,
    /// 规格参数，键值映射
    pub specifications: BTreeMap<String, String>,
    /// 物流选项列表
    pub shipping_options: Vec<ShippingOption>,
    /// 供应商信息
    pub supplier: Supplier,
    /// 库存状态
    pub stock: StockStatus,
    /// 来源URL（规范化后）
    pub source_url: String,
    /// 抓取时间戳
    pub scraped_at: DateTime<Utc>,
}

/// 商品变体
///
/// 同一商品的一个可选规格组合（如颜色、尺寸）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// 市场侧SKU标识符
    pub sku_id: String,
    /// 变体显示名称
    pub name: String,
    /// 属性映射，如 color → "Red"
    pub attributes: BTreeMap<String, String>,
    /// 该变体的价格
    pub price: f64,
    /// 该变体的库存数量
    pub stock: u32,
    /// 变体图片（可选）
    pub image: Option<String>,
}

/// 物流选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingOption {
    /// 物流方式名称
    pub name: String,
    /// 运费
    pub cost: f64,
    /// 预计送达天数
    pub delivery_days: u32,
    /// 承运商（可选）
    pub carrier: Option<String>,
}

/// 库存状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockStatus {
    /// 是否有货
    pub available: bool,
    /// 库存数量（页面未展示时为 None）
    pub count: Option<u32>,
}

impl Default for StockStatus {
    fn default() -> Self {
        Self {
            available: true,
            count: None,
        }
    }
}

/// 供应商信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Supplier {
    /// 供应商ID
    pub id: String,
    /// 店铺名称
    pub name: String,
    /// 店铺URL
    pub store_url: String,
    /// 店铺好评率（可选）
    pub rating: Option<f64>,
}
