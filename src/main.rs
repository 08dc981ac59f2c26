// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use alicrawl::config::Settings;
use alicrawl::extractor::ProductExtractor;
use alicrawl::utils::telemetry;
use anyhow::Context;
use tracing::info;

/// 主函数
///
/// 接受一个商品页面URL参数，执行一次提取并输出JSON格式的商品记录
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();

    // 2. Load configuration
    let settings = Settings::new()?;

    let url = std::env::args()
        .nth(1)
        .context("用法: alicrawl <商品链接>")?;

    info!(%url, "开始提取商品数据");
    let extractor = ProductExtractor::new(settings.scraper);
    let result = extractor.extract_product(&url).await;
    extractor.close().await;

    let record = result?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
