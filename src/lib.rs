// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体（商品记录、变体、物流选项等）
pub mod domain;

/// 引擎模块
///
/// 浏览器会话、客户端指纹与反自动化检测脚本
pub mod engines;

/// 提取模块
///
/// 商品页面提取流水线（编排器与逐字段提取策略）
pub mod extractor;

/// 队列模块
///
/// 单飞请求队列，保证同一时刻只有一个请求在执行
pub mod queue;

/// 工具模块
///
/// 提供URL处理、文本清洗、限速、重试等通用功能
pub mod utils;
