// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 引擎模块
///
/// 封装浏览器自动化后端：会话生命周期、客户端指纹与
/// 反自动化检测脚本注入
pub mod browser;
pub mod fingerprint;
pub mod stealth;

pub use browser::BrowserSession;
pub use fingerprint::{generate_fingerprint, ClientFingerprint, ViewportSize};
pub use stealth::{CdpStealth, StealthInjector};
