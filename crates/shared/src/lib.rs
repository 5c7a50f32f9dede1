//! 共享库
//!
//! 包含嵌入规则引擎的服务共用的配置加载和日志初始化代码。

pub mod config;
pub mod observability;
