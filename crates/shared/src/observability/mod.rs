//! 统一可观测性模块
//!
//! 所有嵌入规则引擎的服务通过单一入口点初始化日志，确保一致的输出格式。

pub mod tracing;

pub use crate::config::ObservabilityConfig;

use ::tracing::info;
use anyhow::Result;

/// 统一初始化可观测性
///
/// 全局 subscriber 只能安装一次，重复调用返回错误。
///
/// # Example
///
/// ```ignore
/// use rulekit_shared::config::AppConfig;
/// use rulekit_shared::observability;
///
/// fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("rule-gateway")?;
///     observability::init(&config.observability)?;
///
///     // 应用逻辑...
///
///     Ok(())
/// }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;

    info!(
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Observability initialized"
    );

    Ok(())
}
