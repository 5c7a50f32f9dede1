//! 可观测性模块集成测试
//!
//! 全局 subscriber 每个进程只能安装一次，所以这里只有一个测试安装它。

use rulekit_shared::config::AppConfig;
use rulekit_shared::observability::{self, ObservabilityConfig};

#[test]
fn test_init_once() {
    let config = ObservabilityConfig {
        log_level: "debug".to_string(),
        json_logs: true,
    };

    assert!(observability::init(&config).is_ok());
    tracing::info!(rule = "port == 8080", "subscriber installed");

    // 重复初始化返回错误而不是 panic
    assert!(observability::init(&config).is_err());
}

#[test]
fn test_env_filter_fallback() {
    use rulekit_shared::observability::tracing::build_filter;

    // RUST_LOG 优先
    assert_eq!(build_filter(Some("warn"), "debug").to_string(), "warn");
    // 没有 RUST_LOG 时使用配置的级别
    assert_eq!(build_filter(None, "debug").to_string(), "debug");
    // RUST_LOG 无法解析时使用配置的级别
    assert_eq!(build_filter(Some("rule_engine=bogus"), "debug").to_string(), "debug");
    // 都无法解析时回退到 info
    assert_eq!(build_filter(None, "rule_engine=bogus").to_string(), "info");
}

#[test]
fn test_config_feeds_observability() {
    let config = AppConfig::from_toml_str(
        "rule-gateway",
        "[observability]\nlog_level = \"rule_engine=trace\"\n",
    )
    .unwrap();

    assert_eq!(config.observability.log_level, "rule_engine=trace");
    assert!(!config.observability.json_logs);
}
