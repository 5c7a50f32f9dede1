//! 规则编译器
//!
//! 解码解析器输出的 AST，并在交给求值器之前检查树的规模。
//! 求值器本身是递归实现，过深的树只能在这里拦截。
//! 编译器不做语义校验：未知操作符、缺失操作数等问题在求值时才暴露。

use crate::error::{Result, RuleError};
use crate::models::AstNode;
use crate::rule::Rule;
use rulekit_shared::config::LimitsConfig;
use tracing::{debug, instrument};

/// 规则编译器
#[derive(Debug, Clone, Default)]
pub struct RuleCompiler {
    limits: LimitsConfig,
}

impl RuleCompiler {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// 从 JSON 字符串编译规则
    pub fn compile_from_json(&self, json: &str) -> Result<Rule> {
        let root: AstNode = serde_json::from_str(json)?;
        self.compile(root)
    }

    /// 编译规则
    #[instrument(skip_all)]
    pub fn compile(&self, root: AstNode) -> Result<Rule> {
        self.check_limits(&root)?;

        let rule = Rule::new(root);
        debug!(fields = rule.required_fields().len(), "规则编译完成");
        Ok(rule)
    }

    fn check_limits(&self, root: &AstNode) -> Result<()> {
        let depth = root.depth();
        if depth > self.limits.max_depth {
            return Err(RuleError::LimitExceeded {
                limit: "depth",
                actual: depth,
                max: self.limits.max_depth,
            });
        }

        let nodes = root.node_count();
        if nodes > self.limits.max_nodes {
            return Err(RuleError::LimitExceeded {
                limit: "nodes",
                actual: nodes,
                max: self.limits.max_nodes,
            });
        }

        Ok(())
    }
}
