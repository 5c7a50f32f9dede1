//! 规则引擎错误类型
//!
//! 求值过程本身从不返回这些错误（失败通过 `EvalResult` 表达），
//! 这里只覆盖求值之外的环节：AST 解码、规模限制和函数注册。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("AST JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("规则超出限制: {limit} 为 {actual}, 上限 {max}")]
    LimitExceeded {
        limit: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("函数名冲突: {0} 已注册")]
    FunctionConflict(String),
}

pub type Result<T> = std::result::Result<T, RuleError>;

/// 自定义函数执行失败
///
/// 由调用方提供的函数返回，求值器在调用点把它转换为
/// `Function <name> failed: <message>` 形式的 `EvalResult`。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FunctionFault {
    message: String,
}

impl FunctionFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for FunctionFault {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for FunctionFault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
