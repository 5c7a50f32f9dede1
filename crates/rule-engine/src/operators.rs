//! 规则操作符定义
//!
//! AST 中的操作符以字符串形式交换，这里把它收敛为封闭枚举，
//! 同时兼容规范名（`eq`）和符号别名（`==`）。无法识别的操作符原样保留。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 操作符
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    // 比较
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,

    // 包含 / 匹配
    Contains,
    Matches,
    In,

    // 逻辑
    And,
    Or,
    Not,

    /// 外部解析器产出的未知操作符
    Other(String),
}

impl Operator {
    /// 规范名称，即 AST JSON 中使用的形式
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Contains => "contains",
            Self::Matches => "matches",
            Self::In => "in",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Other(op) => op,
        }
    }

    /// 规则文本中的写法
    ///
    /// 比较操作符使用符号形式，`contains` / `in` 与逻辑操作符保留单词形式。
    pub fn symbol(&self) -> &str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Matches => "=~",
            other => other.as_str(),
        }
    }
}

impl FromStr for Operator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "eq" | "==" => Self::Eq,
            "ne" | "!=" => Self::Ne,
            "gt" | ">" => Self::Gt,
            "ge" | ">=" => Self::Ge,
            "lt" | "<" => Self::Lt,
            "le" | "<=" => Self::Le,
            "contains" => Self::Contains,
            "matches" | "=~" => Self::Matches,
            "in" => Self::In,
            "and" | "&&" => Self::And,
            "or" | "||" => Self::Or,
            "not" | "!" => Self::Not,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(op) => op,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
