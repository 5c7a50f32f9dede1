//! 规则对象
//!
//! 持有一棵 AST 及其引用的字段集合，是面向调用方的主要入口。

use crate::error::Result;
use crate::evaluator;
use crate::functions::FunctionRegistry;
use crate::models::{AstNode, EvalResult, EvaluationContext};
use crate::printer;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use tracing::instrument;

/// 一条规则
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    root: AstNode,
    /// 规则中使用的所有字段路径
    required_fields: BTreeSet<String>,
}

impl Rule {
    pub fn new(root: AstNode) -> Self {
        let required_fields = root.required_fields();
        Self {
            root,
            required_fields,
        }
    }

    /// 从解析器输出的 JSON 文本构建
    pub fn from_json(json: &str) -> Result<Self> {
        let root: AstNode = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let root: AstNode = serde_json::from_value(value)?;
        Ok(Self::new(root))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.root)?)
    }

    pub fn root(&self) -> &AstNode {
        &self.root
    }

    pub fn required_fields(&self) -> &BTreeSet<String> {
        &self.required_fields
    }

    /// 对一条记录求值
    #[instrument(skip_all, fields(fields = self.required_fields.len()))]
    pub fn eval(&self, record: &Value, functions: Option<&FunctionRegistry>) -> EvalResult {
        let mut ctx = EvaluationContext::new(record);
        if let Some(functions) = functions {
            ctx = ctx.with_functions(functions);
        }
        evaluator::evaluate(&self.root, &ctx)
    }

    /// 求值成功且结果为真
    pub fn passes(&self, record: &Value, functions: Option<&FunctionRegistry>) -> bool {
        self.eval(record, functions).pass()
    }
}

impl From<AstNode> for Rule {
    fn from(root: AstNode) -> Self {
        Self::new(root)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&printer::render(&self.root, true))
    }
}
