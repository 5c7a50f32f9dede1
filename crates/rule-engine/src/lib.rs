//! rulekit 规则求值引擎
//!
//! 对外部解析器产出的 AST 求值，支持：
//! - JSON AST 解码（`node_type` 标签）
//! - 短路求值与宽松相等比较
//! - 可注入的自定义函数
//! - 规则文本的规范化输出

pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod models;
pub mod network;
pub mod operators;
pub mod printer;
pub mod resolver;
pub mod rule;
pub mod value;

pub use compiler::RuleCompiler;
pub use error::{FunctionFault, Result, RuleError};
pub use evaluator::evaluate;
pub use functions::{FunctionRegistry, RuleFunction};
pub use models::{
    ArrayNode, AstNode, EvalResult, EvaluationContext, FieldNode, FunctionNode, LiteralNode,
    LiteralType, OperatorNode,
};
pub use network::cidr_contains;
pub use operators::Operator;
pub use printer::render;
pub use resolver::resolve;
pub use rule::Rule;
pub use value::{compare, equals, is_zero, to_display_string, to_number};
