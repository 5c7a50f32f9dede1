//! AST 规范化输出
//!
//! 把 AST 还原为外部解析器可接受的规则文本，重新解析后得到等价的树。
//! 比较表达式不加括号，`and` / `or` 总是加括号（根节点除外），
//! `not` 按固定优先级改写为更自然的写法。

use crate::models::{AstNode, LiteralNode, LiteralType, OperatorNode};
use crate::operators::Operator;
use crate::value::to_display_string;
use serde_json::Value;

/// 输出规则文本
///
/// `is_root` 为 `true` 时去掉最外层逻辑表达式的一对括号，
/// 与解析器把整条表达式视为隐式分组的行为一致。
pub fn render(node: &AstNode, is_root: bool) -> String {
    match node {
        AstNode::Operator(op) if is_root => render_operator(op, false),
        other => render_node(other),
    }
}

fn render_node(node: &AstNode) -> String {
    match node {
        AstNode::Operator(op) => render_operator(op, true),
        AstNode::Field(field) => field.name.clone(),
        AstNode::Literal(lit) => render_literal(lit),
        AstNode::Array(arr) => format!("[{}]", render_list(&arr.elements)),
        AstNode::Function(call) => format!("{}({})", call.name, render_list(&call.args.elements)),
        AstNode::Unknown => "<unknown>".to_string(),
    }
}

fn render_list(nodes: &[AstNode]) -> String {
    nodes.iter().map(render_node).collect::<Vec<_>>().join(", ")
}

fn render_operator(node: &OperatorNode, wrap_logical: bool) -> String {
    if node.operator == Operator::Not {
        return render_not(node.right.as_deref());
    }

    let (Some(left), Some(right)) = (node.left.as_deref(), node.right.as_deref()) else {
        return format!("<invalid {}>", node.operator);
    };

    let expr = format!(
        "{} {} {}",
        render_node(left),
        node.operator.symbol(),
        render_node(right)
    );

    match node.operator {
        Operator::And | Operator::Or if wrap_logical => format!("({})", expr),
        _ => expr,
    }
}

/// `not` 的改写规则，按顺序匹配：
///
/// 1. `not (x == y)`       → `x != y`
/// 2. `not (x contains y)` → `x not contains y`
/// 3. `not (x =~ y)`       → `x not =~ y`
/// 4. `not (x in y)`       → `x not in y`
/// 5. `not field`          → `!field`
/// 6. 其他                 → `not (...)`
fn render_not(operand: Option<&AstNode>) -> String {
    let Some(operand) = operand else {
        return "not ()".to_string();
    };

    if let AstNode::Operator(inner) = operand {
        if let (Some(left), Some(right)) = (inner.left.as_deref(), inner.right.as_deref()) {
            let negated = match inner.operator {
                Operator::Eq => Some("!="),
                Operator::Contains => Some("not contains"),
                Operator::Matches => Some("not =~"),
                Operator::In => Some("not in"),
                _ => None,
            };
            if let Some(symbol) = negated {
                return format!("{} {} {}", render_node(left), symbol, render_node(right));
            }
        }
    }

    if let AstNode::Field(field) = operand {
        return format!("!{}", field.name);
    }

    format!("not ({})", render_node(operand))
}

fn render_literal(lit: &LiteralNode) -> String {
    if lit.value.is_null() {
        return "null".to_string();
    }

    match lit.literal_type {
        LiteralType::String => {
            let escaped = to_display_string(&lit.value)
                .replace('\\', "\\\\")
                .replace('"', "\\\"");
            format!("\"{}\"", escaped)
        }
        LiteralType::Bool | LiteralType::Int | LiteralType::Float => match &lit.value {
            Value::Number(n) => n.to_string(),
            other => to_display_string(other),
        },
        LiteralType::Bytes | LiteralType::Mac => match &lit.value {
            Value::Array(bytes) => bytes
                .iter()
                .map(|b| match b.as_u64() {
                    Some(byte) => format!("{:02x}", byte),
                    None => to_display_string(b),
                })
                .collect::<Vec<_>>()
                .join(":"),
            other => to_display_string(other),
        },
        LiteralType::Unknown => match &lit.value {
            Value::String(pattern) if !pattern.starts_with('/') => format!("/{}/", pattern),
            other => to_display_string(other),
        },
        LiteralType::Ip | LiteralType::Cidr | LiteralType::Null | LiteralType::Other => {
            to_display_string(&lit.value)
        }
    }
}
