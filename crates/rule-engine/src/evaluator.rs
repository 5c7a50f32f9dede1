//! AST 求值器
//!
//! 递归遍历 AST，对记录求值。所有失败都以 `EvalResult` 返回，
//! 唯一被捕获的宿主级故障是自定义函数的失败（包括 panic）。

use crate::models::{ArrayNode, AstNode, EvalResult, EvaluationContext, FunctionNode, OperatorNode};
use crate::operators::Operator;
use crate::value::{self, is_zero};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace, warn};

/// 对 AST 节点求值
pub fn evaluate(node: &AstNode, ctx: &EvaluationContext<'_>) -> EvalResult {
    match node {
        AstNode::Literal(lit) => EvalResult::success(lit.value.clone()),
        AstNode::Field(field) => match ctx.get_field(&field.name) {
            Some(value) => EvalResult::success(value.clone()),
            None => {
                debug!(field = %field.name, "字段不存在");
                EvalResult::failure(format!("Missing field: {}", field.name))
            }
        },
        AstNode::Array(arr) => match evaluate_elements(arr, ctx) {
            Ok(values) => EvalResult::success(Value::Array(values)),
            Err(failed) => failed,
        },
        AstNode::Function(call) => evaluate_function(call, ctx),
        AstNode::Operator(op) => evaluate_operator(op, ctx),
        AstNode::Unknown => EvalResult::failure("Unknown node type"),
    }
}

/// 按顺序求值数组元素，遇到第一个失败立即返回
fn evaluate_elements(
    arr: &ArrayNode,
    ctx: &EvaluationContext<'_>,
) -> Result<Vec<Value>, EvalResult> {
    let mut values = Vec::with_capacity(arr.elements.len());
    for element in &arr.elements {
        let result = evaluate(element, ctx);
        if !result.ok {
            return Err(result);
        }
        values.push(result.value);
    }
    Ok(values)
}

fn evaluate_function(call: &FunctionNode, ctx: &EvaluationContext<'_>) -> EvalResult {
    let Some(function) = ctx.functions().and_then(|f| f.get(&call.name)) else {
        debug!(function = %call.name, "函数未注册");
        return EvalResult::failure(format!("Unknown function: {}", call.name));
    };

    let args = match evaluate_elements(&call.args, ctx) {
        Ok(args) => args,
        Err(failed) => return failed,
    };

    // 自定义函数由调用方提供，panic 同样转换为失败结果
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| function.call(&args)));
    let message = match outcome {
        Ok(Ok(value)) => return EvalResult::success(value),
        Ok(Err(fault)) => fault.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };

    warn!(function = %call.name, error = %message, "自定义函数执行失败");
    EvalResult::failure(format!("Function {} failed: {}", call.name, message))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked".to_string()
    }
}

fn evaluate_operator(node: &OperatorNode, ctx: &EvaluationContext<'_>) -> EvalResult {
    if node.operator == Operator::Not {
        let Some(operand) = node.right.as_deref() else {
            return EvalResult::failure("not operator requires right operand");
        };
        let result = evaluate(operand, ctx);
        if !result.ok {
            return result;
        }
        return EvalResult::success(is_zero(&result.value));
    }

    let (Some(left), Some(right)) = (node.left.as_deref(), node.right.as_deref()) else {
        return EvalResult::failure(format!("{} requires two operands", node.operator));
    };

    match node.operator {
        Operator::And => evaluate_and(left, right, ctx),
        Operator::Or => evaluate_or(left, right, ctx),
        _ => {
            let left_result = evaluate(left, ctx);
            if !left_result.ok {
                return left_result;
            }
            let right_result = evaluate(right, ctx);
            if !right_result.ok {
                return right_result;
            }

            EvalResult::success(value::compare(
                &left_result.value,
                &node.operator,
                &right_result.value,
            ))
        }
    }
}

/// AND：任一侧失败则传播错误，任一侧为零值则短路返回 `false`
fn evaluate_and(left: &AstNode, right: &AstNode, ctx: &EvaluationContext<'_>) -> EvalResult {
    for (side, operand) in [("left", left), ("right", right)] {
        let result = evaluate(operand, ctx);
        if !result.ok {
            return result;
        }
        if is_zero(&result.value) {
            trace!(side, "AND 短路");
            return EvalResult::success(false);
        }
    }

    EvalResult::success(true)
}

/// OR：任一侧成功且非零即为 `true`
///
/// 两侧都未命中时按下表合并：
///
/// | left | right | 结果              |
/// |------|-------|-------------------|
/// | ok   | ok    | `false`           |
/// | ok   | err   | left 的结果       |
/// | err  | ok    | right 的结果      |
/// | err  | err   | left 的错误       |
fn evaluate_or(left: &AstNode, right: &AstNode, ctx: &EvaluationContext<'_>) -> EvalResult {
    let left_result = evaluate(left, ctx);
    if left_result.pass() {
        trace!("OR 短路");
        return EvalResult::success(true);
    }

    let right_result = evaluate(right, ctx);
    if right_result.pass() {
        return EvalResult::success(true);
    }

    match (left_result.ok, right_result.ok) {
        (true, true) => EvalResult::success(false),
        (true, false) => left_result,
        (false, true) => right_result,
        (false, false) => left_result,
    }
}
