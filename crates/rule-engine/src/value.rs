//! 值模型
//!
//! 规则语言的动态值直接使用 `serde_json::Value`（null / bool / number /
//! string / array / object）。本模块实现规则语言对这些值的解释：
//! 真值判断、宽松相等、排序、包含和正则匹配。所有操作都是全函数，
//! 类型不匹配时返回 `false` 而不是报错。

use crate::operators::Operator;
use regex::Regex;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// 规则语言的"零值"判断
///
/// null、false、0、空字符串、空数组、空对象都视为零值。
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => number_to_f64(n) == 0.0,
        Value::String(s) => s.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        Value::Object(obj) => obj.is_empty(),
    }
}

/// 相等比较
///
/// 数组逐元素比较；对象按键值结构比较；其余情况走宽松相等，
/// 例如 `5 == "5"`、`true == 1`、`[1] == 1` 均成立。
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| equals(a, b))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l
                    .iter()
                    .all(|(key, a)| r.get(key).is_some_and(|b| equals(a, b)))
        }
        _ => loose_equals(left, right),
    }
}

/// 宽松相等（两侧均非 null，且不同时为数组 / 对象）
fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => number_to_f64(a) == number_to_f64(b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,

        // 布尔值先转换为数字再比较
        (Value::Bool(b), other) | (other, Value::Bool(b)) => {
            loose_equals(&Value::from(u8::from(*b)), other)
        }

        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            to_number(s).is_some_and(|parsed| parsed == number_to_f64(n))
        }

        // 数组 / 对象与原始值比较时先转换为字符串形式
        (composite @ (Value::Array(_) | Value::Object(_)), primitive)
        | (primitive, composite @ (Value::Array(_) | Value::Object(_))) => {
            match primitive {
                Value::Number(_) | Value::String(_) => {
                    loose_equals(&Value::String(to_display_string(composite)), primitive)
                }
                _ => false,
            }
        }

        _ => false,
    }
}

/// 排序比较
///
/// 只对数字-数字和字符串-字符串有定义（字符串按 UTF-16 码元的字典序），
/// 其他组合返回 `None`，即既不大于也不小于。
pub fn compare_order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => number_to_f64(a).partial_cmp(&number_to_f64(b)),
        (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => None,
    }
}

/// 包含检查
///
/// - 字符串包含子串
/// - 数组中存在与 `item` 相等的元素
/// - 对象包含名为 `item` 的键
pub fn contains(container: &Value, item: &Value) -> bool {
    match (container, item) {
        (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
        (Value::Array(arr), _) => arr.iter().any(|element| equals(element, item)),
        (Value::Object(obj), Value::String(key)) => obj.contains_key(key),
        _ => false,
    }
}

/// 正则匹配
///
/// 非字符串的值先转换为字符串形式；数组只要有一个元素匹配即成立。
/// 无效的正则表达式返回 `false`。
pub fn matches(value: &Value, pattern: &Value) -> bool {
    let Value::String(source) = pattern else {
        return false;
    };

    match Regex::new(source) {
        Ok(regex) => matches_regex(value, &regex),
        Err(e) => {
            tracing::debug!(pattern = %source, error = %e, "无效的正则表达式");
            false
        }
    }
}

fn matches_regex(value: &Value, regex: &Regex) -> bool {
    match value {
        Value::String(s) => regex.is_match(s),
        Value::Array(arr) => arr.iter().any(|element| matches_regex(element, regex)),
        other => regex.is_match(&to_display_string(other)),
    }
}

/// 按操作符比较两个值
///
/// `in` 交换操作数：`x in y` 等价于 `y contains x`。
/// 非比较类操作符返回 `false`。
pub fn compare(left: &Value, operator: &Operator, right: &Value) -> bool {
    match operator {
        Operator::Eq => equals(left, right),
        Operator::Ne => !equals(left, right),
        Operator::Gt => compare_order(left, right) == Some(Ordering::Greater),
        Operator::Ge => equals(left, right) || compare_order(left, right) == Some(Ordering::Greater),
        Operator::Lt => compare_order(left, right) == Some(Ordering::Less),
        Operator::Le => equals(left, right) || compare_order(left, right) == Some(Ordering::Less),
        Operator::Contains => contains(left, right),
        Operator::Matches => matches(left, right),
        Operator::In => contains(right, left),
        Operator::And | Operator::Or | Operator::Not | Operator::Other(_) => false,
    }
}

/// 值的字符串形式
///
/// null 输出为 `null`，数字使用最短十进制形式，数组以 `,` 连接
/// （其中的 null 输出为空串），对象输出为 `[object Object]`。
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(arr) => arr
            .iter()
            .map(|element| match element {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// 字符串转数字
///
/// 去除首尾空白后：空串为 0；支持十进制、科学计数法、
/// `0x` / `0o` / `0b` 前缀和 `Infinity`。无法转换时返回 `None`。
pub fn to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // Rust 的解析器额外接受 inf / nan 等写法，这里只允许数字字面量
    let is_numeric_literal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_numeric_literal {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

fn number_to_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn number_to_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }

    let f = number_to_f64(n);
    // 整数值的浮点数不带小数部分，与规则语言的字符串转换一致
    format!("{}", f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_zero() {
        assert!(is_zero(&json!(null)));
        assert!(is_zero(&json!(false)));
        assert!(is_zero(&json!(0)));
        assert!(is_zero(&json!(0.0)));
        assert!(is_zero(&json!("")));
        assert!(is_zero(&json!([])));
        assert!(is_zero(&json!({})));

        assert!(!is_zero(&json!(true)));
        assert!(!is_zero(&json!(-1)));
        assert!(!is_zero(&json!("0")));
        assert!(!is_zero(&json!([0])));
        assert!(!is_zero(&json!({"a": null})));
    }

    #[test]
    fn test_equals_loose() {
        assert!(equals(&json!(5), &json!("5")));
        assert!(equals(&json!("5"), &json!(5)));
        assert!(equals(&json!(100), &json!(100.0)));
        assert!(equals(&json!(1), &json!(true)));
        assert!(equals(&json!("1"), &json!(true)));
        assert!(equals(&json!(0), &json!("")));
        assert!(equals(&json!(" 42 "), &json!(42)));
        assert!(equals(&json!("0x10"), &json!(16)));

        assert!(!equals(&json!("abc"), &json!(0)));
        assert!(!equals(&json!("true"), &json!(true)));
    }

    #[test]
    fn test_equals_null() {
        assert!(equals(&json!(null), &json!(null)));
        assert!(!equals(&json!(null), &json!(0)));
        assert!(!equals(&json!(""), &json!(null)));
        assert!(!equals(&json!(null), &json!(false)));
    }

    #[test]
    fn test_equals_arrays() {
        assert!(equals(&json!([1, 2]), &json!([1, 2])));
        assert!(equals(&json!([1, "2"]), &json!(["1", 2])));
        assert!(!equals(&json!([1, 2]), &json!([2, 1])));
        assert!(!equals(&json!([1, 2]), &json!([1, 2, 3])));
    }

    #[test]
    fn test_equals_composite_with_primitive() {
        assert!(equals(&json!([1]), &json!(1)));
        assert!(equals(&json!([1, 2]), &json!("1,2")));
        assert!(equals(&json!({"a": 1}), &json!("[object Object]")));
        assert!(!equals(&json!([1, 2]), &json!({"a": 1})));
    }

    #[test]
    fn test_equals_objects_structural() {
        assert!(equals(&json!({"a": 1, "b": [1]}), &json!({"b": [1], "a": 1})));
        assert!(!equals(&json!({"a": 1}), &json!({"a": 2})));
        assert!(!equals(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_compare_order() {
        assert_eq!(compare_order(&json!(10), &json!(2)), Some(Ordering::Greater));
        assert_eq!(compare_order(&json!(1.5), &json!(2)), Some(Ordering::Less));
        assert_eq!(compare_order(&json!("b"), &json!("a")), Some(Ordering::Greater));
        // 字典序："10" < "9"
        assert_eq!(compare_order(&json!("10"), &json!("9")), Some(Ordering::Less));
        assert_eq!(compare_order(&json!("10"), &json!(9)), None);
        assert_eq!(compare_order(&json!(true), &json!(false)), None);
    }

    #[test]
    fn test_ordering_operators_on_mixed_types() {
        // 数字与字符串不可排序，但 ge/le 仍可通过宽松相等成立
        assert!(!compare(&json!("5"), &Operator::Gt, &json!(4)));
        assert!(!compare(&json!("5"), &Operator::Lt, &json!(6)));
        assert!(compare(&json!("5"), &Operator::Ge, &json!(5)));
        assert!(compare(&json!("5"), &Operator::Le, &json!(5)));
    }

    #[test]
    fn test_ne_is_negated_equals() {
        assert!(!compare(&json!(5), &Operator::Ne, &json!("5")));
        assert!(compare(&json!(null), &Operator::Ne, &json!(0)));
        assert!(compare(&json!("GET"), &Operator::Ne, &json!("POST")));
        assert!(!compare(&json!([1, 2]), &Operator::Ne, &json!([1, 2])));
    }

    #[test]
    fn test_ordering_operators_same_type() {
        let cases = [
            // 数字
            (json!(6), Operator::Gt, json!(5), true),
            (json!(5), Operator::Gt, json!(5), false),
            (json!(4), Operator::Gt, json!(5), false),
            (json!(6), Operator::Ge, json!(5), true),
            (json!(5), Operator::Ge, json!(5), true),
            (json!(4), Operator::Ge, json!(5), false),
            (json!(4), Operator::Lt, json!(5), true),
            (json!(5), Operator::Lt, json!(5), false),
            (json!(6), Operator::Lt, json!(5), false),
            (json!(4), Operator::Le, json!(5), true),
            (json!(5.0), Operator::Le, json!(5), true),
            (json!(6), Operator::Le, json!(5), false),
            // 字符串
            (json!("b"), Operator::Gt, json!("a"), true),
            (json!("a"), Operator::Gt, json!("a"), false),
            (json!("a"), Operator::Gt, json!("b"), false),
            (json!("b"), Operator::Ge, json!("a"), true),
            (json!("a"), Operator::Ge, json!("a"), true),
            (json!("a"), Operator::Ge, json!("b"), false),
            (json!("a"), Operator::Lt, json!("b"), true),
            (json!("a"), Operator::Lt, json!("a"), false),
            (json!("b"), Operator::Lt, json!("a"), false),
            (json!("a"), Operator::Le, json!("b"), true),
            (json!("a"), Operator::Le, json!("a"), true),
            (json!("b"), Operator::Le, json!("a"), false),
        ];

        for (left, op, right, expected) in cases {
            assert_eq!(
                compare(&left, &op, &right),
                expected,
                "{} {} {}",
                left,
                op.symbol(),
                right
            );
        }
    }

    #[test]
    fn test_string_order_by_utf16_code_units() {
        // U+FF61 是单个码元 0xFF61，U+1F600 的首个代理码元是 0xD83D
        assert_eq!(
            compare_order(&json!("\u{FF61}"), &json!("\u{1F600}")),
            Some(Ordering::Greater)
        );
        assert!(compare(&json!("\u{1F600}"), &Operator::Lt, &json!("\u{FF61}")));
        assert_eq!(compare_order(&json!("é"), &json!("e")), Some(Ordering::Greater));
    }

    #[test]
    fn test_contains() {
        assert!(contains(&json!("hello world"), &json!("world")));
        assert!(!contains(&json!("hello world"), &json!("mars")));
        assert!(contains(&json!(["a", "b"]), &json!("b")));
        assert!(contains(&json!([200, 201]), &json!("201")));
        assert!(contains(&json!({"content-type": "json"}), &json!("content-type")));
        assert!(!contains(&json!({"a": 1}), &json!(1)));
        assert!(!contains(&json!("12345"), &json!(3)));
        assert!(!contains(&json!(42), &json!(42)));
    }

    #[test]
    fn test_in_swaps_operands() {
        assert!(compare(&json!(200), &Operator::In, &json!([200, 201, 204])));
        assert!(!compare(&json!(404), &Operator::In, &json!([200, 201, 204])));
        assert!(compare(&json!("ell"), &Operator::In, &json!("hello")));
    }

    #[test]
    fn test_matches() {
        assert!(matches(&json!("GET"), &json!("^GET|POST$")));
        assert!(!matches(&json!("DELETE"), &json!("^GET|POST$")));
        assert!(matches(&json!(8080), &json!("^80")));
        assert!(matches(&json!(true), &json!("^tr")));
        assert!(matches(&json!(["x", "example.com"]), &json!(r"example\.com$")));
        assert!(!matches(&json!(["x", "y"]), &json!(r"example\.com$")));
    }

    #[test]
    fn test_matches_invalid_pattern_is_false() {
        assert!(!matches(&json!("anything"), &json!("[invalid")));
        assert!(!matches(&json!("anything"), &json!(42)));
    }

    #[test]
    fn test_unknown_operator_is_false() {
        let op = Operator::Other("between".to_string());
        assert!(!compare(&json!(1), &op, &json!(1)));
        assert!(!compare(&json!(true), &Operator::And, &json!(true)));
    }

    #[test]
    fn test_to_display_string() {
        assert_eq!(to_display_string(&json!(null)), "null");
        assert_eq!(to_display_string(&json!(8080)), "8080");
        assert_eq!(to_display_string(&json!(100.0)), "100");
        assert_eq!(to_display_string(&json!(1.5)), "1.5");
        assert_eq!(to_display_string(&json!([1, null, "a"])), "1,,a");
        assert_eq!(to_display_string(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(""), Some(0.0));
        assert_eq!(to_number("  12 "), Some(12.0));
        assert_eq!(to_number("1e3"), Some(1000.0));
        assert_eq!(to_number(".5"), Some(0.5));
        assert_eq!(to_number("0b101"), Some(5.0));
        assert_eq!(to_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(to_number("inf"), None);
        assert_eq!(to_number("NaN"), None);
        assert_eq!(to_number("12px"), None);
    }
}
