//! 规则引擎领域模型
//!
//! AST 由外部解析器构建，以 JSON 交换（`node_type` 作为类型标签）。
//! 树一旦构建即不可变，可在多个线程间共享求值。

use crate::functions::FunctionRegistry;
use crate::operators::Operator;
use crate::resolver;
use crate::value;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// AST 节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "snake_case")]
pub enum AstNode {
    Operator(OperatorNode),
    Field(FieldNode),
    Literal(LiteralNode),
    Array(ArrayNode),
    Function(FunctionNode),
    /// 无法识别的 `node_type`
    #[serde(other)]
    Unknown,
}

/// 操作符节点
///
/// 二元操作符同时持有 `left` 和 `right`；一元 `not` 只使用 `right`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorNode {
    pub operator: Operator,
    #[serde(default)]
    pub left: Option<Box<AstNode>>,
    #[serde(default)]
    pub right: Option<Box<AstNode>>,
}

/// 字段引用节点，`name` 为点号分隔的路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,
}

/// 字面量节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralNode {
    #[serde(rename = "type")]
    pub literal_type: LiteralType,
    #[serde(default)]
    pub value: Value,
}

/// 字面量的语义类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralType {
    Int,
    Float,
    String,
    Bool,
    Ip,
    Cidr,
    Bytes,
    Mac,
    Null,
    /// 未用 `/.../` 包裹的正则表达式
    Unknown,
    /// 未识别的类型标签
    #[serde(other)]
    Other,
}

/// 数组节点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayNode {
    #[serde(default)]
    pub elements: Vec<AstNode>,
}

/// 函数调用节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    #[serde(default, with = "tagged_array")]
    pub args: ArrayNode,
}

/// 函数参数以完整的 `array` 节点（带 `node_type`）交换
mod tagged_array {
    use super::{ArrayNode, AstNode};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Tagged<'a> {
        node_type: &'static str,
        elements: &'a [AstNode],
    }

    pub fn serialize<S: Serializer>(args: &ArrayNode, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged {
            node_type: "array",
            elements: &args.elements,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ArrayNode, D::Error> {
        ArrayNode::deserialize(deserializer)
    }
}

impl AstNode {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(FieldNode { name: name.into() })
    }

    pub fn literal(literal_type: LiteralType, value: impl Into<Value>) -> Self {
        Self::Literal(LiteralNode {
            literal_type,
            value: value.into(),
        })
    }

    pub fn int(value: i64) -> Self {
        Self::literal(LiteralType::Int, value)
    }

    pub fn float(value: f64) -> Self {
        Self::literal(LiteralType::Float, value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(LiteralType::String, Value::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::literal(LiteralType::Bool, value)
    }

    pub fn null() -> Self {
        Self::literal(LiteralType::Null, Value::Null)
    }

    /// 正则表达式字面量（不含 `/` 分隔符）
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::literal(LiteralType::Unknown, Value::String(pattern.into()))
    }

    pub fn array(elements: Vec<AstNode>) -> Self {
        Self::Array(ArrayNode { elements })
    }

    pub fn call(name: impl Into<String>, args: Vec<AstNode>) -> Self {
        Self::Function(FunctionNode {
            name: name.into(),
            args: ArrayNode { elements: args },
        })
    }

    pub fn binary(operator: impl Into<Operator>, left: AstNode, right: AstNode) -> Self {
        Self::Operator(OperatorNode {
            operator: operator.into(),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        })
    }

    pub fn not(operand: AstNode) -> Self {
        Self::Operator(OperatorNode {
            operator: Operator::Not,
            left: None,
            right: Some(Box::new(operand)),
        })
    }

    pub fn and(left: AstNode, right: AstNode) -> Self {
        Self::binary(Operator::And, left, right)
    }

    pub fn or(left: AstNode, right: AstNode) -> Self {
        Self::binary(Operator::Or, left, right)
    }

    pub fn eq(left: AstNode, right: AstNode) -> Self {
        Self::binary(Operator::Eq, left, right)
    }

    /// 直接子节点
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            Self::Operator(op) => op.left.iter().chain(op.right.iter()).map(|b| &**b).collect(),
            Self::Array(arr) => arr.elements.iter().collect(),
            Self::Function(call) => call.args.elements.iter().collect(),
            Self::Field(_) | Self::Literal(_) | Self::Unknown => Vec::new(),
        }
    }

    /// 树的深度（叶子节点为 1）
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(AstNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// 节点总数
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(AstNode::node_count)
            .sum::<usize>()
    }

    /// 规则中引用的所有字段路径
    pub fn required_fields(&self) -> BTreeSet<String> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields(&self, fields: &mut BTreeSet<String>) {
        if let Self::Field(field) = self {
            fields.insert(field.name.clone());
        }
        for child in self.children() {
            child.collect_fields(fields);
        }
    }
}

/// 求值上下文
///
/// 每次求值临时构建，只借用记录和函数表。
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    record: &'a Value,
    functions: Option<&'a FunctionRegistry>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(record: &'a Value) -> Self {
        Self {
            record,
            functions: None,
        }
    }

    pub fn with_functions(mut self, functions: &'a FunctionRegistry) -> Self {
        self.functions = Some(functions);
        self
    }

    /// 获取字段值（先按完整键查找，再按点号路径下钻）
    pub fn get_field(&self, path: &str) -> Option<&'a Value> {
        resolver::resolve(self.record, path)
    }

    pub fn functions(&self) -> Option<&'a FunctionRegistry> {
        self.functions
    }
}

/// 求值结果
///
/// `ok` 为 `false` 时 `error` 必然存在，`value` 没有意义。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    pub ok: bool,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvalResult {
    pub fn success(value: impl Into<Value>) -> Self {
        Self {
            ok: true,
            value: value.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: Value::Null,
            error: Some(error.into()),
        }
    }

    /// 求值成功且结果为非零值
    pub fn pass(&self) -> bool {
        self.ok && !value::is_zero(&self.value)
    }

    /// 求值成功但结果为零值
    pub fn fail(&self) -> bool {
        self.ok && value::is_zero(&self.value)
    }
}
