//! 自定义函数
//!
//! 函数表由调用方在每次求值时注入，引擎不维护全局注册表。
//! 如果求值会并发进行，注册的函数需要自行保证可并发调用。

use crate::error::{FunctionFault, Result, RuleError};
use crate::network;
use crate::value::to_display_string;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 可在规则中调用的函数
#[cfg_attr(test, mockall::automock)]
pub trait RuleFunction: Send + Sync {
    fn call(&self, args: &[Value]) -> std::result::Result<Value, FunctionFault>;
}

impl<F> RuleFunction for F
where
    F: Fn(&[Value]) -> std::result::Result<Value, FunctionFault> + Send + Sync,
{
    fn call(&self, args: &[Value]) -> std::result::Result<Value, FunctionFault> {
        self(args)
    }
}

/// 函数表
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn RuleFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置标准库函数（`starts_with`、`cidr_contains`）的函数表
    pub fn with_stdlib() -> Self {
        let mut functions: HashMap<String, Arc<dyn RuleFunction>> = HashMap::new();
        functions.insert("starts_with".to_string(), Arc::new(starts_with));
        functions.insert("cidr_contains".to_string(), Arc::new(cidr_contains));
        Self { functions }
    }

    /// 注册闭包
    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> Result<()>
    where
        F: Fn(&[Value]) -> std::result::Result<Value, FunctionFault> + Send + Sync + 'static,
    {
        self.register_function(name, Arc::new(function))
    }

    /// 注册函数对象，同名函数已存在时报错
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        function: Arc<dyn RuleFunction>,
    ) -> Result<()> {
        let name = name.into();
        if self.functions.contains_key(&name) {
            return Err(RuleError::FunctionConflict(name));
        }

        self.functions.insert(name, function);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn RuleFunction>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// 已注册的函数名（排序后）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

fn expect_arity(name: &str, args: &[Value], expected: usize) -> std::result::Result<(), FunctionFault> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(FunctionFault::new(format!(
            "{} expects {} arguments, got {}",
            name,
            expected,
            args.len()
        )))
    }
}

/// `starts_with(value, prefix)`，两个参数都按字符串形式比较
pub fn starts_with(args: &[Value]) -> std::result::Result<Value, FunctionFault> {
    expect_arity("starts_with", args, 2)?;
    let value = to_display_string(&args[0]);
    let prefix = to_display_string(&args[1]);
    Ok(Value::Bool(value.starts_with(&prefix)))
}

/// `cidr_contains(ip, cidr)`，参数不是字符串时返回 `false`
pub fn cidr_contains(args: &[Value]) -> std::result::Result<Value, FunctionFault> {
    expect_arity("cidr_contains", args, 2)?;
    let matched = match (&args[0], &args[1]) {
        (Value::String(ip), Value::String(cidr)) => network::cidr_contains(ip, cidr),
        _ => false,
    };
    Ok(Value::Bool(matched))
}
