//! 字段路径解析

use serde_json::Value;

/// 在记录中解析字段路径
///
/// 先把整个路径当作顶层键查找（支持本身带点号的字段名，如 HTTP 头），
/// 找不到时再按 `.` 拆分逐层下钻。中间节点不是对象或缺少键时返回 `None`。
///
/// 字段存在但值为 null 时返回 `Some(&Value::Null)`，与"字段不存在"区分。
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let Value::Object(map) = record else {
        return None;
    };

    if let Some(value) = map.get(path) {
        return Some(value);
    }

    let mut current = record;
    for part in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }

    Some(current)
}
