//! JSON 记录输出
//!
//! 一条记录一行一个 JSON 对象。字段顺序没有保证（对象键序
//! 不承诺），位置序号是数字，其余值是字符串。头部注释块用
//! `//` 前缀——输出文件是「每行一个对象」的记录流，不是一份
//! 合法的 JSON 文档。

use serde_json::{Map, Value};

use crate::analysis::record::{FieldValue, Record};
use crate::builders::RunHeader;

/// 一条记录的 JSON 对象文本
pub fn line(record: &Record) -> String {
    let mut object = Map::new();
    for (name, value) in record.fields() {
        let value = match value {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Ordinal(n) => Value::from(*n),
        };
        object.insert(name.clone(), value);
    }
    Value::Object(object).to_string()
}

/// 文件头注释块
pub fn header(info: &RunHeader, file_name: Option<&str>) -> String {
    info.comment_block("//", file_name)
}
