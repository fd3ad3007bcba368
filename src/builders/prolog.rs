//! Prolog 子句输出
//!
//! 一条记录一条事实：`verb('amare','amo','pres').`——谓词名是
//! 分析的词性，字符串值加单引号，序号值不加。由于缺失特征被
//! 省略，同一谓词可能以不同元数出现；登记器按 `谓词/元数`
//! 记录所有出现过的过程名，文件尾部的注释块把它们连同可直接
//! 取用的 `:- dynamic` 指令一起列出。

use std::collections::BTreeSet;

use crate::analysis::record::{FieldValue, Record};
use crate::builders::RunHeader;

/// 把一个字段值转成 Prolog 原子文本
fn atom(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => format!("'{}'", s.replace('\'', "\\'")),
        FieldValue::Ordinal(n) => n.to_string(),
    }
}

/// 一条记录的 Prolog 子句
pub fn clause(record: &Record) -> String {
    let args: Vec<String> = record.fields().iter().map(|(_, value)| atom(value)).collect();
    format!("{}({}).", record.functor(), args.join(","))
}

/// 记录对应的过程名：`谓词/元数`
pub fn procedure_name(record: &Record) -> String {
    format!("{}/{}", record.functor(), record.arity())
}

/// 运行中出现过的 Prolog 过程名登记器
#[derive(Debug, Default)]
pub struct ProcedureRegister {
    names: BTreeSet<String>,
}

impl ProcedureRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一条记录的过程名；首次出现返回 true
    pub fn observe(&mut self, record: &Record) -> bool {
        self.names.insert(procedure_name(record))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// 文件头注释块
pub fn header(info: &RunHeader, file_name: Option<&str>) -> String {
    let mut out = info.comment_block("%%", file_name);
    out.push_str("%% Paste :- dynamic directives (uncommented) below this comment.\n\n");
    out.push_str("%% Insert consults of rule files below this comment.\n\n");
    out.push_str("%%\n");
    out
}

/// 文件尾注释块：生成过的过程名与 `:- dynamic` 指令
pub fn footer(register: &ProcedureRegister) -> String {
    let mut out = String::new();
    out.push_str("\n%% Insert consults of prune files below this comment.\n");
    out.push_str("\n%%\n");
    out.push_str("%% Names of Prolog procedures generated follow.\n");
    for name in register.names() {
        out.push_str(&format!("%% {name}\n"));
    }
    out.push_str("%% To make any procedure dynamic, so that you can use\n");
    out.push_str("%% assert and retract with it, copy the appropriate\n");
    out.push_str("%% :-dynamic directive from this comment to before the first clause\n");
    out.push_str("%% in this file.\n");
    for name in register.names() {
        out.push_str(&format!("%% :- dynamic {name}.\n"));
    }
    out.push_str("%%\n");
    out
}
