//! 代词人称参考表
//!
//! 服务返回的拉丁语代词分析缺失人称特征，补全才能计算主谓
//! 一致。参考表的文件格式是每行 `词元 人称`，`#` 开头的行是
//! 注释。查不到词元不是错误——对应的修正会被跳过。

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::analysis::error::{AnalysisError, AnalysisResult};

/// 常用拉丁代词的内建人称表；没有配置外部参考文件时使用
const BUILTIN_PERSONS: [(&str, &str); 16] = [
    ("ego", "1"),
    ("nos", "1"),
    ("tu", "2"),
    ("vos", "2"),
    ("sui", "3"),
    ("is", "3"),
    ("hic", "3"),
    ("ille", "3"),
    ("iste", "3"),
    ("ipse", "3"),
    ("idem", "3"),
    ("qui", "3"),
    ("quis", "3"),
    ("quisque", "3"),
    ("nemo", "3"),
    ("nihil", "3"),
];

/// 词元 → 人称映射
#[derive(Debug, Clone)]
pub struct PersonTable {
    entries: HashMap<String, String>,
}

impl PersonTable {
    /// 内建表
    pub fn builtin() -> Self {
        let entries = BUILTIN_PERSONS
            .iter()
            .map(|(lemma, person)| (lemma.to_string(), person.to_string()))
            .collect();
        Self { entries }
    }

    /// 空表（测试缺表路径用）
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 从 `词元 人称` 行读表
    pub fn from_reader<R: BufRead>(reader: R) -> AnalysisResult<Self> {
        let mut entries = HashMap::new();
        for line in reader.lines() {
            let line = line.map_err(|e| AnalysisError::Reference(e.to_string()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(lemma), Some(person)) => {
                    entries.insert(lemma.to_string(), person.to_string());
                }
                _ => {
                    return Err(AnalysisError::Reference(format!(
                        "bad line in person table: '{line}'"
                    )))
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let file = File::open(path)
            .map_err(|e| AnalysisError::Reference(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file))
    }

    /// 词元的人称；不在表里返回 None
    pub fn person(&self, lemma: &str) -> Option<&str> {
        self.entries.get(lemma).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PersonTable {
    fn default() -> Self {
        Self::builtin()
    }
}
