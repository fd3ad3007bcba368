//! 记录装配模块
//!
//! 把一条正式分析与来源词的位置信息按调用方的投影合成一条
//! 输出记录。有 N 条存活分析的词产出 N 条记录，零条产出零条
//! ——这是可观察的预期结果，不是错误。未请求或缺失的特征
//! 直接省略，绝不填默认值。
//!
//! 字段顺序：核心投影（按请求顺序）→ 词性专属特征（按名称
//! 有序，全部导出）→ 词属性投影（按请求顺序）。

use serde::Serialize;
use std::fmt;

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::fixes::CanonicalAnalysis;
use crate::analysis::parser::RawAnalysis;
use crate::text::tokenizer::Word;

/// 记录字段值：位置序号是整数，其余都是文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Ordinal(usize),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Ordinal(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Ordinal(n) => write!(f, "{n}"),
        }
    }
}

/// 输出投影：要导出的核心特征与词属性。名称在构造时校验。
#[derive(Debug, Clone)]
pub struct Projection {
    core: Vec<String>,
    word: Vec<String>,
}

impl Projection {
    /// 默认投影：全部核心特征，不含词属性
    pub fn default_core() -> Self {
        Self {
            core: crate::analysis::parser::CORE_FEATURES
                .iter()
                .map(|f| f.to_string())
                .collect(),
            word: Vec::new(),
        }
    }

    pub fn new<I, J, S, T>(core: I, word: J) -> AnalysisResult<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let core: Vec<String> = core.into_iter().map(Into::into).collect();
        let word: Vec<String> = word.into_iter().map(Into::into).collect();
        let unknown_core: Vec<&str> = core
            .iter()
            .map(String::as_str)
            .filter(|name| !RawAnalysis::is_core(name))
            .collect();
        if !unknown_core.is_empty() {
            return Err(AnalysisError::Config(format!(
                "unrecognized core features: {unknown_core:?}"
            )));
        }
        let unknown_word: Vec<&str> = word
            .iter()
            .map(String::as_str)
            .filter(|name| !Word::FEATURES.contains(name))
            .collect();
        if !unknown_word.is_empty() {
            return Err(AnalysisError::Config(format!(
                "unrecognized word features: {unknown_word:?}"
            )));
        }
        Ok(Self { core, word })
    }

    pub fn core(&self) -> &[String] {
        &self.core
    }

    pub fn word(&self) -> &[String] {
        &self.word
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::default_core()
    }
}

/// 一条输出记录
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 分析的词性，作 Prolog 谓词名
    functor: String,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn functor(&self) -> &str {
        &self.functor
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// 合成一个词的全部输出记录
pub fn assemble_records(
    word: &Word,
    analyses: &[CanonicalAnalysis],
    projection: &Projection,
) -> Vec<Record> {
    analyses
        .iter()
        .map(|analysis| assemble_one(word, analysis, projection))
        .collect()
}

fn assemble_one(word: &Word, analysis: &CanonicalAnalysis, projection: &Projection) -> Record {
    let mut fields = Vec::new();
    for name in projection.core() {
        if let Some(value) = analysis.get(name) {
            fields.push((name.clone(), FieldValue::Text(value.to_string())));
        }
    }
    for (name, value) in analysis.noncore_features() {
        fields.push((name.to_string(), FieldValue::Text(value.to_string())));
    }
    for name in projection.word() {
        let value = match name.as_str() {
            "label" => FieldValue::Text(word.label.clone()),
            "w" => FieldValue::Ordinal(word.location.word),
            "c" => FieldValue::Ordinal(word.location.clause),
            "s" => FieldValue::Ordinal(word.location.sentence),
            // Projection::new 已经校验过名称
            _ => continue,
        };
        fields.push((name.clone(), value));
    }
    Record {
        functor: analysis.pos().to_string(),
        fields,
    }
}
