//! 响应文档解析模块
//!
//! 服务返回一个 `<analyses>` 文档，内含零或多个 `<analysis>`
//! 元素，子元素的标签名就是特征名。特征集是开放的、随词性
//! 变化的（动词有 tense/mood/voice，名词有 case/gender……），
//! 所以解析成特征名 → 值的有序映射而不是固定字段；结构校验
//! 只针对固定的核心特征。
//!
//! `<form>` 元素的 `lang` 属性并入特征集。服务对拉丁语的请求
//! 代码是 `la`，记录里统一写作 `latin`。

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::analysis::error::{AnalysisError, AnalysisResult};

/// 所有词性共有的核心特征
pub const CORE_FEATURES: [&str; 7] = [
    "form",
    "lemma",
    "expandedForm",
    "pos",
    "lang",
    "dialect",
    "feature",
];

/// 每个分析元素里必须出现且非空的核心特征
const REQUIRED_FEATURES: [&str; 3] = ["form", "lemma", "pos"];

/// 服务返回的一条未经校验的候选分析：特征名 → 文本值。
/// 映射按特征名有序，词性专属特征因此天然按名称排序导出。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAnalysis {
    features: BTreeMap<String, String>,
}

impl RawAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从特征对构造；测试和种子数据用
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut analysis = Self::new();
        for (feature, value) in pairs {
            analysis.set(feature, value);
        }
        analysis
    }

    pub fn get(&self, feature: &str) -> Option<&str> {
        self.features.get(feature).map(String::as_str)
    }

    pub fn set(&mut self, feature: &str, value: impl Into<String>) {
        self.features.insert(feature.to_string(), value.into());
    }

    pub fn remove(&mut self, feature: &str) -> Option<String> {
        self.features.remove(feature)
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.contains_key(feature)
    }

    /// 全部特征，按名称有序
    pub fn features(&self) -> impl Iterator<Item = (&str, &str)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 词性专属（非核心）特征，按名称有序
    pub fn noncore_features(&self) -> impl Iterator<Item = (&str, &str)> {
        self.features().filter(|(name, _)| !Self::is_core(name))
    }

    pub fn is_core(feature: &str) -> bool {
        CORE_FEATURES.contains(&feature)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// 把 `<analyses>` 文档解析为候选分析序列。
///
/// 零个 `<analysis>` 元素是合法的空结果，不是错误；缺少根
/// 元素、XML 语法错误或分析元素缺失必备核心特征才算响应
/// 损坏。`query` 只用于错误信息。
pub fn parse_analyses(query: &str, document: &str) -> AnalysisResult<Vec<RawAnalysis>> {
    let malformed = |reason: String| AnalysisError::MalformedResponse {
        query: query.to_string(),
        reason,
    };

    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut analyses = Vec::new();
    let mut current: Option<RawAnalysis> = None;
    let mut feature: Option<String> = None;
    let mut value = String::new();
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    "analyses" => saw_root = true,
                    "analysis" => current = Some(RawAnalysis::new()),
                    _ => {
                        if let Some(analysis) = current.as_mut() {
                            if name == "form" {
                                // 返回语言藏在 form 的属性里，提出来单独成特征
                                for attr in e.attributes().flatten() {
                                    if attr.key.as_ref() == b"lang" {
                                        let lang = String::from_utf8_lossy(&attr.value).into_owned();
                                        let lang = if lang == "la" {
                                            "latin".to_string()
                                        } else {
                                            lang
                                        };
                                        analysis.set("lang", lang);
                                    }
                                }
                            }
                            feature = Some(name);
                            value.clear();
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if feature.is_some() {
                    match e.unescape() {
                        Ok(text) => value.push_str(&text),
                        Err(e) => return Err(malformed(e.to_string())),
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "analysis" {
                    if let Some(analysis) = current.take() {
                        validate(&analysis).map_err(&malformed)?;
                        analyses.push(analysis);
                    }
                } else if feature.as_deref() == Some(name.as_str()) {
                    if let (Some(f), Some(analysis)) = (feature.take(), current.as_mut()) {
                        analysis.set(&f, value.as_str());
                        value.clear();
                    }
                }
            }
            // 自闭合元素没有值，不产生特征
            Ok(Event::Empty(_)) => {}
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(malformed(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    if !saw_root {
        return Err(malformed("missing <analyses> root element".to_string()));
    }

    Ok(analyses)
}

fn validate(analysis: &RawAnalysis) -> Result<(), String> {
    for required in REQUIRED_FEATURES {
        if analysis.get(required).is_none_or(str::is_empty) {
            return Err(format!("analysis element missing <{required}>"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMARE_DOC: &str = r#"<analyses>
  <analysis>
    <form lang="la">amare</form>
    <lemma>amo1</lemma>
    <expandedForm>amare</expandedForm>
    <pos>verb</pos>
    <tense>pres</tense>
    <mood>inf</mood>
    <voice>act</voice>
  </analysis>
</analyses>"#;

    #[test]
    fn parses_features_and_promotes_lang_attribute() {
        let analyses = parse_analyses("amare", AMARE_DOC).unwrap();
        assert_eq!(analyses.len(), 1);
        let analysis = &analyses[0];
        assert_eq!(analysis.get("form"), Some("amare"));
        assert_eq!(analysis.get("lemma"), Some("amo1"));
        assert_eq!(analysis.get("mood"), Some("inf"));
        // `la` 统一成 `latin`
        assert_eq!(analysis.get("lang"), Some("latin"));
    }

    #[test]
    fn greek_lang_attribute_passes_through() {
        let doc = r#"<analyses><analysis><form lang="greek">μῆνις</form><lemma>μῆνις</lemma><pos>noun</pos></analysis></analyses>"#;
        let analyses = parse_analyses("mhnis", doc).unwrap();
        assert_eq!(analyses[0].get("lang"), Some("greek"));
    }

    #[test]
    fn empty_document_is_a_valid_empty_result() {
        let analyses = parse_analyses("qqq", "<analyses></analyses>").unwrap();
        assert!(analyses.is_empty());
    }

    #[test]
    fn missing_root_is_malformed() {
        let result = parse_analyses("amare", "<error>word not found</error>");
        assert!(matches!(
            result,
            Err(AnalysisError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn truncated_document_is_malformed() {
        let result = parse_analyses("amare", "<analyses><analysis><form>am");
        assert!(matches!(
            result,
            Err(AnalysisError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn analysis_without_lemma_is_malformed() {
        let doc = "<analyses><analysis><form>x</form><pos>noun</pos></analysis></analyses>";
        let result = parse_analyses("x", doc);
        assert!(matches!(
            result,
            Err(AnalysisError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn noncore_features_exclude_core_and_sort_by_name() {
        let analyses = parse_analyses("amare", AMARE_DOC).unwrap();
        let noncore: Vec<&str> = analyses[0].noncore_features().map(|(n, _)| n).collect();
        assert_eq!(noncore, ["mood", "tense", "voice"]);
    }

    #[test]
    fn multiple_analyses_keep_document_order() {
        let doc = r#"<analyses>
  <analysis><form>est</form><lemma>sum1</lemma><pos>verb</pos><person>3rd</person></analysis>
  <analysis><form>est</form><lemma>edo1</lemma><pos>verb</pos><person>3rd</person></analysis>
</analyses>"#;
        let analyses = parse_analyses("est", doc).unwrap();
        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].get("lemma"), Some("sum1"));
        assert_eq!(analyses[1].get("lemma"), Some("edo1"));
    }
}
