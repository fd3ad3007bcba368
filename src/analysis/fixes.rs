//! 归一化与修正管线
//!
//! 候选分析在成为正式结果之前要走一条有序的变换管线：
//!
//! 1. 词元消歧后缀剥离
//! 2. 形态回核对（仅希腊语）：提交查询被剥掉了变音符号，
//!    服务可能连带返回并非原词的分析，必须严格过滤
//! 3. 现在分词语态补全（拉丁语）
//! 4. 代词人称补全（拉丁语，查参考表；缺项跳过，不致命）
//! 5. 情态重分类：supine/不定式/动形词改记为词性
//! 6. 人称数值化（`1st` → `1`）
//! 7. 词内去重（词元 + 词性 + 全部词性专属特征相同的只留一条）
//!
//! 每一步都独立幂等：对已修正的分析重复应用不再改变它。
//! 过滤可以把结果集清空——那是可观察的预期输出，不是错误。

use std::collections::HashSet;

use crate::analysis::parser::RawAnalysis;
use crate::analysis::reference::PersonTable;
use crate::text::language::Language;
use crate::text::query;
use crate::text::tokenizer::Word;

/// 通过回核对并完成全部修正的分析；只能由 [`Normalizer`] 产出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalAnalysis {
    features: RawAnalysis,
}

impl CanonicalAnalysis {
    pub fn get(&self, feature: &str) -> Option<&str> {
        self.features.get(feature)
    }

    /// 词性；装配记录时作 Prolog 谓词名
    pub fn pos(&self) -> &str {
        self.features.get("pos").unwrap_or("")
    }

    /// 全部特征，按名称有序
    pub fn features(&self) -> impl Iterator<Item = (&str, &str)> {
        self.features.features()
    }

    /// 词性专属特征，按名称有序
    pub fn noncore_features(&self) -> impl Iterator<Item = (&str, &str)> {
        self.features.noncore_features()
    }

    /// basic 回显格式：空格连接的 `特征:值` 对
    pub fn summary(&self) -> String {
        self.features
            .features()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 归一化统计信息
#[derive(Debug, Clone, Default)]
pub struct NormalizerStats {
    /// 服务返回的候选分析总数
    pub returned: usize,
    /// 回核对淘汰数
    pub discarded_form_mismatch: usize,
    /// 重复淘汰数
    pub discarded_duplicates: usize,
    /// 代词人称修正因参考表缺项而跳过的次数
    pub pronoun_fix_misses: usize,
    /// 最终保留数
    pub retained: usize,
}

impl NormalizerStats {
    pub fn reset(&mut self) {
        *self = Default::default();
    }
}

/// 归一化器：对每个词的候选分析集应用修正管线
pub struct Normalizer {
    person_table: PersonTable,
    stats: NormalizerStats,
}

impl Normalizer {
    pub fn new(person_table: PersonTable) -> Self {
        Self {
            person_table,
            stats: NormalizerStats::default(),
        }
    }

    pub fn stats(&self) -> &NormalizerStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// 把一个词的候选分析集归一化为正式分析集。
    ///
    /// `submitted` 是实际提交给服务的查询串（同时是缓存键）。
    /// 返回序列可以为空。
    pub fn canonicalize(
        &mut self,
        word: &Word,
        submitted: &str,
        candidates: Vec<RawAnalysis>,
    ) -> Vec<CanonicalAnalysis> {
        self.stats.returned += candidates.len();
        let mut seen = HashSet::new();
        let mut retained = Vec::new();

        for mut analysis in candidates {
            strip_lemma_suffix(&mut analysis);

            if !matches_submitted_form(&analysis, word.language, submitted) {
                self.stats.discarded_form_mismatch += 1;
                tracing::debug!(
                    word = %word.text,
                    form = analysis.get("form").unwrap_or(""),
                    "discarding analysis whose form does not match the submitted query"
                );
                continue;
            }

            fix_participle_voice(&mut analysis, word.language);
            self.fix_pronoun_person(&mut analysis, word.language, &word.text);
            reclassify_mood(&mut analysis);
            reduce_person_ordinal(&mut analysis);

            if !seen.insert(identity_key(&analysis)) {
                self.stats.discarded_duplicates += 1;
                continue;
            }
            retained.push(CanonicalAnalysis { features: analysis });
        }

        self.stats.retained += retained.len();
        retained
    }

    /// 代词人称补全。服务不给拉丁语代词的人称；从参考表按
    /// 词元补上。词元不在表里只记录一次警告，修正跳过。
    fn fix_pronoun_person(&mut self, analysis: &mut RawAnalysis, language: Language, word: &str) {
        if language != Language::Latin
            || analysis.get("pos") != Some("pron")
            || analysis.contains("person")
        {
            return;
        }
        let Some(lemma) = analysis.get("lemma").map(str::to_string) else {
            return;
        };
        match self.person_table.person(&lemma) {
            Some(person) => {
                let person = person.to_string();
                analysis.set("person", person);
            }
            None => {
                self.stats.pronoun_fix_misses += 1;
                tracing::warn!(word, lemma = %lemma, "Latin pronoun not fixed: lemma missing from person table");
            }
        }
    }
}

/// 词元修正：剥掉服务用来消歧的尾部数字（`sum1` → `sum`）。
/// 必须先于人称查表，带后缀的词元查不到。
pub fn strip_lemma_suffix(analysis: &mut RawAnalysis) {
    if let Some(lemma) = analysis.get("lemma") {
        let stripped = lemma.trim_end_matches(|c: char| c.is_ascii_digit());
        if stripped.len() != lemma.len() {
            let stripped = stripped.to_string();
            analysis.set("lemma", stripped);
        }
    }
}

/// 形态回核对。只保留「返回形态经同样的去符号规范化后等于
/// 提交查询」的分析；这是严格过滤而不是排序，结果集可以被
/// 清空。拉丁语免于核对。
pub fn matches_submitted_form(analysis: &RawAnalysis, language: Language, submitted: &str) -> bool {
    match language {
        Language::Latin => true,
        Language::Greek => match analysis.get("form") {
            Some(form) => query::normalize_greek(form) == submitted,
            None => false,
        },
    }
}

/// 现在分词语态补全：服务对这一词性/时态组合不给语态，而
/// 拉丁语现在分词的语态恒为主动。
pub fn fix_participle_voice(analysis: &mut RawAnalysis, language: Language) {
    if language == Language::Latin
        && analysis.get("pos") == Some("part")
        && analysis.get("tense") == Some("pres")
        && !analysis.contains("voice")
    {
        analysis.set("voice", "act");
    }
}

/// 情态重分类：supine/不定式/动形词按分类学更适合作为词性。
/// 不论原词性是名词还是动词都统一改写，并清掉情态特征。
pub fn reclassify_mood(analysis: &mut RawAnalysis) {
    let pos = match analysis.get("mood") {
        Some("supine") => "supine",
        Some("inf") | Some("infinitive") => "infinitive",
        Some("gerundive") => "gerundive",
        _ => return,
    };
    analysis.set("pos", pos);
    analysis.remove("mood");
}

/// 人称数值化：`1st`/`2nd`/`3rd` 缩成首位数字。已是单个数字
/// 时保持不变。
pub fn reduce_person_ordinal(analysis: &mut RawAnalysis) {
    if let Some(person) = analysis.get("person") {
        let mut chars = person.chars();
        if let Some(first) = chars.next() {
            if first.is_ascii_digit() && chars.next().is_some() {
                analysis.set("person", first.to_string());
            }
        }
    }
}

/// 词内去重键：词元 + 词性 + 全部词性专属特征
fn identity_key(analysis: &RawAnalysis) -> String {
    let mut key = String::new();
    key.push_str(analysis.get("lemma").unwrap_or(""));
    key.push('\u{1}');
    key.push_str(analysis.get("pos").unwrap_or(""));
    for (name, value) in analysis.noncore_features() {
        key.push('\u{1}');
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}
