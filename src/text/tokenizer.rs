//! 分词模块
//!
//! 把原始文本切分为带位置信息的词流。位置包含三级坐标：
//! 词序号、子句序号、句子序号，全部从零开始，按文本顺序单调
//! 不减。坐标状态显式地由词流持有并随迭代推进，不存在任何
//! 全局状态，多个分词运行彼此独立。
//!
//! 边界规则：游离的终结符（前导、连续、尾随）不产生空词，
//! 也不会让序号越过单个终结符应有的一次步进。

use std::fmt;
use std::str::Chars;

use crate::text::language::Language;

/// 三级位置坐标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    /// 词序号
    pub word: usize,
    /// 子句序号
    pub clause: usize,
    /// 句子序号
    pub sentence: usize,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 一个词，连同它的标签、语言和位置信息。创建后不再变更。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// 词面文本。希腊语在分词时统一小写；拉丁语保留原样。
    pub text: String,
    pub language: Language,
    /// 文本的作用域标签，例如 `Hom. Od. i`
    pub label: String,
    pub location: Location,
}

impl Word {
    /// 可投影的词属性名
    pub const FEATURES: [&'static str; 4] = ["label", "w", "c", "s"];
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) word no. {} in '{}'",
            self.text,
            self.language.service_code(),
            self.location.word,
            self.label
        )
    }
}

/// 惰性词流：消费一次性的字符序列，有限且不可重启
pub struct WordStream<'a> {
    chars: Chars<'a>,
    language: Language,
    label: String,
    location: Location,
    abbreviations: Vec<String>,
}

impl<'a> WordStream<'a> {
    pub fn new(text: &'a str, language: Language, label: impl Into<String>) -> Self {
        Self::with_abbreviations(text, language, label, Vec::new())
    }

    /// 附加缩写表（完整形式，如 `cf.`）。以缩写结尾的词推进
    /// 子句序号但不推进句子序号。
    pub fn with_abbreviations(
        text: &'a str,
        language: Language,
        label: impl Into<String>,
        abbreviations: Vec<String>,
    ) -> Self {
        Self {
            chars: text.chars(),
            language,
            label: label.into(),
            location: Location::new(),
            abbreviations,
        }
    }

    /// 迄今为止的累计坐标（即已发出的词数和已结束的子句/句子数）
    pub fn location(&self) -> Location {
        self.location
    }

    fn is_abbreviation(&self, token: &str) -> bool {
        if self.abbreviations.is_empty() {
            return false;
        }
        let suffix = self.language.profile().abbreviation_suffix;
        self.abbreviations
            .iter()
            .any(|a| a.len() == token.len() + suffix.len_utf8() && a.starts_with(token) && a.ends_with(suffix))
    }

    /// 发出一个词并推进坐标。词带走发出前的坐标；词序号总是
    /// 步进，子句/句子序号只按消费掉的那一个终结符步进。
    fn emit(&mut self, token: String, trailing: Option<char>) -> Word {
        let text = match self.language {
            Language::Greek => token.to_lowercase(),
            Language::Latin => token,
        };
        let word = Word {
            text,
            language: self.language,
            label: self.label.clone(),
            location: self.location,
        };
        self.location.word += 1;
        if let Some(mark) = trailing {
            self.location.clause += 1;
            let profile = self.language.profile();
            if profile.is_terminator(mark) && !self.is_abbreviation(&word.text) {
                self.location.sentence += 1;
            }
        }
        word
    }
}

impl Iterator for WordStream<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        let profile = self.language.profile();
        let mut token = String::new();
        while let Some(c) = self.chars.next() {
            if profile.is_break(c) {
                // 游离标点：没有累积词时既不发词也不推进序号
                if token.is_empty() {
                    continue;
                }
                return Some(self.emit(token, Some(c)));
            } else if c.is_whitespace() {
                if !token.is_empty() {
                    return Some(self.emit(token, None));
                }
            } else if profile.is_letter(c) {
                token.push(c);
            }
            // 词表外的字符（数字、游离符号）直接跳过
        }
        if token.is_empty() {
            None
        } else {
            Some(self.emit(token, None))
        }
    }
}
