//! 语言配置模块
//!
//! 定义两种支持的语言标签和各自的分词配置。服务端使用的语言
//! 代码与输出记录里的语言名并不一致（请求用 `la`，记录里是
//! `latin`），两套命名统一在这里处理。

use std::fmt;

use serde::{Deserialize, Serialize};

/// Beta Code 变音符号（Perseus 小写约定）。
/// `/` 锐音、`\` 钝音、`(` 粗气符、`)` 柔气符、`=` 扬抑符、
/// `|` 下加 iota、`+` 分音符、`*` 大写标记、`'` 省音号。
pub const BETA_CODE_MARKS: &str = "/\\()=|+*'";

/// 支持的语言标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// 希腊语（Beta Code 正字法，也接受 Unicode 希腊文）
    Greek,
    /// 拉丁语
    Latin,
}

impl Language {
    /// 服务端请求参数使用的语言代码
    pub fn service_code(&self) -> &'static str {
        match self {
            Language::Greek => "greek",
            Language::Latin => "la",
        }
    }

    /// 输出记录中使用的语言名
    pub fn record_name(&self) -> &'static str {
        match self {
            Language::Greek => "greek",
            Language::Latin => "latin",
        }
    }

    /// 解析用户输入的语言名；接受服务代码和记录名两种写法
    pub fn parse(value: &str) -> Option<Language> {
        match value {
            "greek" => Some(Language::Greek),
            "la" | "latin" => Some(Language::Latin),
            _ => None,
        }
    }

    /// 该语言的分词配置
    pub fn profile(&self) -> &'static LanguageProfile {
        match self {
            Language::Greek => &GREEK_PROFILE,
            Language::Latin => &LATIN_PROFILE,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_name())
    }
}

/// 语言相关的分词配置：子句/句子终结符、缩写后缀与字母表
#[derive(Debug)]
pub struct LanguageProfile {
    /// 子句终结符（推进子句序号，不结束句子）
    pub separators: &'static str,
    /// 句子终结符（同时也推进子句序号）
    pub terminators: &'static str,
    /// 缩写后缀：`cf` + `.` = `cf.`
    pub abbreviation_suffix: char,
    /// 字母之外还算作词内字符的符号
    extra_marks: &'static str,
}

const LATIN_PROFILE: LanguageProfile = LanguageProfile {
    separators: ",;:",
    terminators: ".?!",
    abbreviation_suffix: '.',
    extra_marks: "",
};

// Beta Code 标点：`;` 是问号，`:` 是中点
const GREEK_PROFILE: LanguageProfile = LanguageProfile {
    separators: ",:",
    terminators: ".;",
    abbreviation_suffix: '.',
    extra_marks: BETA_CODE_MARKS,
};

impl LanguageProfile {
    /// 字符是否属于词身。希腊语的词身包括 Beta Code 变音符号
    /// 和（Unicode 输入时的）组合变音符。
    pub fn is_letter(&self, c: char) -> bool {
        if c.is_ascii() {
            c.is_ascii_alphabetic() || self.extra_marks.contains(c)
        } else {
            c.is_alphabetic() || (!self.extra_marks.is_empty() && is_combining_mark(c))
        }
    }

    /// 子句终结符
    pub fn is_separator(&self, c: char) -> bool {
        self.separators.contains(c)
    }

    /// 句子终结符
    pub fn is_terminator(&self, c: char) -> bool {
        self.terminators.contains(c)
    }

    /// 任意一种终结符
    pub fn is_break(&self, c: char) -> bool {
        self.is_separator(c) || self.is_terminator(c)
    }
}

/// 多调希腊文里会出现的组合变音符
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c) || c == '\u{1FBD}' || c == '\u{1FBE}'
}
