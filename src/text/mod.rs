//! # 文本模块
//!
//! 这个模块包含所有与文本切分和查询规范化相关的功能：
//!
//! - 词/子句/句子三级坐标的分词
//! - 两种正字法的查询规范化（拉丁语小写化、希腊语去变音符号）
//! - Unicode 希腊文到 Beta Code 的音译
//!
//! # 模块组织
//!
//! - `language` - 语言标签与分词用的标点/字母表配置
//! - `tokenizer` - 词流、位置跟踪
//! - `query` - 查询构建与规范化

pub mod language;
pub mod query;
pub mod tokenizer;

// Re-export commonly used items for convenience
pub use language::{Language, LanguageProfile, BETA_CODE_MARKS};
pub use tokenizer::{Location, Word, WordStream};
