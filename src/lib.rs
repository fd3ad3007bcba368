//! # Morphous Library
//!
//! 把希腊语/拉丁语原始文本变成结构化形态记录的工具库：分词并
//! 跟踪词/子句/句子三级坐标，向远端形态分析服务发起查询，用
//! 两层（持久/易失）缓存去重远端调用，按提交形态回核对候选
//! 分析并应用语言学修正，最后装配成供多种下游格式序列化的
//! 输出记录。
//!
//! ## 模块组织
//!
//! - `core` - 核心错误类型、运行选项与逐词驱动循环
//! - `text` - 分词、位置跟踪与查询规范化
//! - `network` - 服务会话与两层缓存
//! - `analysis` - 响应解析、修正管线与记录装配
//! - `builders` - 输出格式构建器（Prolog/JSON/Oz）
//! - `config` - 配置管理

pub mod analysis;
pub mod builders;
pub mod config;
pub mod core;
pub mod network;
pub mod text;

// Re-export commonly used items for convenience
pub use crate::analysis::{
    AnalysisError, AnalysisResult, CanonicalAnalysis, Normalizer, PersonTable, RawAnalysis, Record,
};
pub use crate::config::MorphousConfig;
pub use crate::core::{AnalysisRun, EchoMode, MorphousError, MorphousOptions, RunReport};
pub use crate::network::{AnalysisCache, AnalysisSource, MorpheusEndpoint, Session};
pub use crate::text::{Language, Location, Word, WordStream};
