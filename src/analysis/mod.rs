//! # 分析模块
//!
//! 这个模块包含远端响应落地为正式分析记录的全部步骤：
//!
//! - 响应文档解析（开放特征集 → 有序映射）
//! - 形态回核对与语言学修正管线
//! - 代词人称参考表
//! - 输出记录装配与特征投影
//!
//! # 模块组织
//!
//! - `parser` - `<analyses>` 文档解析、`RawAnalysis`
//! - `fixes` - 归一化管线、`CanonicalAnalysis`
//! - `reference` - 词元 → 人称参考表
//! - `record` - 投影与记录装配
//! - `error` - 统一错误类型

pub mod error;
pub mod fixes;
pub mod parser;
pub mod record;
pub mod reference;

// Re-export commonly used items for convenience
pub use error::{AnalysisError, AnalysisResult};
pub use fixes::{CanonicalAnalysis, Normalizer, NormalizerStats};
pub use parser::{parse_analyses, RawAnalysis, CORE_FEATURES};
pub use record::{assemble_records, FieldValue, Projection, Record};
pub use reference::PersonTable;
