//! 分析子系统统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。归一化层面的情况
//!（回核对淘汰、参考表缺项、零结果）不是错误，在发生处
//! 就地吸收；只有边界层面的失败（远端不可达、响应损坏）
//! 会升级到运行驱动，由驱动停止运行并支持按词序号续跑。

use thiserror::Error;

/// 分析错误类型
#[derive(Error, Debug, Clone)]
pub enum AnalysisError {
    /// 远端暂时性失败（不可达、过载等）。不在内部重试；
    /// 携带失败词的序号供操作者用起始序号续跑。
    #[error("transient service failure at word {ordinal}: {reason}")]
    TransientFetch { ordinal: usize, reason: String },

    /// 响应文档无法解析成分析序列。对该查询是致命的，
    /// 缓存不会被污染（这个键什么也不写入）。
    #[error("malformed analysis document for '{query}': {reason}")]
    MalformedResponse { query: String, reason: String },

    /// 参考数据（代词人称表）读取失败
    #[error("reference table error: {0}")]
    Reference(String),

    /// 持久缓存读写失败
    #[error("cache persistence error: {0}")]
    CachePersistence(String),

    /// 配置错误
    #[error("configuration error: {0}")]
    Config(String),

    /// 输出文件写入失败
    #[error("output error: {0}")]
    Output(String),
}

impl AnalysisError {
    /// 该错误能否通过断点续跑重试。配置或响应格式问题重试
    /// 也不会好转，判为不可重试。
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::TransientFetch { .. } => true,
            AnalysisError::MalformedResponse { .. } => false,
            AnalysisError::Reference(_) => false,
            AnalysisError::CachePersistence(_) => true,
            AnalysisError::Config(_) => false,
            AnalysisError::Output(_) => false,
        }
    }

    /// 给暂时性失败补上失败词的序号；其他错误原样通过
    pub fn at_ordinal(self, ordinal: usize) -> Self {
        match self {
            AnalysisError::TransientFetch { reason, .. } => {
                AnalysisError::TransientFetch { ordinal, reason }
            }
            other => other,
        }
    }

    /// 失败发生处的词序号（仅暂时性失败携带）
    pub fn ordinal(&self) -> Option<usize> {
        match self {
            AnalysisError::TransientFetch { ordinal, .. } => Some(*ordinal),
            _ => None,
        }
    }
}

/// 错误结果类型别名
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_failures_are_retryable() {
        let error = AnalysisError::TransientFetch {
            ordinal: 7,
            reason: "503".to_string(),
        };
        assert!(error.is_retryable());
        assert_eq!(error.ordinal(), Some(7));
    }

    #[test]
    fn malformed_responses_are_not_retryable() {
        let error = AnalysisError::MalformedResponse {
            query: "amare".to_string(),
            reason: "truncated".to_string(),
        };
        assert!(!error.is_retryable());
        assert_eq!(error.ordinal(), None);
    }

    #[test]
    fn at_ordinal_rewrites_only_transient_failures() {
        let transient = AnalysisError::TransientFetch {
            ordinal: 0,
            reason: "timeout".to_string(),
        };
        assert_eq!(transient.at_ordinal(12).ordinal(), Some(12));

        let config = AnalysisError::Config("bad url".to_string());
        assert_eq!(config.at_ordinal(12).ordinal(), None);
    }
}
