//! # 输出构建器模块
//!
//! 三种下游序列化格式，每种都是记录投影字段的纯函数：
//!
//! - `prolog` - 逻辑子句文本，一条记录一个复合项
//! - `json` - 结构化对象文本，一条记录一个对象
//! - `oz` - 扁平分隔记录，特征名与单引号值用冒号连接
//!
//! 构建器另外负责输出文件的头部注释块，Prolog 构建器还要在
//! 文件尾列出生成过的谓词名和对应的 `:- dynamic` 指令注释。

pub mod json;
pub mod oz;
pub mod prolog;

// Re-export commonly used items for convenience
pub use prolog::ProcedureRegister;

use chrono::{DateTime, Local};

/// 输出文件头信息：输入描述、标签、起始词序号、投影与时间戳
#[derive(Debug, Clone)]
pub struct RunHeader {
    pub input: String,
    pub label: String,
    pub start: usize,
    pub core_features: Vec<String>,
    pub word_features: Vec<String>,
    pub timestamp: DateTime<Local>,
}

impl RunHeader {
    pub fn new(
        input: impl Into<String>,
        label: impl Into<String>,
        start: usize,
        core_features: &[String],
        word_features: &[String],
    ) -> Self {
        Self {
            input: input.into(),
            label: label.into(),
            start,
            core_features: core_features.to_vec(),
            word_features: word_features.to_vec(),
            timestamp: Local::now(),
        }
    }

    /// 用统一的注释前缀渲染头部行；`file_name` 只在文件新建
    ///（而非追加）时写出
    fn comment_block(&self, prefix: &str, file_name: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str(prefix);
        out.push('\n');
        if let Some(name) = file_name {
            out.push_str(&format!("{prefix} {name}\n"));
        }
        out.push_str(&format!(
            "{prefix} input: {} starting at word {}\n",
            self.input, self.start
        ));
        out.push_str(&format!(
            "{prefix} date/time: {}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("{prefix} label: {}\n", self.label));
        out.push_str(&format!(
            "{prefix} core features: {:?}\n",
            self.core_features
        ));
        out.push_str(&format!(
            "{prefix} word features: {:?}\n",
            self.word_features
        ));
        out.push_str(prefix);
        out.push('\n');
        out
    }
}
