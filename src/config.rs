//! 配置管理模块
//!
//! 三层来源：配置文件（按搜索路径取第一个存在的）、环境变量
//! 覆盖、内置默认值。配置只覆盖环境性的关注点——服务地址、
//! 超时、缓存位置、参考表路径、附加缩写；流水线语义不进配置。

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::text::language::Language;

/// 配置常量
pub mod constants {
    /// 默认服务基地址（Perseus Hopper）
    pub const DEFAULT_SERVICE_URL: &str = "http://www.perseus.tufts.edu/hopper";

    /// 默认 HTTP 超时（秒）
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &["morphous.toml", ".morphous.toml"];

    /// 环境变量名
    pub const ENV_SERVICE_URL: &str = "MORPHOUS_SERVICE_URL";
    pub const ENV_TIMEOUT_SECS: &str = "MORPHOUS_TIMEOUT_SECS";
    pub const ENV_CACHE_DIR: &str = "MORPHOUS_CACHE_DIR";
}

/// 运行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphousConfig {
    /// 服务基地址
    pub service_url: String,
    /// HTTP 超时（秒）
    pub timeout_secs: u64,
    /// 缓存目录；持久缓存存为 `<语言代码>.cache.json`，
    /// 精选词表读自 `cachewords.<语言代码>`
    pub cache_dir: PathBuf,
    /// 代词人称表路径；不配置则用内建表
    pub person_table: Option<PathBuf>,
    /// 附加缩写（完整形式，如 `cf.`），分词时不按句号结句
    pub abbreviations: Vec<String>,
}

impl Default for MorphousConfig {
    fn default() -> Self {
        Self {
            service_url: constants::DEFAULT_SERVICE_URL.to_string(),
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            cache_dir: PathBuf::from("."),
            person_table: None,
            abbreviations: Vec::new(),
        }
    }
}

impl MorphousConfig {
    /// 按搜索路径加载第一个存在的配置文件并套上环境变量覆盖；
    /// 一个都不存在时用默认值。
    pub fn load() -> AnalysisResult<Self> {
        for path in constants::CONFIG_PATHS {
            let path = Path::new(path);
            if path.exists() {
                return Self::from_path(path);
            }
        }
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    pub fn from_path(path: &Path) -> AnalysisResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config: Self = toml::from_str(&text)
            .map_err(|e| AnalysisError::Config(format!("{}: {}", path.display(), e)))?;
        config.apply_env();
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// 环境变量覆盖配置文件
    fn apply_env(&mut self) {
        if let Ok(value) = env::var(constants::ENV_SERVICE_URL) {
            self.service_url = value;
        }
        if let Ok(value) = env::var(constants::ENV_TIMEOUT_SECS) {
            match value.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!(
                    "ignoring non-numeric {}: {value}",
                    constants::ENV_TIMEOUT_SECS
                ),
            }
        }
        if let Ok(value) = env::var(constants::ENV_CACHE_DIR) {
            self.cache_dir = PathBuf::from(value);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 某语言的持久缓存文件路径
    pub fn cache_path(&self, language: Language) -> PathBuf {
        self.cache_dir
            .join(format!("{}.cache.json", language.service_code()))
    }

    /// 某语言的精选词表路径
    pub fn seed_path(&self, language: Language) -> PathBuf {
        self.cache_dir
            .join(format!("cachewords.{}", language.service_code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_perseus() {
        let config = MorphousConfig::default();
        assert_eq!(config.service_url, constants::DEFAULT_SERVICE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn cache_paths_use_service_codes() {
        let config = MorphousConfig::default();
        assert_eq!(
            config.cache_path(Language::Latin),
            PathBuf::from("./la.cache.json")
        );
        assert_eq!(
            config.seed_path(Language::Greek),
            PathBuf::from("./cachewords.greek")
        );
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: MorphousConfig =
            toml::from_str("service_url = \"http://localhost:8080\"").unwrap();
        assert_eq!(config.service_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, constants::DEFAULT_TIMEOUT_SECS);
        assert!(config.abbreviations.is_empty());
    }
}
