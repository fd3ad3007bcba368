//! 会话与抓取模块
//!
//! `Session` 编排整个抓取路径：先查两层缓存，未命中时经由
//! `AnalysisSource` 边界调远端服务，把完整响应解析后原样填进
//! 易失缓存再返回。远端边界是抓取器唯一的外部依赖。
//!
//! 暂时性失败（不可达、过载）不在内部重试：错误带着失败词的
//! 序号上抛，重试是操作者的事——用起始序号从断点续跑。解析
//! 失败对该查询致命，缓存对这个键什么都不写。

use std::time::Duration;

use url::Url;

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::parser::{self, RawAnalysis};
use crate::network::cache::AnalysisCache;
use crate::text::language::Language;
use crate::text::query;
use crate::text::tokenizer::Word;

/// 远端形态分析服务边界。请求是语言代码加查询串，响应是一份
/// `<analyses>` 文档文本。进程外服务和测试替身都从这里接入。
pub trait AnalysisSource {
    fn fetch(&self, language: Language, query: &str) -> AnalysisResult<String>;
}

/// Perseus 风格的 HTTP 端点
pub struct MorpheusEndpoint {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl MorpheusEndpoint {
    pub fn new(base_url: &str, timeout: Duration) -> AnalysisResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AnalysisError::Config(format!("invalid service URL '{base_url}': {e}")))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// 构造查询 URL。两种正字法的转义差异全部交给查询串序列化
    /// 器处理：Beta Code 的 `( ) = / \ |` 需要百分号转义，拉丁
    /// 语查询原样通过。
    pub fn query_url(&self, language: Language, query: &str) -> AnalysisResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AnalysisError::Config("service URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("xmlmorph");
        url.query_pairs_mut()
            .append_pair("lang", language.service_code())
            .append_pair("lookup", query);
        Ok(url)
    }
}

impl AnalysisSource for MorpheusEndpoint {
    fn fetch(&self, language: Language, query: &str) -> AnalysisResult<String> {
        let url = self.query_url(language, query)?;
        tracing::debug!(%url, "fetching analyses");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| AnalysisError::TransientFetch {
                ordinal: 0,
                reason: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            // 服务过载等一律按可重试失败上报
            return Err(AnalysisError::TransientFetch {
                ordinal: 0,
                reason: format!("service returned {status} for {url}"),
            });
        }
        response.text().map_err(|e| AnalysisError::TransientFetch {
            ordinal: 0,
            reason: e.to_string(),
        })
    }
}

/// 会话统计信息
#[derive(Debug, Default, Clone)]
pub struct SessionStats {
    pub cache_hits: u64,
    pub remote_fetches: u64,
}

impl SessionStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 抓取会话：缓存优先，远端兜底
pub struct Session {
    source: Box<dyn AnalysisSource>,
    cache: AnalysisCache,
    stats: SessionStats,
}

impl Session {
    pub fn new(source: Box<dyn AnalysisSource>, cache: AnalysisCache) -> Self {
        Self {
            source,
            cache,
            stats: SessionStats::default(),
        }
    }

    /// 取一个词的完整候选分析集（未过滤）。缓存命中与远端抓取
    /// 对调用方不可区分。
    pub fn analyses_for(&mut self, word: &Word) -> AnalysisResult<Vec<RawAnalysis>> {
        let submitted = query::for_word(word);
        self.analyses_for_query(word.language, &submitted, word.location.word)
    }

    /// 按查询串抓取。同一查询在一次运行中至多触发一次远端调用。
    pub fn analyses_for_query(
        &mut self,
        language: Language,
        submitted: &str,
        ordinal: usize,
    ) -> AnalysisResult<Vec<RawAnalysis>> {
        debug_assert_eq!(language, self.cache.language());

        if let Some((tier, analyses)) = self.cache.lookup(submitted) {
            self.stats.cache_hits += 1;
            tracing::debug!(query = submitted, tier = ?tier, "cache hit");
            return Ok(analyses);
        }

        let document = self
            .source
            .fetch(language, submitted)
            .map_err(|e| e.at_ordinal(ordinal))?;
        // 解析失败直接上抛，这个键不写缓存
        let analyses = parser::parse_analyses(submitted, &document)?;
        self.cache.populate(submitted, analyses.clone());
        self.stats.remote_fetches += 1;
        tracing::debug!(query = submitted, count = analyses.len(), "fetched and cached");
        Ok(analyses)
    }

    /// 带外持久缓存构建：把所有待抓取的种子词抓全并写入持久
    /// 层。这是唯一写持久层值的代码路径，不在运行期查询路径上。
    pub fn build_persistent_cache(&mut self) -> AnalysisResult<usize> {
        let language = self.cache.language();
        let pending = self.cache.pending();
        let total = pending.len();
        for (i, key) in pending.iter().enumerate() {
            tracing::info!("building persistent cache entry {}/{}: {}", i + 1, total, key);
            let document = self.source.fetch(language, key)?;
            let analyses = parser::parse_analyses(key, &document)?;
            self.cache.store_persistent(key, analyses);
        }
        Ok(total)
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut AnalysisCache {
        &mut self.cache
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}
