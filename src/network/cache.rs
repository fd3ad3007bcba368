//! 分析缓存模块
//!
//! 两层结构：持久层从精选词表预先构建、跨运行存续；易失层在
//! 运行中按需填充、运行结束即弃。查找顺序是持久层（有值）→
//! 易失层 → 未命中；运行期写入只进易失层。持久层的值只由带外
//! 的缓存构建流程写入，绝不会被运行期填充覆盖或失效。
//!
//! 缓存值是完整的未过滤解析响应——过滤和修正在取出之后才做，
//! 所以过滤逻辑演进不会让缓存失效。对调用方而言，命中与远端
//! 抓取返回的形状完全一致，不需要按来源分支。

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::parser::RawAnalysis;
use crate::text::language::Language;

/// 命中所在的缓存层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    Persistent,
    Volatile,
}

/// 缓存统计信息
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub persistent_hits: u64,
    pub volatile_hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn total_requests(&self) -> u64 {
        self.persistent_hits + self.volatile_hits + self.misses
    }

    /// 缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            (self.persistent_hits + self.volatile_hits) as f64 / total as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 磁盘上的持久缓存文档
#[derive(Serialize, Deserialize)]
struct PersistentFile {
    language: Language,
    entries: BTreeMap<String, Option<Vec<RawAnalysis>>>,
}

/// 两层分析缓存，按查询串（规范化形态）为键
pub struct AnalysisCache {
    language: Language,
    /// 持久层。`None` 表示该词在精选词表里但还没抓到值。
    persistent: BTreeMap<String, Option<Vec<RawAnalysis>>>,
    volatile: HashMap<String, Vec<RawAnalysis>>,
    stats: CacheStats,
}

impl AnalysisCache {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            persistent: BTreeMap::new(),
            volatile: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// 查找：持久层优先，然后易失层；都没有就是未命中，
    /// 调用方需要走远端抓取。
    pub fn lookup(&mut self, query: &str) -> Option<(CacheTier, Vec<RawAnalysis>)> {
        if let Some(Some(analyses)) = self.persistent.get(query) {
            self.stats.persistent_hits += 1;
            return Some((CacheTier::Persistent, analyses.clone()));
        }
        if let Some(analyses) = self.volatile.get(query) {
            self.stats.volatile_hits += 1;
            return Some((CacheTier::Volatile, analyses.clone()));
        }
        self.stats.misses += 1;
        None
    }

    /// 运行期填充：只写易失层。键已有内容时不改写——一次运行
    /// 里首次成功抓取后的条目不再变更。
    pub fn populate(&mut self, query: &str, analyses: Vec<RawAnalysis>) {
        self.volatile.entry(query.to_string()).or_insert(analyses);
    }

    /// 带外构建流程专用：写入持久层的值。运行期查询路径
    /// 不会走到这里。
    pub fn store_persistent(&mut self, query: &str, analyses: Vec<RawAnalysis>) {
        self.persistent.insert(query.to_string(), Some(analyses));
    }

    /// 把精选词表的词记为持久层待抓取项；已有值的键不动
    pub fn seed_pending<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for word in words {
            self.persistent.entry(word.into()).or_insert(None);
        }
    }

    /// 持久层中尚无值的键
    pub fn pending(&self) -> Vec<String> {
        self.persistent
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// 持久层条目数（含待抓取项）
    pub fn persistent_len(&self) -> usize {
        self.persistent.len()
    }

    pub fn volatile_len(&self) -> usize {
        self.volatile.len()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// 从磁盘载入持久层
    pub fn load(path: &Path, language: Language) -> AnalysisResult<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| AnalysisError::CachePersistence(format!("{}: {}", path.display(), e)))?;
        let file: PersistentFile = serde_json::from_str(&data)
            .map_err(|e| AnalysisError::CachePersistence(format!("{}: {}", path.display(), e)))?;
        if file.language != language {
            return Err(AnalysisError::CachePersistence(format!(
                "cache at {} is for {}, not {}",
                path.display(),
                file.language,
                language
            )));
        }
        Ok(Self {
            language,
            persistent: file.entries,
            volatile: HashMap::new(),
            stats: CacheStats::default(),
        })
    }

    /// 磁盘上没有可用缓存时退回空缓存
    pub fn load_or_empty(path: &Path, language: Language) -> Self {
        match Self::load(path, language) {
            Ok(cache) => {
                tracing::info!(
                    path = %path.display(),
                    entries = cache.persistent_len(),
                    "loaded persistent cache"
                );
                cache
            }
            Err(e) => {
                tracing::debug!("starting with empty persistent cache: {e}");
                Self::new(language)
            }
        }
    }

    /// 持久层落盘。先写临时文件再原子替换，失败不会留下
    /// 写了一半的缓存。易失层不落盘。
    pub fn save(&self, path: &Path) -> AnalysisResult<()> {
        let persist_err =
            |e: String| AnalysisError::CachePersistence(format!("{}: {}", path.display(), e));
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| persist_err(e.to_string()))?;
        let file = PersistentFile {
            language: self.language,
            entries: self.persistent.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| persist_err(e.to_string()))?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| persist_err(e.to_string()))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| persist_err(e.to_string()))?;
        tmp.persist(path).map_err(|e| persist_err(e.to_string()))?;
        tracing::debug!(path = %path.display(), entries = self.persistent.len(), "saved persistent cache");
        Ok(())
    }
}

/// 读精选词表：一行一个词，`#` 开头的行是注释
pub fn read_seed_list(path: &Path) -> AnalysisResult<Vec<String>> {
    let data = fs::read_to_string(path)
        .map_err(|e| AnalysisError::CachePersistence(format!("{}: {}", path.display(), e)))?;
    Ok(data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyses(lemma: &str) -> Vec<RawAnalysis> {
        vec![RawAnalysis::from_pairs([
            ("form", "x"),
            ("lemma", lemma),
            ("pos", "noun"),
        ])]
    }

    #[test]
    fn lookup_miss_then_populate_then_hit() {
        let mut cache = AnalysisCache::new(Language::Latin);
        assert!(cache.lookup("amare").is_none());
        cache.populate("amare", analyses("amo"));
        let (tier, found) = cache.lookup("amare").unwrap();
        assert_eq!(tier, CacheTier::Volatile);
        assert_eq!(found, analyses("amo"));
    }

    #[test]
    fn lookup_is_idempotent() {
        let mut cache = AnalysisCache::new(Language::Latin);
        cache.populate("amare", analyses("amo"));
        let first = cache.lookup("amare").unwrap();
        let second = cache.lookup("amare").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn populate_never_overwrites_first_value() {
        let mut cache = AnalysisCache::new(Language::Latin);
        cache.populate("amare", analyses("amo"));
        cache.populate("amare", analyses("other"));
        let (_, found) = cache.lookup("amare").unwrap();
        assert_eq!(found, analyses("amo"));
    }

    #[test]
    fn persistent_takes_precedence_over_volatile() {
        let mut cache = AnalysisCache::new(Language::Latin);
        cache.store_persistent("amare", analyses("persistent"));
        cache.populate("amare", analyses("volatile"));
        let (tier, found) = cache.lookup("amare").unwrap();
        assert_eq!(tier, CacheTier::Persistent);
        assert_eq!(found, analyses("persistent"));
    }

    #[test]
    fn pending_seed_is_a_miss_until_built() {
        let mut cache = AnalysisCache::new(Language::Latin);
        cache.seed_pending(["amare"]);
        assert!(cache.lookup("amare").is_none());
        assert_eq!(cache.pending(), vec!["amare".to_string()]);

        cache.store_persistent("amare", analyses("amo"));
        assert!(cache.pending().is_empty());
        let (tier, _) = cache.lookup("amare").unwrap();
        assert_eq!(tier, CacheTier::Persistent);
    }

    #[test]
    fn seeding_does_not_clobber_built_entries() {
        let mut cache = AnalysisCache::new(Language::Latin);
        cache.store_persistent("amare", analyses("amo"));
        cache.seed_pending(["amare", "esse"]);
        assert_eq!(cache.pending(), vec!["esse".to_string()]);
        assert!(cache.lookup("amare").is_some());
    }

    #[test]
    fn stats_track_tiers_and_misses() {
        let mut cache = AnalysisCache::new(Language::Latin);
        cache.store_persistent("a", analyses("a"));
        cache.populate("b", analyses("b"));
        cache.lookup("a");
        cache.lookup("b");
        cache.lookup("c");
        let stats = cache.stats();
        assert_eq!(stats.persistent_hits, 1);
        assert_eq!(stats.volatile_hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("la.cache.json");

        let mut cache = AnalysisCache::new(Language::Latin);
        cache.store_persistent("amare", analyses("amo"));
        cache.seed_pending(["esse"]);
        cache.populate("volatile-only", analyses("v"));
        cache.save(&path).unwrap();

        let mut reloaded = AnalysisCache::load(&path, Language::Latin).unwrap();
        assert_eq!(reloaded.persistent_len(), 2);
        assert_eq!(reloaded.pending(), vec!["esse".to_string()]);
        let (tier, found) = reloaded.lookup("amare").unwrap();
        assert_eq!(tier, CacheTier::Persistent);
        assert_eq!(found, analyses("amo"));
        // 易失层不落盘
        assert!(reloaded.lookup("volatile-only").is_none());
    }

    #[test]
    fn load_rejects_language_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache = AnalysisCache::new(Language::Latin);
        cache.save(&path).unwrap();
        assert!(AnalysisCache::load(&path, Language::Greek).is_err());
    }

    #[test]
    fn load_or_empty_survives_missing_file() {
        let cache =
            AnalysisCache::load_or_empty(Path::new("/nonexistent/cache.json"), Language::Greek);
        assert_eq!(cache.persistent_len(), 0);
    }

    #[test]
    fn seed_list_skips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cachewords.la");
        fs::write(&path, "# curated words\namare\n\nesse\n").unwrap();
        let words = read_seed_list(&path).unwrap();
        assert_eq!(words, vec!["amare".to_string(), "esse".to_string()]);
    }
}
